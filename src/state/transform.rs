//! Pan/zoom state for one rendered graphic.
//!
//! The graphic is drawn with `transform-origin: 0 0`, so a point `p` in the
//! graphic's own coordinates lands on screen at `p * scale + translate`,
//! measured from the graphic's untransformed origin.

use super::Point;

/// Scale bounds and the multiplicative wheel steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomLimits {
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_in: f64,
    pub zoom_out: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 10.0,
            zoom_in: 1.1,
            zoom_out: 0.9,
        }
    }
}

impl ZoomLimits {
    /// Wheel down (positive delta) zooms out; anything else zooms in.
    pub fn factor_for(&self, delta_y: f64) -> f64 {
        if delta_y > 0.0 { self.zoom_out } else { self.zoom_in }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl TransformState {
    pub fn translate(&self) -> Point {
        Point::new(self.translate_x, self.translate_y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Applies one wheel step anchored at `cursor`.
    ///
    /// Returns `false` and leaves the state untouched when the step would
    /// take the scale outside the limits.
    pub fn zoom_at(&mut self, delta_y: f64, cursor: Point, limits: &ZoomLimits) -> bool {
        let factor = limits.factor_for(delta_y);
        let scale = self.scale * factor;
        if scale < limits.min_scale || scale > limits.max_scale {
            return false;
        }
        self.translate_x = cursor.x - (cursor.x - self.translate_x) * factor;
        self.translate_y = cursor.y - (cursor.y - self.translate_y) * factor;
        self.scale = scale;
        true
    }

    pub fn pan_to(&mut self, translate: Point) {
        self.translate_x = translate.x;
        self.translate_y = translate.y;
    }

    /// Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        if self.is_identity() {
            return false;
        }
        *self = Self::default();
        true
    }

    pub fn to_screen(&self, local: Point) -> Point {
        Point::new(
            local.x * self.scale + self.translate_x,
            local.y * self.scale + self.translate_y,
        )
    }

    pub fn to_local(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate_x) / self.scale,
            (screen.y - self.translate_y) / self.scale,
        )
    }

    /// Value for the CSS `transform` property.
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn assert_close(actual: f64, expected: f64) {
        let delta = (actual - expected).abs();
        assert!(delta <= 1e-9, "expected {expected} got {actual} (delta {delta})");
    }

    #[test]
    fn wheel_down_zooms_out_and_up_zooms_in() {
        let limits = ZoomLimits::default();
        let mut state = TransformState::default();
        assert!(state.zoom_at(120.0, Point::new(0.0, 0.0), &limits));
        assert_close(state.scale, 0.9);
        let mut state = TransformState::default();
        assert!(state.zoom_at(-120.0, Point::new(0.0, 0.0), &limits));
        assert_close(state.scale, 1.1);
    }

    #[test]
    fn zero_delta_counts_as_zoom_in() {
        assert_eq!(ZoomLimits::default().factor_for(0.0), 1.1);
    }

    #[test]
    fn zoom_keeps_cursor_point_fixed() {
        let limits = ZoomLimits::default();
        let mut state = TransformState {
            scale: 1.7,
            translate_x: -35.0,
            translate_y: 12.5,
        };
        let cursor = Point::new(240.0, 180.0);
        let under_cursor = state.to_local(cursor);
        assert!(state.zoom_at(-1.0, cursor, &limits));
        let mapped = state.to_screen(under_cursor);
        assert_close(mapped.x, cursor.x);
        assert_close(mapped.y, cursor.y);
    }

    #[test]
    fn zoom_past_upper_bound_is_rejected_untouched() {
        let limits = ZoomLimits::default();
        let mut state = TransformState {
            scale: 9.5,
            translate_x: 4.0,
            translate_y: -8.0,
        };
        let before = state;
        assert!(!state.zoom_at(-3.0, Point::new(50.0, 50.0), &limits));
        assert_eq!(state, before);
    }

    #[test]
    fn zoom_past_lower_bound_is_rejected_untouched() {
        let limits = ZoomLimits::default();
        let mut state = TransformState {
            scale: 0.105,
            translate_x: 1.0,
            translate_y: 2.0,
        };
        let before = state;
        assert!(!state.zoom_at(3.0, Point::new(10.0, 10.0), &limits));
        assert_eq!(state, before);
    }

    #[test]
    fn reset_restores_identity_once() {
        let mut state = TransformState {
            scale: 2.0,
            translate_x: 30.0,
            translate_y: -10.0,
        };
        assert!(state.reset());
        assert_eq!(state, TransformState::default());
        assert!(!state.reset());
        assert_eq!(state, TransformState::default());
    }

    #[test]
    fn css_transform_translates_then_scales() {
        let state = TransformState {
            scale: 1.5,
            translate_x: 10.0,
            translate_y: -4.25,
        };
        assert_eq!(state.css_transform(), "translate(10px, -4.25px) scale(1.5)");
    }
}
