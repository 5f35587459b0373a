// Per-node tap detection for touch sequences
use super::Point;

/// Boundary between a tap and a drag or long press.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapThresholds {
    /// A tap must end strictly before this many milliseconds.
    pub max_duration_ms: f64,
    /// Movement beyond this many pixels on either axis marks a drag.
    pub max_movement_px: f64,
}

impl Default for TapThresholds {
    fn default() -> Self {
        Self {
            max_duration_ms: 300.0,
            max_movement_px: 10.0,
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct TapCandidate {
    active: bool,
    start_time_ms: f64,
    start: Point,
    has_moved: bool,
}

impl TapCandidate {
    pub fn begin(&mut self, now_ms: f64, at: Point) {
        self.active = true;
        self.start_time_ms = now_ms;
        self.start = at;
        self.has_moved = false;
    }

    /// Records a move; once flagged, the sequence stays a drag until the next `begin`.
    pub fn track(&mut self, at: Point, thresholds: &TapThresholds) {
        if self.has_moved {
            return;
        }
        let dx = (at.x - self.start.x).abs();
        let dy = (at.y - self.start.y).abs();
        if dx > thresholds.max_movement_px || dy > thresholds.max_movement_px {
            self.has_moved = true;
        }
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Classifies the sequence at touch-end and discards it.
    pub fn finish(&mut self, now_ms: f64, thresholds: &TapThresholds) -> bool {
        let was_active = std::mem::take(&mut self.active);
        was_active && !self.has_moved && now_ms - self.start_time_ms < thresholds.max_duration_ms
    }
}
