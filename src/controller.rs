//! Pan/zoom controller for one rendered graphic.
//!
//! The controller owns the [`TransformState`] and the optional
//! [`DragSession`]; the DOM listeners installed by [`TransformController::attach`]
//! feed it pointer, wheel and touch input and write the resulting transform
//! back to the graphic's inline style. Listeners resolve the graphic through
//! the event's current target, so nothing here keeps the element alive.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, MouseEvent, TouchEvent, WheelEvent};

use crate::state::{DragSession, Point, TransformState, ZoomLimits};
use crate::util;

/// Dispatched on a graphic to reset its controller.
pub const RESET_EVENT: &str = "mermaid-panzoom:reset";

#[derive(Default, Debug)]
struct PanZoom {
    transform: TransformState,
    drag: Option<DragSession>,
}

#[derive(Clone)]
pub struct TransformController {
    limits: ZoomLimits,
    state: Rc<RefCell<PanZoom>>,
}

impl TransformController {
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            limits,
            state: Rc::new(RefCell::new(PanZoom::default())),
        }
    }

    pub fn transform(&self) -> TransformState {
        self.state.borrow().transform
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().drag.is_some()
    }

    /// Cursor position in the frame the translation lives in: relative to
    /// the graphic's untransformed top-left corner. `rect_origin` is the
    /// top-left of the graphic's current (transformed) bounding rect.
    pub fn anchor_point(&self, rect_origin: Point, client: Point) -> Point {
        let t = self.state.borrow().transform.translate();
        Point::new(
            client.x - (rect_origin.x - t.x),
            client.y - (rect_origin.y - t.y),
        )
    }

    /// Returns whether the zoom step was applied.
    pub fn on_wheel(&self, delta_y: f64, cursor: Point) -> bool {
        self.state
            .borrow_mut()
            .transform
            .zoom_at(delta_y, cursor, &self.limits)
    }

    pub fn on_drag_start(&self, pointer: Point) {
        let mut st = self.state.borrow_mut();
        let origin = st.transform.translate();
        st.drag = Some(DragSession::begin(pointer, origin));
    }

    /// Returns whether a drag was in progress (and the translation moved).
    pub fn on_drag_move(&self, pointer: Point) -> bool {
        let mut st = self.state.borrow_mut();
        let Some(drag) = st.drag else {
            return false;
        };
        st.transform.pan_to(drag.translate_for(pointer));
        true
    }

    pub fn on_drag_end(&self) {
        self.state.borrow_mut().drag = None;
    }

    /// Returns whether the state changed.
    pub fn reset(&self) -> bool {
        self.state.borrow_mut().transform.reset()
    }

    /// Writes the current transform to the graphic.
    pub fn render(&self, element: &Element) -> Result<(), JsValue> {
        let css = self.transform().css_transform();
        util::set_styles(element, &[("transform", css.as_str())])
    }

    /// Initial inline styling of the graphic.
    pub fn prepare(&self, element: &Element) -> Result<(), JsValue> {
        util::set_styles(
            element,
            &[
                ("max-width", "none"),
                ("max-height", "none"),
                ("transform-origin", "0 0"),
                ("cursor", "grab"),
            ],
        )
    }

    /// Installs wheel, mouse, touch, context-menu and reset listeners on the graphic.
    pub fn attach(&self, element: &Element) -> Result<(), JsValue> {
        self.prepare(element)?;

        let ctl = self.clone();
        util::listen(element, "wheel", false, move |e: Event| {
            let (Some(wheel), Some(el)) = (e.dyn_ref::<WheelEvent>(), util::current_element(&e))
            else {
                return;
            };
            wheel.prevent_default();
            let rect = el.get_bounding_client_rect();
            let client = Point::new(wheel.client_x() as f64, wheel.client_y() as f64);
            let cursor = ctl.anchor_point(Point::new(rect.left(), rect.top()), client);
            if ctl.on_wheel(wheel.delta_y(), cursor) {
                util::warn_on_err("wheel render", ctl.render(&el));
            }
        })?;

        let ctl = self.clone();
        util::listen(element, "mousedown", true, move |e: Event| {
            let (Some(mouse), Some(el)) = (e.dyn_ref::<MouseEvent>(), util::current_element(&e))
            else {
                return;
            };
            if mouse.button() != 0 {
                return;
            }
            ctl.on_drag_start(Point::new(mouse.client_x() as f64, mouse.client_y() as f64));
            util::warn_on_err("drag cursor", util::set_styles(&el, &[("cursor", "grabbing")]));
        })?;

        let ctl = self.clone();
        util::listen(element, "mousemove", true, move |e: Event| {
            let (Some(mouse), Some(el)) = (e.dyn_ref::<MouseEvent>(), util::current_element(&e))
            else {
                return;
            };
            if ctl.on_drag_move(Point::new(mouse.client_x() as f64, mouse.client_y() as f64)) {
                util::warn_on_err("drag render", ctl.render(&el));
            }
        })?;

        for event in ["mouseup", "mouseleave"] {
            let ctl = self.clone();
            util::listen(element, event, true, move |e: Event| {
                ctl.on_drag_end();
                if let Some(el) = util::current_element(&e) {
                    util::warn_on_err("drag cursor", util::set_styles(&el, &[("cursor", "grab")]));
                }
            })?;
        }

        let ctl = self.clone();
        util::listen(element, "touchstart", false, move |e: Event| {
            let Some(touch) = e.dyn_ref::<TouchEvent>() else {
                return;
            };
            let touches = touch.touches();
            if touches.length() != 1 {
                return;
            }
            let Some(first) = touches.item(0) else {
                return;
            };
            touch.prevent_default();
            ctl.on_drag_start(Point::new(first.client_x() as f64, first.client_y() as f64));
        })?;

        let ctl = self.clone();
        util::listen(element, "touchmove", false, move |e: Event| {
            let (Some(touch), Some(el)) = (e.dyn_ref::<TouchEvent>(), util::current_element(&e))
            else {
                return;
            };
            let touches = touch.touches();
            if !ctl.is_dragging() || touches.length() != 1 {
                return;
            }
            let Some(first) = touches.item(0) else {
                return;
            };
            touch.prevent_default();
            if ctl.on_drag_move(Point::new(first.client_x() as f64, first.client_y() as f64)) {
                util::warn_on_err("touch render", ctl.render(&el));
            }
        })?;

        // capture phase: a node that takes the touch as a tap stops its propagation
        for event in ["touchend", "touchcancel"] {
            let ctl = self.clone();
            util::listen_capture(element, event, move |_e: Event| ctl.on_drag_end())?;
        }

        util::listen(element, "contextmenu", false, |e: Event| e.prevent_default())?;

        let ctl = self.clone();
        util::listen(element, RESET_EVENT, true, move |e: Event| {
            if !ctl.reset() {
                return;
            }
            if let Some(el) = util::current_element(&e) {
                util::warn_on_err("reset render", ctl.render(&el));
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drag_follows_pointer_and_release_is_idempotent() {
        let ctl = TransformController::new(ZoomLimits::default());
        assert!(!ctl.on_drag_move(Point::new(5.0, 5.0)));

        ctl.on_drag_start(Point::new(10.0, 20.0));
        assert!(ctl.is_dragging());
        assert!(ctl.on_drag_move(Point::new(40.0, 5.0)));
        assert_eq!(ctl.transform().translate(), Point::new(30.0, -15.0));

        ctl.on_drag_end();
        ctl.on_drag_end();
        assert!(!ctl.is_dragging());
        assert!(!ctl.on_drag_move(Point::new(100.0, 100.0)));
        assert_eq!(ctl.transform().translate(), Point::new(30.0, -15.0));
    }

    #[test]
    fn anchor_point_removes_current_translation_from_rect() {
        let ctl = TransformController::new(ZoomLimits::default());
        ctl.on_drag_start(Point::new(0.0, 0.0));
        ctl.on_drag_move(Point::new(25.0, -10.0));
        ctl.on_drag_end();
        // graphic laid out at (100, 50); the transformed rect sits at (125, 40)
        let cursor = ctl.anchor_point(Point::new(125.0, 40.0), Point::new(200.0, 90.0));
        assert_eq!(cursor, Point::new(100.0, 40.0));
    }

    #[test]
    fn reset_reports_change_only_once() {
        let ctl = TransformController::new(ZoomLimits::default());
        assert!(!ctl.reset());
        assert!(ctl.on_wheel(-1.0, Point::new(10.0, 10.0)));
        assert!(ctl.reset());
        assert_eq!(ctl.transform(), TransformState::default());
        assert!(!ctl.reset());
    }
}
