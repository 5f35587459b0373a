//! Property tests for the pan/zoom state machine.
//!
//! 1. Scale never leaves the configured bounds under any wheel sequence.
//! 2. A rejected wheel step leaves the whole state bit-identical.
//! 3. The point under the cursor stays under the cursor after a zoom.
//! 4. Dragging moves the translation by exactly the pointer delta.

#![cfg(not(target_arch = "wasm32"))]

use mermaid_panzoom::controller::TransformController;
use mermaid_panzoom::state::{DragSession, Point, TransformState, ZoomLimits};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn wheel_strategy() -> impl Strategy<Value = (f64, f64, f64)> {
    (
        prop_oneof![Just(-120.0), Just(-3.0), Just(0.0), Just(3.0), Just(120.0)],
        -2_000.0f64..2_000.0,
        -2_000.0f64..2_000.0,
    )
}

fn state_strategy() -> impl Strategy<Value = TransformState> {
    (0.1f64..=10.0, -5_000.0f64..5_000.0, -5_000.0f64..5_000.0).prop_map(
        |(scale, translate_x, translate_y)| TransformState {
            scale,
            translate_x,
            translate_y,
        },
    )
}

fn bits(state: &TransformState) -> [u64; 3] {
    [
        state.scale.to_bits(),
        state.translate_x.to_bits(),
        state.translate_y.to_bits(),
    ]
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn scale_stays_within_bounds(steps in prop::collection::vec(wheel_strategy(), 0..300)) {
        let limits = ZoomLimits::default();
        let mut state = TransformState::default();
        for (delta, x, y) in steps {
            state.zoom_at(delta, Point::new(x, y), &limits);
            prop_assert!(state.scale >= limits.min_scale && state.scale <= limits.max_scale);
        }
    }

    #[test]
    fn rejected_step_changes_nothing(state in state_strategy(), step in wheel_strategy()) {
        let limits = ZoomLimits::default();
        let (delta, x, y) = step;
        let mut next = state;
        if !next.zoom_at(delta, Point::new(x, y), &limits) {
            prop_assert_eq!(bits(&next), bits(&state));
        }
    }

    #[test]
    fn cursor_point_is_fixed_under_zoom(state in state_strategy(), step in wheel_strategy()) {
        let limits = ZoomLimits::default();
        let (delta, x, y) = step;
        let cursor = Point::new(x, y);
        let local = state.to_local(cursor);
        let mut next = state;
        if next.zoom_at(delta, cursor, &limits) {
            let mapped = next.to_screen(local);
            prop_assert!(close(mapped.x, cursor.x), "x: {} vs {}", mapped.x, cursor.x);
            prop_assert!(close(mapped.y, cursor.y), "y: {} vs {}", mapped.y, cursor.y);
        }
    }

    #[test]
    fn drag_translates_by_pointer_delta(
        origin in (-1_000.0f64..1_000.0, -1_000.0f64..1_000.0),
        p0 in (-1_000.0f64..1_000.0, -1_000.0f64..1_000.0),
        p1 in (-1_000.0f64..1_000.0, -1_000.0f64..1_000.0),
    ) {
        let session = DragSession::begin(Point::new(p0.0, p0.1), Point::new(origin.0, origin.1));
        let moved = session.translate_for(Point::new(p1.0, p1.1));
        prop_assert!(close(moved.x, origin.0 + (p1.0 - p0.0)));
        prop_assert!(close(moved.y, origin.1 + (p1.1 - p0.1)));
    }

    #[test]
    fn restarting_drag_at_release_point_is_stable(
        p0 in (-1_000.0f64..1_000.0, -1_000.0f64..1_000.0),
        p1 in (-1_000.0f64..1_000.0, -1_000.0f64..1_000.0),
    ) {
        let ctl = TransformController::new(ZoomLimits::default());
        ctl.on_drag_start(Point::new(p0.0, p0.1));
        ctl.on_drag_move(Point::new(p1.0, p1.1));
        ctl.on_drag_end();
        let released = ctl.transform();

        ctl.on_drag_start(Point::new(p1.0, p1.1));
        ctl.on_drag_end();
        prop_assert_eq!(bits(&ctl.transform()), bits(&released));
    }
}

#[test]
fn reset_twice_yields_identity_both_times() {
    let ctl = TransformController::new(ZoomLimits::default());
    ctl.on_wheel(-1.0, Point::new(30.0, 40.0));
    ctl.on_drag_start(Point::new(0.0, 0.0));
    ctl.on_drag_move(Point::new(12.0, 9.0));
    ctl.on_drag_end();

    assert!(ctl.reset());
    assert_eq!(ctl.transform(), TransformState::default());
    assert!(!ctl.reset());
    assert_eq!(ctl.transform(), TransformState::default());
}
