pub mod drag;
pub mod label;
pub mod tap;
pub mod transform;

pub use drag::DragSession;
pub use label::first_label;
pub use tap::{TapCandidate, TapThresholds};
pub use transform::{TransformState, ZoomLimits};

/// A position in client (CSS pixel) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
