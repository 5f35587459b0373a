// Drag session state, alive from pointer-down/touch-start until release
use super::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Pointer position when the drag began.
    start: Point,
    /// Translation when the drag began.
    origin: Point,
}

impl DragSession {
    pub fn begin(pointer: Point, translate: Point) -> Self {
        Self {
            start: pointer,
            origin: translate,
        }
    }

    /// Absolute translation for the given pointer position.
    pub fn translate_for(&self, pointer: Point) -> Point {
        Point::new(
            self.origin.x + (pointer.x - self.start.x),
            self.origin.y + (pointer.y - self.start.y),
        )
    }
}
