/// Axis-aligned rectangle in integer pixels (top-left origin).
///
/// This is the type backends consume for viewports and scissor-style
/// regions; world-space math stays on [`Rect`](super::Rect).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct IntRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    #[inline]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}
