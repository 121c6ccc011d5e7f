use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::Color;

/// One point of geometry: position, color, texture coordinates.
///
/// 20 bytes, no padding; `Pod` so vertex slices can be handed to a
/// backend as raw bytes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Position in world units.
    pub position: Vec2,
    pub color: Color,
    /// Texture coordinates in pixels of the bound texture.
    pub tex_coords: Vec2,
}

impl Vertex {
    #[inline]
    pub const fn new(position: Vec2, color: Color, tex_coords: Vec2) -> Self {
        Self {
            position,
            color,
            tex_coords,
        }
    }

    /// White untextured vertex at `position`.
    #[inline]
    pub const fn at(position: Vec2) -> Self {
        Self::new(position, Color::WHITE, Vec2::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_packed() {
        assert_eq!(core::mem::size_of::<Vertex>(), 20);
    }
}
