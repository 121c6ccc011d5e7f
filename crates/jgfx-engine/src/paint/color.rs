use bytemuck::{Pod, Zeroable};

/// Straight-alpha RGBA color, one byte per channel.
///
/// This is the in-vertex representation: four bytes keep the vertex
/// layout compact and match what fixed-function color arrays expect.
/// Blending happens on the backend according to the active
/// [`BlendMode`](super::BlendMode).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Normalized `[0, 1]` float components, for uniform uploads and
    /// backend clear colors.
    #[inline]
    pub fn to_normalized(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).a, 255);
    }

    #[test]
    fn to_normalized_maps_full_range() {
        assert_eq!(Color::WHITE.to_normalized(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(Color::TRANSPARENT.to_normalized(), [0.0, 0.0, 0.0, 0.0]);
    }
}
