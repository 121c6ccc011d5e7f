/// Multiplier applied to a blend input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// How the weighted source and destination values are combined.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendEquation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Blend mode with independent color and alpha pipelines.
///
/// The render target compares blend modes by value to decide whether a
/// backend blend-state change has to be issued, so equality must cover
/// all six components.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlendMode {
    pub color_src_factor: BlendFactor,
    pub color_dst_factor: BlendFactor,
    pub color_equation: BlendEquation,
    pub alpha_src_factor: BlendFactor,
    pub alpha_dst_factor: BlendFactor,
    pub alpha_equation: BlendEquation,
}

impl BlendMode {
    /// Source blended onto destination using source alpha.
    pub const ALPHA: BlendMode = BlendMode {
        color_src_factor: BlendFactor::SrcAlpha,
        color_dst_factor: BlendFactor::OneMinusSrcAlpha,
        color_equation: BlendEquation::Add,
        alpha_src_factor: BlendFactor::One,
        alpha_dst_factor: BlendFactor::OneMinusSrcAlpha,
        alpha_equation: BlendEquation::Add,
    };

    /// Source added to destination.
    pub const ADD: BlendMode = BlendMode {
        color_src_factor: BlendFactor::SrcAlpha,
        color_dst_factor: BlendFactor::One,
        color_equation: BlendEquation::Add,
        alpha_src_factor: BlendFactor::One,
        alpha_dst_factor: BlendFactor::One,
        alpha_equation: BlendEquation::Add,
    };

    /// Source multiplied with destination.
    pub const MULTIPLY: BlendMode =
        BlendMode::uniform(BlendFactor::DstColor, BlendFactor::Zero, BlendEquation::Add);

    /// Destination overwritten with source.
    pub const NONE: BlendMode =
        BlendMode::uniform(BlendFactor::One, BlendFactor::Zero, BlendEquation::Add);

    /// Same factors and equation for the color and alpha channels.
    #[inline]
    pub const fn uniform(
        src_factor: BlendFactor,
        dst_factor: BlendFactor,
        equation: BlendEquation,
    ) -> Self {
        BlendMode {
            color_src_factor: src_factor,
            color_dst_factor: dst_factor,
            color_equation: equation,
            alpha_src_factor: src_factor,
            alpha_dst_factor: dst_factor,
            alpha_equation: equation,
        }
    }
}

impl Default for BlendMode {
    #[inline]
    fn default() -> Self {
        BlendMode::ALPHA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_alpha_blending() {
        assert_eq!(BlendMode::default(), BlendMode::ALPHA);
    }

    #[test]
    fn equality_covers_alpha_channel() {
        let mut m = BlendMode::ALPHA;
        m.alpha_equation = BlendEquation::Max;
        assert_ne!(m, BlendMode::ALPHA);
    }

    #[test]
    fn uniform_duplicates_both_channels() {
        let m = BlendMode::uniform(BlendFactor::One, BlendFactor::Zero, BlendEquation::Add);
        assert_eq!(m.color_src_factor, m.alpha_src_factor);
        assert_eq!(m.color_dst_factor, m.alpha_dst_factor);
        assert_eq!(m.color_equation, m.alpha_equation);
    }
}
