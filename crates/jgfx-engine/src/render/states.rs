use crate::coords::Transform;
use crate::paint::BlendMode;
use crate::resources::{Shader, Texture};

/// How a batch of geometry is drawn: transform, blend mode, optional
/// texture and shader.
///
/// Borrowed by the render target for the duration of one draw call;
/// the target never stores the references.
#[derive(Debug, Copy, Clone, Default)]
pub struct RenderStates<'a> {
    pub blend_mode: BlendMode,
    pub transform: Transform,
    pub texture: Option<&'a Texture>,
    pub shader: Option<&'a Shader>,
}

impl<'a> RenderStates<'a> {
    /// States drawing with `transform` and defaults otherwise.
    #[inline]
    pub fn transformed(transform: Transform) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }

    /// States drawing with `texture` and defaults otherwise.
    #[inline]
    pub fn textured(texture: &'a Texture) -> Self {
        Self {
            texture: Some(texture),
            ..Self::default()
        }
    }
}
