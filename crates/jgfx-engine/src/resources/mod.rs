//! Backend-owned resources the render target binds.
//!
//! Resources are created through the [`GraphicsBackend`] and keep a
//! clone of the shared backend handle so they can release their native
//! object on drop. They never issue draw-time binds themselves; the
//! render target does that, driven by the cache-id protocol
//! ([`Texture::cache_id`]).
//!
//! [`GraphicsBackend`]: crate::backend::GraphicsBackend

mod shader;
mod texture;
mod vertex_buffer;

pub use shader::Shader;
pub use texture::{Texture, TextureSettings};
pub use vertex_buffer::{BufferUsage, VertexBuffer};
