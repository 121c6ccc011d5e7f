//! Abstract graphics backend.
//!
//! The render stack never talks to a GPU API directly; it issues a
//! small fixed set of primitive operations against [`GraphicsBackend`].
//! A production implementation forwards these 1:1 to the platform's
//! graphics calls. [`recording::RecordingBackend`] implements the same
//! trait as a deterministic test double so state-caching behavior can
//! be asserted as call sequences without a GPU.
//!
//! Convention:
//! - matrices are column-major 4×4 float arrays
//! - viewports are integer pixel rects with a bottom-left origin, as
//!   the backing graphics APIs expect
//! - handle value 0 is never issued for a live object

pub mod recording;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::coords::IntRect;
use crate::paint::{BlendMode, Color};
use crate::render::Vertex;
use crate::resources::BufferUsage;

/// Identifier of a native graphics context.
///
/// A context is the unit GPU state is attached to; exactly one thread
/// may hold a context current at a time.
pub type ContextId = u64;

/// Backend-side object handle (texture, program, buffer).
pub type NativeHandle = u64;

/// Resolved location of a uniform within a compiled program.
pub type UniformLocation = u32;

/// Geometry interpretation for a draw call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Optional backend features, queried before use.
///
/// Callers check support up front and skip the dependent operation
/// entirely when a capability is missing; the backend is never asked to
/// attempt an unsupported operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    Shaders,
    VertexBuffers,
    SrgbConversion,
}

/// Typed uniform payload pushed into a bound program.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
    Matrix([f32; 16]),
    /// Texture unit index for a sampler uniform.
    Sampler(u32),
}

/// The primitive operation set a platform must supply.
///
/// Operations are deliberately unbatched and stateful, mirroring the
/// context-bound graphics APIs they map onto; all call ordering and
/// redundancy elimination is the responsibility of the render target.
pub trait GraphicsBackend: Send {
    /// Makes the backend's context current (or not) on the calling
    /// thread. Returns `false` if the platform refuses; the caller
    /// treats that as "skip this frame", not as a hard error.
    fn make_context_current(&mut self, current: bool) -> bool;

    /// Identifier of the context the calling thread would issue GPU
    /// calls against.
    fn current_context_id(&self) -> ContextId;

    fn supports(&self, capability: Capability) -> bool;

    // ── frame state ───────────────────────────────────────────────────────

    fn clear(&mut self, color: Color);
    fn set_viewport(&mut self, rect: IntRect);
    fn load_projection_matrix(&mut self, matrix: &[f32; 16]);
    fn load_model_matrix(&mut self, matrix: &[f32; 16]);
    fn set_srgb_conversion(&mut self, enabled: bool);

    /// Establishes the baseline state every draw relies on: blending
    /// enabled, depth/culling disabled, vertex and color arrays on.
    /// Issued once per full cache invalidation.
    fn init_persistent_state(&mut self);

    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Binds `texture` to the primary texture unit; `None` unbinds.
    fn bind_texture(&mut self, texture: Option<NativeHandle>);

    fn bind_program(&mut self, program: Option<NativeHandle>);

    fn set_tex_coords_enabled(&mut self, enabled: bool);

    /// Points the vertex attribute sources at a client-side array.
    fn set_vertex_array(&mut self, vertices: &[Vertex]);

    /// Binds (or unbinds) a backend vertex buffer as attribute source.
    fn bind_vertex_buffer(&mut self, buffer: Option<NativeHandle>);

    fn draw_arrays(&mut self, primitive: PrimitiveType, first: usize, count: usize);

    // ── textures ──────────────────────────────────────────────────────────

    fn create_texture(&mut self, width: u32, height: u32) -> Option<NativeHandle>;
    fn delete_texture(&mut self, texture: NativeHandle);
    fn upload_texture_pixels(&mut self, texture: NativeHandle, width: u32, height: u32, pixels: &[u8]);
    fn set_texture_smooth(&mut self, texture: NativeHandle, smooth: bool);
    fn set_texture_repeated(&mut self, texture: NativeHandle, repeated: bool);

    /// Binds a texture to a secondary unit for sampler uniforms. The
    /// primary unit (0) stays untouched so the render target's cached
    /// binding remains valid.
    fn bind_texture_to_unit(&mut self, unit: u32, texture: NativeHandle);

    // ── programs ──────────────────────────────────────────────────────────

    fn create_program(&mut self, vertex_src: &str, fragment_src: &str) -> Option<NativeHandle>;
    fn delete_program(&mut self, program: NativeHandle);
    fn uniform_location(&mut self, program: NativeHandle, name: &str) -> Option<UniformLocation>;
    fn set_uniform(&mut self, program: NativeHandle, location: UniformLocation, value: UniformValue);

    // ── vertex buffers ────────────────────────────────────────────────────

    fn create_vertex_buffer(&mut self, vertex_count: usize, usage: BufferUsage)
    -> Option<NativeHandle>;
    fn delete_vertex_buffer(&mut self, buffer: NativeHandle);
    fn upload_vertex_buffer(&mut self, buffer: NativeHandle, vertices: &[Vertex]);
}

/// Shared, lockable backend handle.
///
/// Targets and resources hold clones of this; the lock serializes GPU
/// access the same way a context-current requirement does.
pub type SharedBackend = Arc<Mutex<dyn GraphicsBackend>>;

pub use recording::{BackendCall, RecordingBackend};
