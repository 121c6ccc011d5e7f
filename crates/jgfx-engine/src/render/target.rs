use std::sync::Arc;

use arrayvec::ArrayVec;

use super::{RenderStates, Vertex, View};
use crate::backend::{GraphicsBackend, PrimitiveType, SharedBackend};
use crate::coords::{IntRect, Rect, Transform, Vec2};
use crate::device::{Activation, GraphicsDeviceContext, ResourceId, TargetId};
use crate::paint::{BlendMode, Color};
use crate::resources::{Shader, Texture, VertexBuffer};

/// Capacity of the pre-transformed vertex cache.
///
/// Draws at or below this size are transformed on the CPU and drawn
/// with an identity model matrix, saving a matrix upload per quad. The
/// value bounds that optimization; changing it changes which draws take
/// the pre-transform path.
const VERTEX_CACHE_SIZE: usize = 4;

/// Last backend state this target applied.
///
/// `enabled == false` means nothing here can be trusted: every apply
/// step runs unconditionally once, after which the flag flips back on.
/// `persistent_states_set` survives partial invalidation because the
/// baseline state belongs to the context, not to any one target.
#[derive(Debug)]
struct StatesCache {
    enabled: bool,
    persistent_states_set: bool,
    view_changed: bool,
    tex_coords_enabled: bool,
    use_vertex_cache: bool,
    last_texture_id: ResourceId,
    last_blend_mode: BlendMode,
    vertex_cache: ArrayVec<Vertex, VERTEX_CACHE_SIZE>,
}

impl StatesCache {
    fn new() -> Self {
        Self {
            enabled: false,
            persistent_states_set: false,
            view_changed: true,
            tex_coords_enabled: false,
            use_vertex_cache: false,
            last_texture_id: ResourceId::NONE,
            last_blend_mode: BlendMode::ALPHA,
            vertex_cache: ArrayVec::new(),
        }
    }
}

/// Initialization parameters for a render target.
///
/// Created once the underlying drawing surface exists and its pixel
/// size is known.
#[derive(Debug, Copy, Clone)]
pub struct TargetInit {
    /// Drawable width in pixels.
    pub width: u32,
    /// Drawable height in pixels.
    pub height: u32,
    /// Whether the surface performs sRGB conversion on write.
    pub srgb: bool,
}

impl TargetInit {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            srgb: false,
        }
    }
}

/// Draw-dispatch engine over an abstract backend.
///
/// A target owns its current and default [`View`] and a cache of the
/// backend state it applied last. `draw` applies only the state that
/// differs from the cache, which makes consecutive draws sharing a
/// texture/blend/transform cheap.
///
/// Correctness hinges on activation tracking: backend state belongs to
/// a native context, so whenever this target was not the most recently
/// active one on the calling thread's context, the cache is discarded
/// before drawing. Draw calls into one target must come from the thread
/// currently holding its context; that contract is the caller's.
pub struct RenderTarget {
    device: Arc<GraphicsDeviceContext>,
    backend: SharedBackend,
    id: TargetId,
    width: u32,
    height: u32,
    srgb: bool,
    view: View,
    default_view: View,
    cache: StatesCache,
}

impl RenderTarget {
    /// Creates a target over `init.width × init.height` pixels.
    ///
    /// The default view covers `[0, 0, width, height]` in world units;
    /// the current view starts as a copy of it.
    pub fn new(
        device: Arc<GraphicsDeviceContext>,
        backend: SharedBackend,
        init: TargetInit,
    ) -> Self {
        let default_view =
            View::from_rect(Rect::new(0.0, 0.0, init.width as f32, init.height as f32));
        let id = device.next_target_id();

        Self {
            device,
            backend,
            id,
            width: init.width,
            height: init.height,
            srgb: init.srgb,
            view: default_view.clone(),
            default_view,
            cache: StatesCache::new(),
        }
    }

    /// Pixel size of the drawable surface.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Adapts the target to a resized surface.
    ///
    /// The default view is recomputed from the new pixel size; an
    /// installed custom view is preserved. Call
    /// `set_view(target.default_view().clone())` for a reset.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.default_view = View::from_rect(Rect::new(0.0, 0.0, width as f32, height as f32));
        // Pixel viewports derive from the target size.
        self.cache.view_changed = true;
    }

    // ── views ─────────────────────────────────────────────────────────────

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.cache.view_changed = true;
    }

    #[inline]
    pub fn view(&self) -> &View {
        &self.view
    }

    #[inline]
    pub fn default_view(&self) -> &View {
        &self.default_view
    }

    /// Pixel rectangle covered by `view`'s normalized viewport.
    ///
    /// Each component rounds as `floor(x · dim + 0.5)`; callers mapping
    /// between pixel and world coordinates rely on this exact rule.
    pub fn viewport(&self, view: &View) -> IntRect {
        let width = self.width as f32;
        let height = self.height as f32;
        let v = view.viewport();

        IntRect::new(
            (0.5 + width * v.origin.x).floor() as i32,
            (0.5 + height * v.origin.y).floor() as i32,
            (0.5 + width * v.size.x).floor() as i32,
            (0.5 + height * v.size.y).floor() as i32,
        )
    }

    /// Converts a target-pixel position to world coordinates using the
    /// current view.
    pub fn map_pixel_to_coords(&self, pixel: Vec2) -> Vec2 {
        self.map_pixel_to_coords_with(pixel, &self.view)
    }

    pub fn map_pixel_to_coords_with(&self, pixel: Vec2, view: &View) -> Vec2 {
        let viewport = self.viewport(view);
        let normalized = Vec2::new(
            -1.0 + 2.0 * (pixel.x - viewport.left as f32) / viewport.width as f32,
            1.0 - 2.0 * (pixel.y - viewport.top as f32) / viewport.height as f32,
        );
        view.inverse_transform().transform_point(normalized)
    }

    /// Converts a world position to target-pixel coordinates using the
    /// current view.
    pub fn map_coords_to_pixel(&self, point: Vec2) -> Vec2 {
        self.map_coords_to_pixel_with(point, &self.view)
    }

    pub fn map_coords_to_pixel_with(&self, point: Vec2, view: &View) -> Vec2 {
        let normalized = view.transform().transform_point(point);
        let viewport = self.viewport(view);
        Vec2::new(
            (normalized.x + 1.0) / 2.0 * viewport.width as f32 + viewport.left as f32,
            (-normalized.y + 1.0) / 2.0 * viewport.height as f32 + viewport.top as f32,
        )
    }

    // ── activation ────────────────────────────────────────────────────────

    /// Makes this target the active one on the calling thread's
    /// context (or releases it).
    ///
    /// Returns `false` if the platform refuses to change the context;
    /// drawing is best-effort, so callers typically skip the frame
    /// rather than treat this as fatal.
    pub fn set_active(&mut self, active: bool) -> bool {
        let shared = Arc::clone(&self.backend);
        let mut backend = shared.lock();
        self.activate(&mut *backend, active)
    }

    /// Discards every cached assumption about backend state.
    ///
    /// Required after issuing raw backend calls that bypass this
    /// target.
    pub fn reset_state_cache(&mut self) {
        self.cache.enabled = false;
        self.cache.persistent_states_set = false;
        self.cache.view_changed = true;
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Clears the whole target to `color`.
    pub fn clear(&mut self, color: Color) {
        let shared = Arc::clone(&self.backend);
        let mut backend = shared.lock();
        let backend = &mut *backend;

        if !self.ensure_active(backend) {
            return;
        }

        // A stale texture binding can corrupt the clear on some
        // drivers; unbind first and remember that we did.
        backend.bind_texture(None);
        self.cache.last_texture_id = ResourceId::NONE;

        backend.clear(color);
    }

    /// Draws `vertices` as `primitive` with `states`.
    ///
    /// Empty input is a no-op; so is a draw whose context activation
    /// fails. Draws of at most [`VERTEX_CACHE_SIZE`] vertices are
    /// pre-transformed on the CPU.
    pub fn draw(&mut self, vertices: &[Vertex], primitive: PrimitiveType, states: &RenderStates<'_>) {
        if vertices.is_empty() {
            return;
        }

        let shared = Arc::clone(&self.backend);
        let mut backend = shared.lock();
        let backend = &mut *backend;

        if !self.ensure_active(backend) {
            return;
        }

        let use_vertex_cache = vertices.len() <= VERTEX_CACHE_SIZE;
        if use_vertex_cache {
            self.cache.vertex_cache.clear();
            for vertex in vertices {
                self.cache.vertex_cache.push(Vertex {
                    position: states.transform.transform_point(vertex.position),
                    ..*vertex
                });
            }
        }

        self.setup_draw(backend, use_vertex_cache, states);

        let tex_coords = states.texture.is_some() || states.shader.is_some();
        if !self.cache.enabled || tex_coords != self.cache.tex_coords_enabled {
            backend.set_tex_coords_enabled(tex_coords);
        }

        // Geometry crosses the trait by value, so the backend cannot
        // observe later rewrites of the internal cache; attribute
        // sources are re-pointed on every draw.
        if use_vertex_cache {
            backend.set_vertex_array(&self.cache.vertex_cache);
        } else {
            backend.set_vertex_array(vertices);
        }

        backend.draw_arrays(primitive, 0, vertices.len());

        self.cleanup_draw(backend, states);
        self.cache.use_vertex_cache = use_vertex_cache;
        self.cache.tex_coords_enabled = tex_coords;
    }

    /// Draws `count` vertices of `buffer` starting at `first`.
    ///
    /// Vertex buffers are assumed large, so there is no pre-transform
    /// path and texture coordinates stay enabled. `count` is clamped to
    /// the buffer's length.
    pub fn draw_buffer(
        &mut self,
        buffer: &VertexBuffer,
        first: usize,
        count: usize,
        states: &RenderStates<'_>,
    ) {
        if count == 0 || first >= buffer.vertex_count() {
            return;
        }
        let count = count.min(buffer.vertex_count() - first);

        let shared = Arc::clone(&self.backend);
        let mut backend = shared.lock();
        let backend = &mut *backend;

        if !self.ensure_active(backend) {
            return;
        }

        self.setup_draw(backend, false, states);

        backend.bind_vertex_buffer(Some(buffer.native_handle()));

        if !self.cache.enabled || !self.cache.tex_coords_enabled {
            backend.set_tex_coords_enabled(true);
        }

        backend.draw_arrays(buffer.primitive(), first, count);
        backend.bind_vertex_buffer(None);

        self.cleanup_draw(backend, states);
        self.cache.use_vertex_cache = false;
        self.cache.tex_coords_enabled = true;
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn ensure_active(&mut self, backend: &mut dyn GraphicsBackend) -> bool {
        let context = backend.current_context_id();
        if self.device.is_active(context, self.id) {
            return true;
        }
        self.activate(backend, true)
    }

    fn activate(&mut self, backend: &mut dyn GraphicsBackend, active: bool) -> bool {
        if !backend.make_context_current(active) {
            log::warn!("render target {:?}: context activation failed", self.id);
            return false;
        }

        let context = backend.current_context_id();
        if active {
            match self.device.mark_active(context, self.id) {
                Activation::FirstInContext => {
                    // Unknown context: even the baseline state must be
                    // re-established.
                    self.cache.persistent_states_set = false;
                    self.cache.enabled = false;
                }
                Activation::ReplacedOther => self.cache.enabled = false,
                Activation::AlreadyActive => {}
            }
        } else {
            self.device.mark_inactive(context, self.id);
            self.cache.enabled = false;
        }
        true
    }

    /// Applies every piece of draw state that differs from the cache.
    fn setup_draw(
        &mut self,
        backend: &mut dyn GraphicsBackend,
        use_vertex_cache: bool,
        states: &RenderStates<'_>,
    ) {
        if !self.cache.persistent_states_set {
            self.reset_persistent_state(backend);
        }

        if use_vertex_cache {
            // Vertices are already transformed; the identity must be
            // reloaded whenever the previous draw left a model matrix
            // behind.
            if !self.cache.enabled || !self.cache.use_vertex_cache {
                backend.load_model_matrix(Transform::IDENTITY.matrix());
            }
        } else {
            backend.load_model_matrix(states.transform.matrix());
        }

        if !self.cache.enabled || self.cache.view_changed {
            self.apply_view(backend);
        }

        if !self.cache.enabled || states.blend_mode != self.cache.last_blend_mode {
            self.apply_blend_mode(backend, states.blend_mode);
        }

        // A texture that doubles as a live render-target attachment can
        // change out of band, so its cache id cannot be trusted.
        let force_rebind = states
            .texture
            .is_some_and(|t| t.is_framebuffer_attachment());
        let texture_id = states.texture.map_or(ResourceId::NONE, |t| t.cache_id());
        if force_rebind || !self.cache.enabled || texture_id != self.cache.last_texture_id {
            self.apply_texture(backend, states.texture);
        }

        // Shaders carry uniform state that must be pushed fresh; they
        // are cheap to rebind relative to textures.
        if let Some(shader) = states.shader {
            self.apply_shader(backend, Some(shader));
        }
    }

    fn cleanup_draw(&mut self, backend: &mut dyn GraphicsBackend, states: &RenderStates<'_>) {
        if states.shader.is_some() {
            self.apply_shader(backend, None);
        }
        // Leaving a live attachment bound corrupts later clears on some
        // drivers.
        if states
            .texture
            .is_some_and(|t| t.is_framebuffer_attachment())
        {
            self.apply_texture(backend, None);
        }
        self.cache.enabled = true;
    }

    /// Re-establishes the baseline state and resets the cache to the
    /// values that baseline implies.
    fn reset_persistent_state(&mut self, backend: &mut dyn GraphicsBackend) {
        backend.set_srgb_conversion(self.srgb);
        backend.init_persistent_state();
        self.cache.persistent_states_set = true;

        self.apply_blend_mode(backend, BlendMode::ALPHA);
        self.apply_texture(backend, None);
        backend.bind_program(None);
        backend.set_tex_coords_enabled(true);
        self.cache.tex_coords_enabled = true;
        self.cache.use_vertex_cache = false;
        self.cache.view_changed = true;
    }

    fn apply_view(&mut self, backend: &mut dyn GraphicsBackend) {
        let viewport = self.viewport(&self.view);
        // Backends take viewports with a bottom-left origin.
        let bottom = self.height as i32 - (viewport.top + viewport.height);
        backend.set_viewport(IntRect::new(
            viewport.left,
            bottom,
            viewport.width,
            viewport.height,
        ));
        backend.load_projection_matrix(self.view.transform().matrix());
        self.cache.view_changed = false;
    }

    fn apply_blend_mode(&mut self, backend: &mut dyn GraphicsBackend, mode: BlendMode) {
        backend.set_blend_mode(mode);
        self.cache.last_blend_mode = mode;
    }

    fn apply_texture(&mut self, backend: &mut dyn GraphicsBackend, texture: Option<&Texture>) {
        backend.bind_texture(texture.map(|t| t.native_handle()));
        self.cache.last_texture_id = texture.map_or(ResourceId::NONE, |t| t.cache_id());
    }

    fn apply_shader(&mut self, backend: &mut dyn GraphicsBackend, shader: Option<&Shader>) {
        match shader {
            Some(shader) => {
                backend.bind_program(Some(shader.native_handle()));
                shader.apply_uniforms(backend);
            }
            None => backend.bind_program(None),
        }
    }
}
