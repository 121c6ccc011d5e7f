//! Recording backend used to assert draw-dispatch call sequences.

use std::collections::{HashMap, HashSet};

use super::{
    Capability, ContextId, GraphicsBackend, NativeHandle, PrimitiveType, UniformLocation,
    UniformValue,
};
use crate::coords::IntRect;
use crate::paint::{BlendMode, Color};
use crate::render::Vertex;
use crate::resources::BufferUsage;

/// One recorded backend operation.
///
/// Client-side vertex arrays are copied out so tests can inspect the
/// exact (possibly pre-transformed) geometry that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    MakeContextCurrent(bool),
    Clear(Color),
    SetViewport(IntRect),
    LoadProjectionMatrix([f32; 16]),
    LoadModelMatrix([f32; 16]),
    SetSrgbConversion(bool),
    InitPersistentState,
    SetBlendMode(BlendMode),
    BindTexture(Option<NativeHandle>),
    BindProgram(Option<NativeHandle>),
    SetTexCoordsEnabled(bool),
    SetVertexArray(Vec<Vertex>),
    BindVertexBuffer(Option<NativeHandle>),
    DrawArrays(PrimitiveType, usize, usize),
    UploadTexturePixels(NativeHandle, u32, u32, usize),
    SetTextureSmooth(NativeHandle, bool),
    SetTextureRepeated(NativeHandle, bool),
    BindTextureToUnit(u32, NativeHandle),
    SetUniform(NativeHandle, UniformLocation, UniformValue),
    UploadVertexBuffer(NativeHandle, usize),
    DeleteTexture(NativeHandle),
    DeleteProgram(NativeHandle),
    DeleteVertexBuffer(NativeHandle),
}

/// In-memory [`GraphicsBackend`] that records every call.
///
/// Handles are issued sequentially starting at 1. Uniform lookups miss
/// unless the name was registered with [`define_uniform`]
/// (`RecordingBackend::define_uniform`), which lets tests exercise both
/// the hit and the warn-once miss path.
pub struct RecordingBackend {
    calls: Vec<BackendCall>,
    context_id: ContextId,
    fail_activation: bool,
    unsupported: HashSet<Capability>,
    next_handle: NativeHandle,
    next_location: UniformLocation,
    uniforms: HashMap<(NativeHandle, String), UniformLocation>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::with_context_id(1)
    }

    /// Backend whose thread-current context reports `context_id`.
    ///
    /// Tests model "two targets sharing one context" by giving both the
    /// same backend, and "separate contexts" by distinct ids.
    pub fn with_context_id(context_id: ContextId) -> Self {
        Self {
            calls: Vec::new(),
            context_id,
            fail_activation: false,
            unsupported: HashSet::new(),
            next_handle: 0,
            next_location: 0,
            uniforms: HashMap::new(),
        }
    }

    /// Makes subsequent `make_context_current` calls fail.
    pub fn fail_activation(&mut self, fail: bool) {
        self.fail_activation = fail;
    }

    /// Marks a capability as unsupported.
    pub fn without_capability(&mut self, capability: Capability) {
        self.unsupported.insert(capability);
    }

    /// Registers a uniform on `program` and returns its location.
    pub fn define_uniform(&mut self, program: NativeHandle, name: &str) -> UniformLocation {
        let location = self.next_location;
        self.next_location += 1;
        self.uniforms.insert((program, name.to_owned()), location);
        location
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    fn issue_handle(&mut self) -> NativeHandle {
        self.next_handle += 1;
        self.next_handle
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for RecordingBackend {
    fn make_context_current(&mut self, current: bool) -> bool {
        self.calls.push(BackendCall::MakeContextCurrent(current));
        !self.fail_activation
    }

    fn current_context_id(&self) -> ContextId {
        self.context_id
    }

    fn supports(&self, capability: Capability) -> bool {
        !self.unsupported.contains(&capability)
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(BackendCall::Clear(color));
    }

    fn set_viewport(&mut self, rect: IntRect) {
        self.calls.push(BackendCall::SetViewport(rect));
    }

    fn load_projection_matrix(&mut self, matrix: &[f32; 16]) {
        self.calls.push(BackendCall::LoadProjectionMatrix(*matrix));
    }

    fn load_model_matrix(&mut self, matrix: &[f32; 16]) {
        self.calls.push(BackendCall::LoadModelMatrix(*matrix));
    }

    fn set_srgb_conversion(&mut self, enabled: bool) {
        self.calls.push(BackendCall::SetSrgbConversion(enabled));
    }

    fn init_persistent_state(&mut self) {
        self.calls.push(BackendCall::InitPersistentState);
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.calls.push(BackendCall::SetBlendMode(mode));
    }

    fn bind_texture(&mut self, texture: Option<NativeHandle>) {
        self.calls.push(BackendCall::BindTexture(texture));
    }

    fn bind_program(&mut self, program: Option<NativeHandle>) {
        self.calls.push(BackendCall::BindProgram(program));
    }

    fn set_tex_coords_enabled(&mut self, enabled: bool) {
        self.calls.push(BackendCall::SetTexCoordsEnabled(enabled));
    }

    fn set_vertex_array(&mut self, vertices: &[Vertex]) {
        self.calls.push(BackendCall::SetVertexArray(vertices.to_vec()));
    }

    fn bind_vertex_buffer(&mut self, buffer: Option<NativeHandle>) {
        self.calls.push(BackendCall::BindVertexBuffer(buffer));
    }

    fn draw_arrays(&mut self, primitive: PrimitiveType, first: usize, count: usize) {
        self.calls.push(BackendCall::DrawArrays(primitive, first, count));
    }

    fn create_texture(&mut self, _width: u32, _height: u32) -> Option<NativeHandle> {
        Some(self.issue_handle())
    }

    fn delete_texture(&mut self, texture: NativeHandle) {
        self.calls.push(BackendCall::DeleteTexture(texture));
    }

    fn upload_texture_pixels(
        &mut self,
        texture: NativeHandle,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) {
        self.calls
            .push(BackendCall::UploadTexturePixels(texture, width, height, pixels.len()));
    }

    fn set_texture_smooth(&mut self, texture: NativeHandle, smooth: bool) {
        self.calls.push(BackendCall::SetTextureSmooth(texture, smooth));
    }

    fn set_texture_repeated(&mut self, texture: NativeHandle, repeated: bool) {
        self.calls.push(BackendCall::SetTextureRepeated(texture, repeated));
    }

    fn bind_texture_to_unit(&mut self, unit: u32, texture: NativeHandle) {
        self.calls.push(BackendCall::BindTextureToUnit(unit, texture));
    }

    fn create_program(&mut self, _vertex_src: &str, _fragment_src: &str) -> Option<NativeHandle> {
        Some(self.issue_handle())
    }

    fn delete_program(&mut self, program: NativeHandle) {
        self.calls.push(BackendCall::DeleteProgram(program));
    }

    fn uniform_location(&mut self, program: NativeHandle, name: &str) -> Option<UniformLocation> {
        self.uniforms.get(&(program, name.to_owned())).copied()
    }

    fn set_uniform(&mut self, program: NativeHandle, location: UniformLocation, value: UniformValue) {
        self.calls.push(BackendCall::SetUniform(program, location, value));
    }

    fn create_vertex_buffer(
        &mut self,
        _vertex_count: usize,
        _usage: BufferUsage,
    ) -> Option<NativeHandle> {
        Some(self.issue_handle())
    }

    fn delete_vertex_buffer(&mut self, buffer: NativeHandle) {
        self.calls.push(BackendCall::DeleteVertexBuffer(buffer));
    }

    fn upload_vertex_buffer(&mut self, buffer: NativeHandle, vertices: &[Vertex]) {
        self.calls
            .push(BackendCall::UploadVertexBuffer(buffer, vertices.len()));
    }
}
