use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::backend::{
    Capability, GraphicsBackend, NativeHandle, SharedBackend, UniformLocation, UniformValue,
};
use crate::coords::{Transform, Vec2};
use crate::paint::Color;

use super::Texture;

/// Compiled shader program plus its pending uniform state.
///
/// Uniform name→location lookups are resolved through the backend once
/// per name and cached, including misses. Setting a uniform the program
/// does not expose logs one warning for that name and is otherwise a
/// no-op; linkers routinely strip uniforms a generic caller still
/// probes for, so this is not an error.
///
/// Uniform values are stored here and pushed by the render target
/// before every draw that uses the shader, since a program's uniform
/// state cannot be assumed to survive other targets using the context.
pub struct Shader {
    backend: SharedBackend,
    handle: NativeHandle,
    /// Cached lookups; `None` marks a name known to be absent.
    locations: HashMap<String, Option<UniformLocation>>,
    values: Vec<(UniformLocation, UniformValue)>,
    /// Sampler uniforms; units are assigned sequentially at push time.
    textures: Vec<(UniformLocation, NativeHandle)>,
}

impl Shader {
    /// Whether the backend can compile and run shader programs at all.
    ///
    /// Check this before constructing shaders on platforms where
    /// support is optional.
    pub fn is_available(backend: &SharedBackend) -> bool {
        backend.lock().supports(Capability::Shaders)
    }

    /// Compiles and links a program from vertex and fragment sources.
    pub fn from_source(
        backend: &SharedBackend,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self> {
        let handle = {
            let mut locked = backend.lock();
            anyhow::ensure!(
                locked.supports(Capability::Shaders),
                "shaders are not supported by this backend"
            );
            locked
                .create_program(vertex_src, fragment_src)
                .context("backend failed to compile/link the shader program")?
        };

        Ok(Self {
            backend: Arc::clone(backend),
            handle,
            locations: HashMap::new(),
            values: Vec::new(),
            textures: Vec::new(),
        })
    }

    #[inline]
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.store_value(name, UniformValue::Float(value));
    }

    pub fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.store_value(name, UniformValue::Vec2([value.x, value.y]));
    }

    pub fn set_color(&mut self, name: &str, color: Color) {
        self.store_value(name, UniformValue::Vec4(color.to_normalized()));
    }

    pub fn set_transform(&mut self, name: &str, transform: &Transform) {
        self.store_value(name, UniformValue::Matrix(*transform.matrix()));
    }

    /// Binds `texture` to a sampler uniform.
    ///
    /// The shader remembers the texture's native handle; keep the
    /// texture alive for as long as the shader may be drawn with.
    pub fn set_texture(&mut self, name: &str, texture: &Texture) {
        let Some(location) = self.location(name) else {
            return;
        };

        match self.textures.iter_mut().find(|(l, _)| *l == location) {
            Some(slot) => slot.1 = texture.native_handle(),
            None => self.textures.push((location, texture.native_handle())),
        }
    }

    /// Pushes all pending uniform state into the bound program.
    ///
    /// The caller must have bound this shader's program already.
    /// Sampler textures go to units starting at 1; unit 0 belongs to
    /// the draw's primary texture and must stay untouched.
    pub(crate) fn apply_uniforms(&self, backend: &mut dyn GraphicsBackend) {
        for (index, (location, texture)) in self.textures.iter().enumerate() {
            let unit = index as u32 + 1;
            backend.bind_texture_to_unit(unit, *texture);
            backend.set_uniform(self.handle, *location, UniformValue::Sampler(unit));
        }

        for (location, value) in &self.values {
            backend.set_uniform(self.handle, *location, *value);
        }
    }

    fn store_value(&mut self, name: &str, value: UniformValue) {
        let Some(location) = self.location(name) else {
            return;
        };

        match self.values.iter_mut().find(|(l, _)| *l == location) {
            Some(slot) => slot.1 = value,
            None => self.values.push((location, value)),
        }
    }

    fn location(&mut self, name: &str) -> Option<UniformLocation> {
        if let Some(cached) = self.locations.get(name) {
            return *cached;
        }

        let found = self.backend.lock().uniform_location(self.handle, name);
        if found.is_none() {
            // Once per name; the cached miss silences repeats.
            log::warn!("uniform {name:?} not found in shader program");
        }
        self.locations.insert(name.to_owned(), found);
        found
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.backend.lock().delete_program(self.handle);
    }
}

impl std::fmt::Debug for Shader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader")
            .field("handle", &self.handle)
            .field("uniforms", &self.values.len())
            .field("textures", &self.textures.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};

    fn setup() -> (Arc<Mutex<RecordingBackend>>, SharedBackend) {
        let backend = Arc::new(Mutex::new(RecordingBackend::new()));
        let shared: SharedBackend = backend.clone();
        (backend, shared)
    }

    // ── uniform misses ────────────────────────────────────────────────────

    #[test]
    fn missing_uniform_is_ignored() {
        let (backend, shared) = setup();
        let mut shader = Shader::from_source(&shared, "vs", "fs").unwrap();
        let tint = backend.lock().define_uniform(shader.native_handle(), "tint");

        shader.set_float("does_not_exist", 1.0);
        shader.set_float("tint", 0.5);

        let mut recorder = RecordingBackend::new();
        shader.apply_uniforms(&mut recorder);

        // Only the resolvable uniform reached the backend.
        assert_eq!(
            recorder.calls(),
            &[BackendCall::SetUniform(
                shader.native_handle(),
                tint,
                UniformValue::Float(0.5)
            )]
        );
    }

    #[test]
    fn repeated_sets_replace_the_value() {
        let (backend, shared) = setup();
        let mut shader = Shader::from_source(&shared, "vs", "fs").unwrap();
        backend.lock().define_uniform(shader.native_handle(), "alpha");

        shader.set_float("alpha", 0.1);
        shader.set_float("alpha", 0.9);

        let mut recorder = RecordingBackend::new();
        shader.apply_uniforms(&mut recorder);
        assert_eq!(
            recorder.count_calls(|c| matches!(c, BackendCall::SetUniform(..))),
            1
        );
    }

    // ── sampler units ─────────────────────────────────────────────────────

    #[test]
    fn sampler_units_start_at_one() {
        let device = Arc::new(crate::device::GraphicsDeviceContext::new());
        let (backend, shared) = setup();
        let mut shader = Shader::from_source(&shared, "vs", "fs").unwrap();
        backend.lock().define_uniform(shader.native_handle(), "mask");

        let texture = Texture::create(
            &device,
            &shared,
            4,
            4,
            crate::resources::TextureSettings::default(),
        )
        .unwrap();
        shader.set_texture("mask", &texture);

        let mut recorder = RecordingBackend::new();
        shader.apply_uniforms(&mut recorder);
        assert!(
            recorder
                .calls()
                .contains(&BackendCall::BindTextureToUnit(1, texture.native_handle()))
        );
    }

    // ── capability gating ─────────────────────────────────────────────────

    #[test]
    fn creation_fails_without_shader_support() {
        let (backend, shared) = setup();
        backend.lock().without_capability(Capability::Shaders);

        assert!(!Shader::is_available(&shared));
        assert!(Shader::from_source(&shared, "vs", "fs").is_err());
    }
}
