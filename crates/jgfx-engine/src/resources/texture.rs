use std::sync::Arc;

use anyhow::{Context, Result};

use crate::backend::{NativeHandle, SharedBackend};
use crate::device::{GraphicsDeviceContext, ResourceId};

/// Sampling and storage attributes of a texture.
///
/// `srgb` is fixed at creation; filtering and wrapping can be changed
/// later through the setters on [`Texture`].
#[derive(Debug, Copy, Clone, Default)]
pub struct TextureSettings {
    /// Linear filtering when sampled at non-native scale.
    pub smooth: bool,
    /// Coordinates outside the texture wrap instead of clamping.
    pub repeated: bool,
    /// Pixel data is sRGB-encoded.
    pub srgb: bool,
}

/// GPU-side pixel storage.
///
/// Every pixel mutation re-issues [`cache_id`](Self::cache_id), which
/// is how a render target notices it must rebind without comparing
/// contents. A texture flagged as framebuffer attachment opts out of
/// that protocol entirely: its contents can change through GPU-side
/// writes the id never sees, so consumers rebind it unconditionally.
pub struct Texture {
    device: Arc<GraphicsDeviceContext>,
    backend: SharedBackend,
    handle: NativeHandle,
    width: u32,
    height: u32,
    settings: TextureSettings,
    framebuffer_attachment: bool,
    cache_id: ResourceId,
}

impl Texture {
    /// Allocates backend storage for a `width × height` RGBA texture.
    pub fn create(
        device: &Arc<GraphicsDeviceContext>,
        backend: &SharedBackend,
        width: u32,
        height: u32,
        settings: TextureSettings,
    ) -> Result<Self> {
        anyhow::ensure!(
            width > 0 && height > 0,
            "texture size must be non-zero (got {width}x{height})"
        );

        let handle = {
            let mut backend = backend.lock();
            let handle = backend
                .create_texture(width, height)
                .with_context(|| format!("backend failed to allocate a {width}x{height} texture"))?;
            backend.set_texture_smooth(handle, settings.smooth);
            backend.set_texture_repeated(handle, settings.repeated);
            handle
        };

        Ok(Self {
            device: Arc::clone(device),
            backend: Arc::clone(backend),
            handle,
            width,
            height,
            settings,
            framebuffer_attachment: false,
            cache_id: device.next_resource_id(),
        })
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    /// Identity of the current pixel contents.
    #[inline]
    pub fn cache_id(&self) -> ResourceId {
        self.cache_id
    }

    #[inline]
    pub fn is_smooth(&self) -> bool {
        self.settings.smooth
    }

    #[inline]
    pub fn is_repeated(&self) -> bool {
        self.settings.repeated
    }

    #[inline]
    pub fn is_srgb(&self) -> bool {
        self.settings.srgb
    }

    #[inline]
    pub fn is_framebuffer_attachment(&self) -> bool {
        self.framebuffer_attachment
    }

    /// Flags this texture as the color attachment of a live render
    /// target.
    pub fn set_framebuffer_attachment(&mut self, attachment: bool) {
        self.framebuffer_attachment = attachment;
    }

    /// Replaces the whole pixel contents with `pixels` (RGBA bytes).
    pub fn update(&mut self, pixels: &[u8]) -> Result<()> {
        let expected = self.width as usize * self.height as usize * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "pixel data is {} bytes, texture needs {expected}",
            pixels.len()
        );

        self.backend
            .lock()
            .upload_texture_pixels(self.handle, self.width, self.height, pixels);

        // New contents, new identity.
        self.cache_id = self.device.next_resource_id();
        Ok(())
    }

    /// Filtering only affects sampling, not contents; the cache id
    /// stays put.
    pub fn set_smooth(&mut self, smooth: bool) {
        if self.settings.smooth != smooth {
            self.settings.smooth = smooth;
            self.backend.lock().set_texture_smooth(self.handle, smooth);
        }
    }

    pub fn set_repeated(&mut self, repeated: bool) {
        if self.settings.repeated != repeated {
            self.settings.repeated = repeated;
            self.backend.lock().set_texture_repeated(self.handle, repeated);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.backend.lock().delete_texture(self.handle);
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("handle", &self.handle)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("settings", &self.settings)
            .field("framebuffer_attachment", &self.framebuffer_attachment)
            .field("cache_id", &self.cache_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::backend::{BackendCall, RecordingBackend};

    fn setup() -> (Arc<GraphicsDeviceContext>, Arc<Mutex<RecordingBackend>>, SharedBackend) {
        let device = Arc::new(GraphicsDeviceContext::new());
        let backend = Arc::new(Mutex::new(RecordingBackend::new()));
        // Unsize at the binding; annotating `Arc::clone` directly would
        // force the trait-object type onto its argument.
        let shared: SharedBackend = backend.clone();
        (device, backend, shared)
    }

    // ── creation ──────────────────────────────────────────────────────────

    #[test]
    fn create_rejects_zero_size() {
        let (device, _backend, shared) = setup();
        assert!(Texture::create(&device, &shared, 0, 64, TextureSettings::default()).is_err());
    }

    #[test]
    fn create_applies_settings() {
        let (device, backend, shared) = setup();
        let settings = TextureSettings {
            smooth: true,
            repeated: true,
            srgb: false,
        };
        let texture = Texture::create(&device, &shared, 8, 8, settings).unwrap();

        let handle = texture.native_handle();
        let backend = backend.lock();
        assert!(
            backend
                .calls()
                .contains(&BackendCall::SetTextureSmooth(handle, true))
        );
        assert!(
            backend
                .calls()
                .contains(&BackendCall::SetTextureRepeated(handle, true))
        );
    }

    // ── cache-id protocol ─────────────────────────────────────────────────

    #[test]
    fn update_bumps_cache_id() {
        let (device, _backend, shared) = setup();
        let mut texture = Texture::create(&device, &shared, 2, 2, TextureSettings::default()).unwrap();

        let before = texture.cache_id();
        texture.update(&[0u8; 16]).unwrap();
        assert_ne!(texture.cache_id(), before);
    }

    #[test]
    fn set_smooth_keeps_cache_id() {
        let (device, _backend, shared) = setup();
        let mut texture = Texture::create(&device, &shared, 2, 2, TextureSettings::default()).unwrap();

        let before = texture.cache_id();
        texture.set_smooth(true);
        assert_eq!(texture.cache_id(), before);
    }

    #[test]
    fn update_validates_length() {
        let (device, _backend, shared) = setup();
        let mut texture = Texture::create(&device, &shared, 2, 2, TextureSettings::default()).unwrap();

        assert!(texture.update(&[0u8; 15]).is_err());
        // Failed updates leave the identity untouched.
        let id = texture.cache_id();
        let _ = texture.update(&[0u8; 3]);
        assert_eq!(texture.cache_id(), id);
    }

    // ── lifetime ──────────────────────────────────────────────────────────

    #[test]
    fn drop_releases_backend_storage() {
        let (device, backend, shared) = setup();
        let handle = {
            let texture =
                Texture::create(&device, &shared, 4, 4, TextureSettings::default()).unwrap();
            texture.native_handle()
        };

        assert!(
            backend
                .lock()
                .calls()
                .contains(&BackendCall::DeleteTexture(handle))
        );
    }
}
