use std::sync::Arc;

use anyhow::{Context, Result};

use crate::backend::{Capability, NativeHandle, PrimitiveType, SharedBackend};
use crate::render::Vertex;

/// Expected update frequency, passed to the backend as an allocation
/// hint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times.
    Static,
    /// Occasionally re-uploaded.
    Dynamic,
    /// Re-uploaded roughly every frame.
    Stream,
}

/// Backend-side vertex storage for geometry too large to re-send every
/// frame.
///
/// The buffer carries its own primitive type; a draw spans a
/// `[first, first + count)` range of its vertices.
pub struct VertexBuffer {
    backend: SharedBackend,
    handle: NativeHandle,
    primitive: PrimitiveType,
    usage: BufferUsage,
    vertex_count: usize,
}

impl VertexBuffer {
    /// Whether the backend supports vertex buffers at all.
    pub fn is_available(backend: &SharedBackend) -> bool {
        backend.lock().supports(Capability::VertexBuffers)
    }

    /// Allocates backend storage for `vertex_count` vertices.
    pub fn create(
        backend: &SharedBackend,
        primitive: PrimitiveType,
        usage: BufferUsage,
        vertex_count: usize,
    ) -> Result<Self> {
        anyhow::ensure!(vertex_count > 0, "vertex buffer must hold at least one vertex");

        let handle = {
            let mut locked = backend.lock();
            anyhow::ensure!(
                locked.supports(Capability::VertexBuffers),
                "vertex buffers are not supported by this backend"
            );
            locked
                .create_vertex_buffer(vertex_count, usage)
                .with_context(|| {
                    format!("backend failed to allocate a vertex buffer of {vertex_count} vertices")
                })?
        };

        Ok(Self {
            backend: Arc::clone(backend),
            handle,
            primitive,
            usage,
            vertex_count,
        })
    }

    #[inline]
    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    #[inline]
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn set_primitive(&mut self, primitive: PrimitiveType) {
        self.primitive = primitive;
    }

    /// Re-uploads vertex data starting at the beginning of the buffer.
    pub fn update(&mut self, vertices: &[Vertex]) -> Result<()> {
        anyhow::ensure!(
            vertices.len() <= self.vertex_count,
            "{} vertices do not fit a buffer of {}",
            vertices.len(),
            self.vertex_count
        );

        self.backend.lock().upload_vertex_buffer(self.handle, vertices);
        Ok(())
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        self.backend.lock().delete_vertex_buffer(self.handle);
    }
}

impl std::fmt::Debug for VertexBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexBuffer")
            .field("handle", &self.handle)
            .field("primitive", &self.primitive)
            .field("usage", &self.usage)
            .field("vertex_count", &self.vertex_count)
            .finish_non_exhaustive()
    }
}
