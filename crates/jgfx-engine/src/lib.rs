//! jgfx engine crate.
//!
//! 2D draw dispatch with lazy GPU-state caching over an abstract
//! backend. A [`render::RenderTarget`] tracks the backend state it last
//! applied and, per draw, issues only the state changes that actually
//! differ, while a shared [`device::GraphicsDeviceContext`] tracks
//! which target may trust its cache on each native context.

pub mod backend;
pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod resources;
