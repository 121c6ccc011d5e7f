//! Coordinate and geometry types shared across the render stack.
//!
//! Canonical CPU space:
//! - World units map to logical pixels under the default view
//! - Origin top-left
//! - +X right, +Y down
//!
//! The projection set up by a `View` converts world units to the
//! backend's homogeneous device coordinates.

mod int_rect;
mod rect;
mod transform;
mod vec2;

pub use int_rect::IntRect;
pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
