//! Color and blending model shared between geometry and the backend.
//!
//! Scope:
//! - vertex/clear color representation (straight-alpha RGBA bytes)
//! - blend modes as distinct source/destination/equation triples for
//!   the color and alpha channels
//!
//! Geometry types remain in `coords`.

mod blend;
mod color;

pub use blend::{BlendEquation, BlendFactor, BlendMode};
pub use color::Color;
