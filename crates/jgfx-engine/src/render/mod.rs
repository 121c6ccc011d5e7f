//! Draw dispatch over an abstract backend.
//!
//! The centerpiece is [`RenderTarget`], which owns a 2D camera
//! ([`View`]) and a cache of the backend state it last applied. Draw
//! calls carry geometry plus a [`RenderStates`] bundle; the target
//! issues only the backend state changes that differ from its cache.
//!
//! Convention:
//! - geometry positions are world units (top-left origin, +Y down)
//! - the view's projection maps world units to device coordinates

mod states;
mod target;
mod view;
mod vertex;

pub use states::RenderStates;
pub use target::{RenderTarget, TargetInit};
pub use vertex::Vertex;
pub use view::View;
