//! Shared graphics device state.
//!
//! This module is responsible for:
//! - issuing process-unique identifiers for render targets and
//!   mutable graphics resources
//! - tracking which render target was last activated on each native
//!   graphics context
//!
//! Both concerns live on an explicit [`GraphicsDeviceContext`] that
//! targets and resources receive at construction, rather than on
//! process-wide globals, which keeps tests isolated from each other.

mod context;
mod id;

pub use context::{Activation, GraphicsDeviceContext};
pub use id::{ResourceId, TargetId};
