//! # Hunter Common
//!
//! Common types, utilities, and shared abstractions for Monster Hunter.
//!
//! This crate provides foundational types used across all subsystems:
//! - Planar math (vectors, rectangles, facing directions)
//! - ID types (EntityId, CharacterId)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod math;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::math::*;
}

pub use prelude::*;
