//! # Reef Common
//!
//! Shared types for the Reef scene.
//!
//! - Error types used by the scene, kernel and engine crates
//! - 8-bit RGBA color with sRGB to linear conversion
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::error::*;
}

pub use prelude::*;
