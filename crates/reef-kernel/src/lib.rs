//! # Reef Kernel
//!
//! GPU side of the reef scene.
//!
//! This crate provides:
//! - Image decoding and texture upload for sprites
//! - An instanced sprite pipeline that draws rotated, stretched quads
//!
//! Sprite coordinates are canvas pixels with the origin in the top-left
//! corner and y pointing down. The pipeline maps the canvas onto whatever
//! surface it renders to.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod sprite_render;
pub mod texture;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::sprite_render::*;
    pub use crate::texture::*;
}

pub use prelude::*;
