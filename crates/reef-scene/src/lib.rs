//! # Reef Scene
//!
//! CPU-side state of the reef scene.
//!
//! This crate owns everything that changes from frame to frame:
//! - Sprites with their position, rotation, scale and phase accumulator
//! - Closed-form motion paths (orbit, pulse, spin)
//! - The four-phase day cycle and its background palette
//!
//! Nothing here touches the GPU. The engine advances a [`Scene`] with the
//! frame delta and hands it to the renderer by reference.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod motion;
pub mod palette;
pub mod scene;
pub mod sprite;
pub mod time_of_day;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::motion::*;
    pub use crate::palette::*;
    pub use crate::scene::*;
    pub use crate::sprite::*;
    pub use crate::time_of_day::*;
}

pub use prelude::*;
