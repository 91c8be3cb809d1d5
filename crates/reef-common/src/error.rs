//! Error types for Reef.

use std::path::PathBuf;

use thiserror::Error;

/// GPU-specific errors.
#[derive(Debug, Error)]
pub enum GpuError {
    /// No adapter can present to the window surface
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    /// Surface creation or configuration failed
    #[error("Surface error: {0}")]
    Surface(String),

    /// Device request failed
    #[error("Device request failed: {0}")]
    Device(String),
}

/// Errors raised while loading image assets.
#[derive(Debug, Error)]
pub enum AssetError {
    /// File not found
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// Path of the asset
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Image decode error
    #[error("Failed to decode {}: {message}", path.display())]
    Decode {
        /// Path of the asset
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// Image has a zero dimension
    #[error("Image {} is empty ({width}x{height})", path.display())]
    Empty {
        /// Path of the asset
        path: PathBuf,
        /// Decoded width
        width: u32,
        /// Decoded height
        height: u32,
    },
}

/// Errors raised while building a scene.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// A relative orbit refers to a sprite that is not evaluated before it
    #[error("Sprite {sprite} orbits sprite {anchor}, which is not an earlier sprite")]
    AnchorOutOfOrder {
        /// Index of the orbiting sprite
        sprite: usize,
        /// Index it is anchored to
        anchor: usize,
    },
}
