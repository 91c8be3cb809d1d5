//! # Reef
//!
//! Animated 2D scene: a sea turtle, a jellyfish and a pufferfish moving over
//! a background that cycles through four times of day.
//!
//! The binary ties together:
//! - Scene: sprite motion and the day cycle
//! - Kernel: textures and the sprite pipeline
//! - Engine: window, event loop, frame timing and configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod lifecycle;
mod renderer;
mod timing;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("reef=info".parse()?))
        .init();

    info!("Reef starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // The process exits cleanly whatever happened in the loop
    if let Err(e) = app::run() {
        error!("Event loop failed: {e:#}");
    }

    info!("Reef shutdown complete");
    Ok(())
}
