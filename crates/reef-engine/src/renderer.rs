//! GPU renderer using wgpu.
//!
//! Clears the surface to the scene's background color and draws every
//! sprite whose texture loaded.

use std::sync::Arc;

use anyhow::{Context, Result};
use reef_common::{GpuError, Rgba8};
use reef_kernel::{SpriteDraw, SpriteRenderer};
use reef_scene::{Scene, CANVAS_HEIGHT, CANVAS_WIDTH};
use tracing::{debug, info, warn};
use winit::{dpi::PhysicalSize, window::Window};

/// Main renderer that manages GPU resources and rendering.
pub struct Renderer {
    /// wgpu surface for presenting to the window
    surface: wgpu::Surface<'static>,
    /// wgpu device for GPU operations
    device: wgpu::Device,
    /// wgpu queue for submitting commands
    queue: wgpu::Queue,
    /// Surface configuration
    config: wgpu::SurfaceConfiguration,
    /// Current surface size
    size: PhysicalSize<u32>,
    /// Sprite pipeline and textures
    sprites: SpriteRenderer,
    /// Frames presented
    frame_count: u64,
}

impl Renderer {
    /// Creates a new renderer for the given window.
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            dx12_shader_compiler: wgpu::Dx12Compiler::Fxc,
            flags: wgpu::InstanceFlags::default(),
            gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
        });

        // The surface holds its own handle to the window
        let surface = instance
            .create_surface(window)
            .map_err(|e| GpuError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        info!("Using GPU adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Reef Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| GpuError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("Surface reports no texture formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: PRESENT_MODE,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        debug!("Surface configured: {surface_format:?} {:?}", config.present_mode);

        info!("Initializing sprite pipeline...");
        let sprites = SpriteRenderer::new(&device, surface_format, 3);
        sprites.set_canvas_size(&queue, CANVAS_WIDTH, CANVAS_HEIGHT);

        info!("Renderer initialized successfully");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            sprites,
            frame_count: 0,
        })
    }

    /// Loads the texture of every sprite in `scene`.
    ///
    /// Failures are logged and leave that sprite undrawn. Returns the number
    /// of textures loaded.
    pub fn load_textures(&mut self, scene: &Scene) -> usize {
        for (slot, sprite) in scene.sprites().iter().enumerate() {
            if let Err(e) = self
                .sprites
                .load_texture(&self.device, &self.queue, slot, sprite.texture())
            {
                warn!("Texture for {} not loaded, sprite will be skipped: {e}", sprite.name());
            }
        }

        let loaded = self.sprites.loaded_texture_count();
        info!("Loaded {loaded}/{} sprite textures", scene.sprites().len());
        loaded
    }

    /// Resizes the renderer to match the new window size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            debug!("Surface resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Renders one frame of `scene`.
    ///
    /// Returns `Ok(false)` when the frame was skipped because the surface had
    /// to be reconfigured.
    pub fn render(&mut self, scene: &Scene) -> Result<bool> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.resize(self.size);
                return Ok(false);
            },
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface texture timed out, skipping frame");
                return Ok(false);
            },
            Err(e) => return Err(e).context("Failed to get surface texture"),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draws = sprite_draws(scene);
        self.sprites.prepare(&self.device, &self.queue, &draws);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(scene.background())),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sprites.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frame_count += 1;
        Ok(true)
    }

    /// Releases sprite textures. The renderer draws only the background
    /// afterwards.
    pub fn shutdown(&mut self) {
        let released = self.sprites.release_textures();
        info!(
            "Renderer shut down after {} frames, released {released} textures",
            self.frame_count
        );
    }
}

/// Frames are paced by [`crate::timing::FrameTiming`], not by presentation.
const PRESENT_MODE: wgpu::PresentMode = wgpu::PresentMode::AutoNoVsync;

/// Background clear color; the surface is sRGB so channels go in linear.
fn clear_color(color: Rgba8) -> wgpu::Color {
    let [r, g, b, a] = color.to_linear();
    wgpu::Color { r, g, b, a }
}

/// Builds one draw per sprite, in scene order.
fn sprite_draws(scene: &Scene) -> Vec<SpriteDraw> {
    scene
        .sprites()
        .iter()
        .enumerate()
        .map(|(slot, sprite)| {
            let rect = sprite.dest_rect();
            let center = rect.center();
            SpriteDraw {
                slot,
                center: center.to_array(),
                size: rect.size().to_array(),
                rotation_degrees: sprite.angle(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_scene::{JELLYFISH, PUFFERFISH, SEA_TURTLE};

    fn reef() -> Scene {
        Scene::reef().expect("reef scene is well ordered")
    }

    #[test]
    fn test_clear_color_black_and_white() {
        let black = clear_color(Rgba8::BLACK);
        assert_eq!((black.r, black.g, black.b, black.a), (0.0, 0.0, 0.0, 1.0));

        let white = clear_color(Rgba8::WHITE);
        assert!((white.r - 1.0).abs() < 1e-9);
        assert!((white.b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sprite_draws_follow_scene() {
        let mut scene = reef();
        scene.update(0.0);

        let draws = sprite_draws(&scene);
        assert_eq!(draws.len(), 3);

        let turtle = &draws[SEA_TURTLE];
        assert_eq!(turtle.slot, SEA_TURTLE);
        assert_eq!(turtle.center, [940.0, 360.0]);
        assert_eq!(turtle.size, [200.0, 200.0]);

        assert_eq!(draws[JELLYFISH].size, [120.0, 120.0]);
        assert_eq!(draws[PUFFERFISH].center, [470.0, 360.0]);
    }

    #[test]
    fn test_sprite_draws_carry_rotation() {
        let mut scene = reef();
        scene.update(0.5);

        let draws = sprite_draws(&scene);
        let jellyfish = &scene.sprites()[JELLYFISH];
        assert_eq!(draws[JELLYFISH].rotation_degrees, jellyfish.angle());
        assert!(draws[JELLYFISH].rotation_degrees != 0.0);
    }
}
