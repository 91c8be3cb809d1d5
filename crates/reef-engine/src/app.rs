//! Application lifecycle management.
//!
//! Owns the window, the scene and the renderer, and runs one
//! update-then-render step per redraw until the window is closed.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use reef_scene::{Scene, CANVAS_HEIGHT, CANVAS_WIDTH};

use crate::config::EngineConfig;
use crate::lifecycle::{ExitReason, Lifecycle};
use crate::renderer::Renderer;
use crate::timing::{FpsCounter, FrameTiming};

/// Window title.
const WINDOW_TITLE: &str = "Simple 2D Scene";
/// Window size in pixels; the canvas maps onto it one to one.
const WINDOW_SIZE: PhysicalSize<u32> = PhysicalSize::new(CANVAS_WIDTH as u32, CANVAS_HEIGHT as u32);
/// Frames per second the loop is paced to.
const TARGET_FPS: u32 = 60;

/// Application state.
struct ReefApp {
    /// Diagnostics configuration
    config: EngineConfig,
    /// Window handle (created after resume)
    window: Option<Arc<Window>>,
    /// Renderer (initialized after window creation)
    renderer: Option<Renderer>,
    /// Animated scene
    scene: Scene,
    /// Running or terminated
    lifecycle: Lifecycle,
    /// Frame timing
    timing: FrameTiming,
    /// FPS counter for diagnostics
    fps_counter: FpsCounter,
}

impl ReefApp {
    /// Creates a new application instance.
    fn new(config: EngineConfig, scene: Scene) -> Self {
        Self {
            config,
            window: None,
            renderer: None,
            scene,
            lifecycle: Lifecycle::new(),
            timing: FrameTiming::new(TARGET_FPS),
            fps_counter: FpsCounter::new(),
        }
    }

    /// One iteration of the loop: update the scene, then draw it.
    fn update_and_render(&mut self) {
        let dt = self.timing.delta_time();
        self.scene.update(dt);

        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.render(&self.scene) {
                warn!("Render error: {e:#}");
            }
        }

        if let Some((fps, frame_time)) = self.fps_counter.tick() {
            if self.config.show_fps {
                debug!(
                    "{fps:.0} FPS ({frame_time:.2} ms), {}",
                    self.scene.time_of_day().display_name()
                );
            }
        }

        // Frame rate limiting
        self.timing.sleep_remainder();
    }

    /// Stops producing frames and leaves the event loop.
    fn close(&mut self, event_loop: &ActiveEventLoop, reason: ExitReason) {
        self.lifecycle.request_exit(reason);
        event_loop.exit();
    }
}

impl ApplicationHandler for ReefApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        info!("Application resumed, creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(WINDOW_SIZE);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                warn!("Failed to create window: {e}");
                event_loop.exit();
                return;
            },
        };
        info!("Window created successfully");

        match pollster::block_on(Renderer::new(Arc::clone(&window))) {
            Ok(mut renderer) => {
                renderer.load_textures(&self.scene);
                self.renderer = Some(renderer);
            },
            Err(e) => {
                warn!("Failed to initialize renderer: {e:#}");
            },
        }

        window.request_redraw();
        self.window = Some(window);

        // Reset timing after window creation
        self.timing.reset();

        info!(
            "Reef ready - {}x{} @ {TARGET_FPS} FPS target",
            WINDOW_SIZE.width, WINDOW_SIZE.height
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close(event_loop, ExitReason::WindowClose);
            },
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(reason) = ExitReason::from_key(event.physical_key, event.state) {
                    self.close(event_loop, reason);
                }
            },
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
            },
            WindowEvent::RedrawRequested => {
                if !self.lifecycle.begin_frame() {
                    return;
                }

                self.update_and_render();

                // Request next frame
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            },
            _ => {},
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // GPU resources go before the window they present to
        if let Some(mut renderer) = self.renderer.take() {
            renderer.shutdown();
        }
        self.window = None;

        let reason = self
            .lifecycle
            .exit_reason()
            .map_or("Event Loop Ended", ExitReason::display_name);
        info!(
            "Window closed ({reason}) after {} frames, averaging {:.0} FPS ({:.2} ms)",
            self.lifecycle.frames(),
            self.timing.current_fps(),
            self.timing.average_frame_time_ms()
        );
    }
}

/// Runs the main application loop.
pub fn run() -> Result<()> {
    let config = EngineConfig::load();
    info!("FPS logging: {}", config.show_fps);

    let scene = Scene::reef()?;

    info!("Creating event loop...");
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ReefApp::new(config, scene);

    info!("Starting event loop...");
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_scene::{TimeOfDay, SEA_TURTLE};

    fn app() -> ReefApp {
        let scene = Scene::reef().expect("reef scene is well ordered");
        ReefApp::new(EngineConfig::default(), scene)
    }

    #[test]
    fn test_window_constants() {
        assert_eq!(WINDOW_TITLE, "Simple 2D Scene");
        assert_eq!((WINDOW_SIZE.width, WINDOW_SIZE.height), (1280, 720));
        assert_eq!(TARGET_FPS, 60);
    }

    #[test]
    fn test_new_app_is_idle_until_resumed() {
        let app = app();
        assert!(app.window.is_none());
        assert!(app.renderer.is_none());
        assert!(app.lifecycle.is_running());
    }

    #[test]
    fn test_frames_without_renderer_still_animate() {
        let mut app = app();

        assert!(app.lifecycle.begin_frame());
        app.update_and_render();

        // The first update moves the turtle from the canvas center onto its oval
        let turtle = &app.scene.sprites()[SEA_TURTLE];
        assert!(turtle.position().x > 800.0);
        assert_eq!(app.scene.time_of_day(), TimeOfDay::Morning);
        assert_eq!(app.lifecycle.frames(), 1);
    }
}
