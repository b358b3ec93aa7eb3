//! Backdrop builder and lifecycle.
//!
//! [`Backdrop`] configures and runs one animated scene: it owns the winit
//! application, the scene context, the pointer tracker and the GPU state, and
//! walks the `Uninitialized -> Running -> Disposed` lifecycle exactly once.
//! Disposal is idempotent and reachable from every exit path, including
//! GPU-acquisition failure before the loop ever starts.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::BackdropError;
use crate::gpu::GpuState;
use crate::input::PointerTracker;
use crate::scene::{Scene, SceneConfig};

/// An animated backdrop builder.
///
/// Use method chaining to configure, then call `.run()` to start. `run`
/// blocks until the window is closed and returns an error only when the
/// backdrop could not be mounted at all.
///
/// ```ignore
/// use polydrift::Backdrop;
///
/// Backdrop::new()
///     .with_particle_count(15)
///     .with_bounds(6.0)
///     .run()?;
/// ```
pub struct Backdrop {
    config: SceneConfig,
    title: String,
    size: (u32, u32),
}

impl Backdrop {
    /// Create a backdrop with default settings.
    pub fn new() -> Self {
        Self {
            config: SceneConfig::default(),
            title: "polydrift".to_string(),
            size: (1280, 720),
        }
    }

    /// Set the size of the particle pool.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.config.particle_count = count;
        self
    }

    /// Set the bounding half-extent particles reflect off on x and y.
    pub fn with_bounds(mut self, bounds: f32) -> Self {
        self.config.bounds = bounds;
        self
    }

    /// Set how far the camera is displaced at full pointer deflection.
    pub fn with_parallax(mut self, parallax: f32) -> Self {
        self.config.parallax = parallax;
        self
    }

    /// Set the camera easing coefficient (fraction of remaining distance per
    /// frame).
    pub fn with_ease(mut self, ease: f32) -> Self {
        self.config.ease = ease;
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the logical window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Run the backdrop. Blocks until the window is closed.
    pub fn run(self) -> Result<(), BackdropError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of a mounted backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing built yet; no resources held.
    Uninitialized,
    /// Scene and GPU are live, frames are being produced.
    Running,
    /// Terminal: resources released, handlers inert, no further frames.
    Disposed,
}

struct App {
    config: SceneConfig,
    title: String,
    size: (u32, u32),
    phase: Phase,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: Option<Scene>,
    tracker: PointerTracker,
    frames: u64,
    failure: Option<BackdropError>,
}

impl App {
    fn new(backdrop: Backdrop) -> Self {
        let (width, height) = backdrop.size;
        Self {
            config: backdrop.config,
            title: backdrop.title,
            size: backdrop.size,
            phase: Phase::Uninitialized,
            window: None,
            gpu: None,
            scene: None,
            tracker: PointerTracker::new(width, height),
            frames: 0,
            failure: None,
        }
    }

    /// Tear the backdrop down. Safe to call any number of times, from any
    /// state: the loop stops being re-armed, handlers go inert, and the GPU
    /// resources are dropped together.
    fn dispose(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }
        self.phase = Phase::Disposed;
        self.gpu = None;
        self.scene = None;
        log::debug!("backdrop disposed after {} frames", self.frames);
    }

    /// Advance the scene by one frame if the backdrop is live.
    ///
    /// Returns whether a frame was produced; the window event handler only
    /// draws and re-arms when it was.
    fn update(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        scene.step(self.tracker.pointer());
        self.frames += 1;
        true
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase != Phase::Uninitialized {
            return;
        }

        let (width, height) = self.size;
        let window_attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("window creation failed: {e}");
                self.failure = Some(BackdropError::Window(e));
                self.dispose();
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.tracker = PointerTracker::new(size.width, size.height);
        self.tracker.set_scale_factor(window.scale_factor());

        let scene = Scene::build(&self.config, self.tracker.viewport().aspect());

        match pollster::block_on(GpuState::new(
            window.clone(),
            &scene,
            self.tracker.viewport().scale_factor,
        )) {
            Ok(gpu) => {
                self.gpu = Some(gpu);
                self.scene = Some(scene);
                self.phase = Phase::Running;
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                // No surface means no backdrop: never start the loop.
                log::error!("GPU unavailable, backdrop disabled: {e}");
                self.failure = Some(e.into());
                self.dispose();
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.dispose();
                event_loop.exit();
            }

            // A disposed backdrop keeps its window but reacts to nothing else.
            _ if self.phase != Phase::Running => {}

            WindowEvent::Resized(physical_size) => {
                self.tracker.handle_event(&event);
                let scale_factor = self.tracker.viewport().scale_factor;
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size, scale_factor);
                }
                if let Some(scene) = &mut self.scene {
                    scene.camera.set_aspect(self.tracker.viewport().aspect());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } | WindowEvent::CursorMoved { .. } => {
                self.tracker.handle_event(&event);
            }

            WindowEvent::RedrawRequested => {
                if !self.update() {
                    return;
                }

                let result = match (self.gpu.as_mut(), self.scene.as_ref()) {
                    (Some(gpu), Some(scene)) => gpu.render(scene),
                    _ => return,
                };

                match result {
                    Ok(()) => {
                        if let Some(window) = &self.window {
                            window.request_redraw();
                        }
                    }
                    Err(e) => {
                        // A lost surface has no recovery path; stop animating
                        // instead of retrying.
                        log::error!("render failed, stopping backdrop: {e}");
                        self.dispose();
                    }
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_app() -> App {
        let mut app = App::new(Backdrop::new().with_particle_count(4));
        app.scene = Some(Scene::build(&app.config, 1.0));
        app.phase = Phase::Running;
        app
    }

    #[test]
    fn test_update_requires_running_phase() {
        let mut app = App::new(Backdrop::new());
        assert_eq!(app.phase, Phase::Uninitialized);
        assert!(!app.update());
        assert_eq!(app.frames, 0);
    }

    #[test]
    fn test_update_counts_frames_while_running() {
        let mut app = running_app();
        for _ in 0..10 {
            assert!(app.update());
        }
        assert_eq!(app.frames, 10);
    }

    #[test]
    fn test_dispose_stops_frames() {
        let mut app = running_app();
        app.update();
        app.update();

        app.dispose();
        assert_eq!(app.phase, Phase::Disposed);
        assert!(app.scene.is_none());

        for _ in 0..10 {
            assert!(!app.update());
        }
        assert_eq!(app.frames, 2);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut app = running_app();
        app.dispose();
        app.dispose();
        app.dispose();
        assert_eq!(app.phase, Phase::Disposed);
    }

    #[test]
    fn test_dispose_from_uninitialized() {
        // The early-return path before the loop ever started.
        let mut app = App::new(Backdrop::new());
        app.dispose();
        assert_eq!(app.phase, Phase::Disposed);
        assert!(!app.update());
    }
}
