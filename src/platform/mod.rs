//=========================================================================
// Platform Subsystem
//
// Desktop and mobile host shell built on winit. Stands in for the phone
// activity: owns the single window, forwards its lifecycle to the render
// thread, and feeds touch input into the queue.
//
// Architecture:
// ```text
//  Main Thread:                     Render Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  RenderLoopDriver    │
//  │   ├─ resumed/suspended ──┼────┼─► SurfaceCommand     │
//  │   ├─ Resized ────────────┼────┼─► SurfaceCommand     │
//  │   ├─ CloseRequested ─────┼────┼─► SurfaceCommand     │
//  │   ├─ about_to_wait ◄─────┼────┼── finished flag      │
//  │   │                      │    │                      │
//  │   └─ Touch / Mouse       │    │   drain → forward    │
//  │       ↓                  │    │   render_frame       │
//  │      TouchTranslator     │    │                      │
//  │       ↓                  │    │                      │
//  │      TouchInput ─────────┼────┼─► InputQueue         │
//  └──────────────────────────┘    └──────────────────────┘
// ```
//
// Key Design Decisions:
// - **Window created lazily in `resumed()`**: required on mobile, where
//   no surface exists before the first resume
// - **Nothing here touches the engine**: all native calls happen on the
//   render thread
// - **Mouse emulation is opt-in**: a pressed left button acts as one
//   touch contact with a reserved pointer id
// - **A stopped render thread closes the window**: a failed post or the
//   finished flag (checked in `about_to_wait`) exits the event loop, so
//   `Bridge::run` reports the engine error right away
//
//=========================================================================

//=== Submodules ==========================================================

mod touch_translator;

pub use touch_translator::MOUSE_POINTER_ID;

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== External Crates =====================================================

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::TouchInput;
use crate::core::platform_bridge::{PlatformError, SurfaceCommand};
use crate::core::render_thread::SurfaceHandle;
use touch_translator::{TouchTranslator, MOUSE_TOUCH_ID};

/// How often an idle event loop wakes to check on the render thread.
const LIVENESS_POLL: Duration = Duration::from_millis(50);

//=== WindowConfig ========================================================

/// Initial window attributes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) mouse_emulation: bool,
}

//=== Platform ============================================================

/// Window owner and host-callback forwarder.
///
/// Runs on the main thread (winit requirement on macOS/iOS). Talks to the
/// render thread only through `SurfaceHandle` and `TouchInput`.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()`).
    window: Option<Window>,
    config: WindowConfig,
    surface: SurfaceHandle,
    input: TouchInput,
    translator: TouchTranslator,
    cursor: (f32, f32),
    failure: Option<PlatformError>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(config: WindowConfig, surface: SurfaceHandle, input: TouchInput) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            config,
            surface,
            input,
            translator: TouchTranslator::new(),
            cursor: (0.0, 0.0),
            failure: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails, or if the window could not be created.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)?;

        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    //--- Input ------------------------------------------------------------

    /// Routes one contact update through the translator into the queue.
    fn on_contact(&mut self, phase: TouchPhase, touch_id: u64, x: f32, y: f32) {
        if let Some(raw) = self.translator.translate(phase, touch_id, x, y) {
            let queued = self.input.on_touch(&raw);
            trace!(
                target: "platform::input",
                "{:?} for touch {} queued {} events ({} contacts)",
                raw.action,
                touch_id,
                queued,
                self.translator.active_count()
            );
        }
    }

    fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if !self.config.mouse_emulation || button != MouseButton::Left {
            return;
        }
        let phase = match state {
            ElementState::Pressed => TouchPhase::Started,
            ElementState::Released => TouchPhase::Ended,
        };
        let (x, y) = self.cursor;
        self.on_contact(phase, MOUSE_TOUCH_ID, x, y);
    }

    fn on_cursor_moved(&mut self, x: f32, y: f32) {
        self.cursor = (x, y);
        if self.config.mouse_emulation {
            // Ignored by the translator unless the button is held.
            self.on_contact(TouchPhase::Moved, MOUSE_TOUCH_ID, x, y);
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Posts a lifecycle command to the render thread.
    ///
    /// Returns `false` (and drops the window) once the render thread has
    /// stopped; the caller then exits the event loop.
    fn forward(&mut self, command: SurfaceCommand) -> bool {
        if self.surface.post(command) {
            return true;
        }
        error!(target: "platform", "Render thread stopped, closing window");
        self.window = None;
        false
    }

    fn render_thread_lost(&self) -> bool {
        self.surface.is_render_finished()
    }

    fn on_close(&mut self, event_loop: &ActiveEventLoop) {
        self.surface.destroyed();
        self.window = None;
        event_loop.exit();
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called at startup and on every mobile resume.
    ///
    /// The first call creates the window, which is the surface-created
    /// moment; later calls resume rendering.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Host resumed");
            if !self.forward(SurfaceCommand::Resumed) {
                event_loop.exit();
            }
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.window = Some(window);
                let resized = SurfaceCommand::Resized {
                    width: size.width,
                    height: size.height,
                };
                if !self.forward(SurfaceCommand::Created) || !self.forward(resized) {
                    event_loop.exit();
                }
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.failure = Some(PlatformError::WindowCreation(e));
                self.on_close(event_loop);
            }
        }
    }

    fn suspended(&mut self, event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Host suspended");
        if !self.forward(SurfaceCommand::Paused) {
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.on_close(event_loop);
            }

            WindowEvent::Resized(size) => {
                let command = SurfaceCommand::Resized {
                    width: size.width,
                    height: size.height,
                };
                if !self.forward(command) {
                    event_loop.exit();
                }
            }

            WindowEvent::Touch(touch) => {
                self.on_contact(
                    touch.phase,
                    touch.id,
                    touch.location.x as f32,
                    touch.location.y as f32,
                );
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.on_mouse_button(button, state);
            }

            _ => {}
        }
    }

    /// Exits as soon as the render thread stops; otherwise wakes again
    /// after `LIVENESS_POLL` to check.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.render_thread_lost() {
            error!(target: "platform", "Render thread finished, leaving event loop");
            self.window = None;
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::wait_duration(LIVENESS_POLL));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        debug!(target: "platform", "Event loop exiting");
        self.surface.destroyed();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
