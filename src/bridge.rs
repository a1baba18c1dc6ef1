//=========================================================================
// Surface Bridge
//
// Main entry point: the single long-lived bridge between one host surface
// and one native engine.
//
// Architecture:
// ```text
//     BridgeBuilder  ──build()──>  Bridge  ──┬─ create/resize/tick/...  (host drives)
//         │                          │       ├─ spawn_render_thread()   (owned thread)
//         ├─ with_fps()              │       └─ run()                   (winit host)
//         ├─ with_input_capacity()   └─ binds the asset source first
//         └─ with_command_backlog_warning()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::input::{input_queue, RawTouchEvent, TouchInput};
use crate::core::lifecycle::SurfaceState;
use crate::core::native::{AssetSource, NativeEngine};
use crate::core::render_loop::{RenderLoopDriver, TickOutcome};
use crate::core::render_thread::RenderThread;
use crate::core::BridgeError;
use crate::platform::{Platform, WindowConfig};

//=== BridgeBuilder =======================================================

/// Builder for configuring and constructing a [`Bridge`].
///
/// # Default Values
///
/// - **FPS**: 60.0 (render ticks per second, owned thread only)
/// - **Input capacity**: 256 events
/// - **Command backlog warning**: 32 pending lifecycle commands
/// - **Window**: "surface_bridge", 800x600, no mouse emulation
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use surface_bridge::{BridgeBuilder, DirAssetSource, NativeEngine};
///
/// fn start<E: NativeEngine + 'static>(engine: E) -> Result<(), surface_bridge::BridgeError> {
///     BridgeBuilder::new()
///         .with_fps(120.0)
///         .with_mouse_emulation(true)
///         .build(engine, Arc::new(DirAssetSource::new("assets")))?
///         .run()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BridgeBuilder {
    fps: f64,
    input_capacity: usize,
    command_backlog_warning: usize,
    window: WindowConfig,
}

impl BridgeBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            fps: 60.0,
            input_capacity: 256,
            command_backlog_warning: 32,
            window: WindowConfig {
                title: "surface_bridge".to_string(),
                width: 800,
                height: 600,
                mouse_emulation: false,
            },
        }
    }

    /// Sets the target frame rate of the owned render thread.
    ///
    /// Ignored when the host drives `tick()` itself.
    ///
    /// # Panics
    ///
    /// Panics if `fps <= 0.0`.
    pub fn with_fps(mut self, fps: f64) -> Self {
        assert!(fps > 0.0, "FPS must be positive, got {}", fps);
        self.fps = fps;
        self
    }

    /// Sets the input queue capacity.
    ///
    /// When the render thread falls behind by more than this many events,
    /// the oldest queued events are dropped.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_input_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Input capacity must be positive");
        self.input_capacity = capacity;
        self
    }

    /// Sets how many pending lifecycle commands trigger a warning.
    ///
    /// Lifecycle commands are never dropped and posting them never blocks;
    /// this only controls when a lagging render thread gets logged.
    ///
    /// # Panics
    ///
    /// Panics if `threshold == 0`.
    pub fn with_command_backlog_warning(mut self, threshold: usize) -> Self {
        assert!(threshold > 0, "Command backlog warning must be positive");
        self.command_backlog_warning = threshold;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Initial window size (logical pixels) for [`Bridge::run`].
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be positive");
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Treats the left mouse button as a single touch contact.
    pub fn with_mouse_emulation(mut self, enabled: bool) -> Self {
        self.window.mouse_emulation = enabled;
        self
    }

    /// Builds the bridge, binding `assets` to the engine first.
    ///
    /// # Errors
    ///
    /// Fails if the engine rejects the asset source.
    pub fn build<E: NativeEngine>(
        self,
        mut engine: E,
        assets: Arc<dyn AssetSource>,
    ) -> Result<Bridge<E>, BridgeError> {
        info!(
            target: "bridge",
            "Building bridge (FPS: {}, input: {}, command backlog warning: {})",
            self.fps,
            self.input_capacity,
            self.command_backlog_warning
        );

        if let Err(e) = engine.bind_asset_source(assets) {
            error!(target: "bridge", "{}", e);
            return Err(e.into());
        }

        let (tx, rx) = input_queue(self.input_capacity);
        Ok(Bridge {
            input: TouchInput::new(tx),
            driver: RenderLoopDriver::new(engine, rx),
            fps: self.fps,
            command_backlog_warning: self.command_backlog_warning,
            window: self.window,
        })
    }
}

impl Default for BridgeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Bridge ==============================================================

/// The surface-and-input bridge.
///
/// Exposes the host capability set {create, resize, tick, pause, resume,
/// touch}. A host that delivers every callback on its render thread can
/// call these directly; otherwise use [`split`](Self::split),
/// [`spawn_render_thread`](Self::spawn_render_thread), or
/// [`run`](Self::run).
pub struct Bridge<E: NativeEngine> {
    input: TouchInput,
    driver: RenderLoopDriver<E>,
    fps: f64,
    command_backlog_warning: usize,
    window: WindowConfig,
}

impl<E: NativeEngine> Bridge<E> {
    //--- Host Capabilities ------------------------------------------------

    pub fn create(&mut self) -> Result<(), BridgeError> {
        self.driver.surface_created()
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), BridgeError> {
        self.driver.surface_resized(width, height)
    }

    pub fn tick(&mut self) -> Result<TickOutcome, BridgeError> {
        self.driver.tick()
    }

    pub fn pause(&mut self) {
        self.driver.pause();
    }

    pub fn resume(&mut self) {
        self.driver.resume();
    }

    pub fn destroy(&mut self) {
        self.driver.destroy();
    }

    /// Normalizes and enqueues one raw touch callback.
    pub fn touch(&mut self, raw: &RawTouchEvent) -> usize {
        self.input.on_touch(raw)
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> SurfaceState {
        self.driver.state()
    }

    pub fn input(&self) -> &TouchInput {
        &self.input
    }

    pub fn driver(&self) -> &RenderLoopDriver<E> {
        &self.driver
    }

    //--- Threading --------------------------------------------------------

    /// Separates the producer half (input thread) from the render half.
    pub fn split(self) -> (TouchInput, RenderLoopDriver<E>) {
        (self.input, self.driver)
    }
}

impl<E: NativeEngine + 'static> Bridge<E> {
    /// Moves the render half onto its own thread.
    ///
    /// Lifecycle callbacks then go through [`RenderThread::surface`].
    pub fn spawn_render_thread(self) -> Result<(TouchInput, RenderThread), BridgeError> {
        let thread = RenderThread::spawn(self.driver, self.fps, self.command_backlog_warning)?;
        info!(target: "bridge", "Render thread spawned");
        Ok((self.input, thread))
    }

    /// Opens a winit window and blocks until it closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Spawns the render thread at the configured FPS
    /// 2. Runs the winit event loop on this thread (blocks here)
    /// 3. On close: posts Destroyed, then joins the render thread
    pub fn run(self) -> Result<(), BridgeError> {
        let window = self.window.clone();
        let (input, render) = self.spawn_render_thread()?;

        let platform = Platform::new(window, render.surface(), input);
        info!(target: "bridge", "Platform initialized, entering event loop");

        let platform_result = platform.run();
        if let Err(e) = &platform_result {
            error!(target: "bridge", "Platform error: {}", e);
        }

        let render_result = render.join();
        match &render_result {
            Ok(()) => info!(target: "bridge", "Render thread terminated cleanly"),
            Err(e) => error!(target: "bridge", "Render thread failed: {}", e),
        }

        platform_result?;
        render_result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{PointerKind, RawAction};
    use crate::core::native::{EngineCall, MemoryAssetSource};
    use crate::testing::{Call, RecordingEngine};
    use std::time::Duration;

    fn assets() -> Arc<dyn AssetSource> {
        Arc::new(MemoryAssetSource::new().with_file("shaders/basic.vert", "void main() {}"))
    }

    //=====================================================================
    // BridgeBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = BridgeBuilder::new();
        assert_eq!(builder.fps, 60.0);
        assert_eq!(builder.input_capacity, 256);
        assert_eq!(builder.command_backlog_warning, 32);
        assert_eq!((builder.window.width, builder.window.height), (800, 600));
        assert!(!builder.window.mouse_emulation);
    }

    #[test]
    fn builder_setters() {
        let builder = BridgeBuilder::new()
            .with_fps(30.0)
            .with_input_capacity(8)
            .with_command_backlog_warning(4)
            .with_title("demo")
            .with_window_size(320, 240)
            .with_mouse_emulation(true);

        assert_eq!(builder.fps, 30.0);
        assert_eq!(builder.input_capacity, 8);
        assert_eq!(builder.command_backlog_warning, 4);
        assert_eq!(builder.window.title, "demo");
        assert_eq!((builder.window.width, builder.window.height), (320, 240));
        assert!(builder.window.mouse_emulation);
    }

    #[test]
    #[should_panic(expected = "FPS must be positive")]
    fn builder_with_fps_panics_on_zero() {
        BridgeBuilder::new().with_fps(0.0);
    }

    #[test]
    #[should_panic(expected = "FPS must be positive")]
    fn builder_with_fps_panics_on_negative() {
        BridgeBuilder::new().with_fps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Input capacity must be positive")]
    fn builder_with_input_capacity_panics_on_zero() {
        BridgeBuilder::new().with_input_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Command backlog warning must be positive")]
    fn builder_with_command_backlog_warning_panics_on_zero() {
        BridgeBuilder::new().with_command_backlog_warning(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_window_size_panics_on_zero() {
        BridgeBuilder::new().with_window_size(0, 10);
    }

    #[test]
    fn build_binds_assets_before_anything_else() {
        let engine = RecordingEngine::new();

        let bridge = BridgeBuilder::new().build(engine.clone(), assets()).unwrap();

        assert_eq!(engine.calls(), vec![Call::BindAssetSource]);
        assert_eq!(bridge.state(), SurfaceState::Uninitialized);
        let bound = engine.bound_assets().unwrap();
        assert_eq!(bound.read("shaders/basic.vert").unwrap(), b"void main() {}");
    }

    #[test]
    fn build_fails_when_asset_binding_fails() {
        let engine = RecordingEngine::new();
        engine.fail_on(EngineCall::BindAssetSource);

        let err = BridgeBuilder::new().build(engine, assets()).err().unwrap();

        assert!(err.is_engine_failure());
    }

    //=====================================================================
    // Bridge Tests
    //=====================================================================

    #[test]
    fn host_driven_capabilities() {
        let engine = RecordingEngine::new();
        let mut bridge = BridgeBuilder::new().build(engine.clone(), assets()).unwrap();

        bridge.create().unwrap();
        bridge.resize(640, 480).unwrap();
        bridge.touch(&RawTouchEvent::single(RawAction::Down, 1, 10.0, 10.0));
        bridge.tick().unwrap();
        bridge.pause();
        assert_eq!(bridge.tick().unwrap(), TickOutcome::Skipped(SurfaceState::Paused));
        bridge.resume();
        bridge.tick().unwrap();
        bridge.destroy();

        assert_eq!(
            engine.calls(),
            vec![
                Call::BindAssetSource,
                Call::Initialize(1, 1),
                Call::Resize(640, 480),
                Call::pointer(PointerKind::Down, 1, 10.0, 10.0),
                Call::RenderFrame,
                Call::RenderFrame,
            ]
        );
        assert!(bridge.input().is_closed());
    }

    #[test]
    fn spawned_render_thread_serves_bridge() {
        let engine = RecordingEngine::new();
        let bridge = BridgeBuilder::new()
            .with_fps(240.0)
            .build(engine.clone(), assets())
            .unwrap();

        let (mut input, render) = bridge.spawn_render_thread().unwrap();
        let surface = render.surface();
        surface.created();
        surface.resized(100, 100);
        input.on_touch(&RawTouchEvent::single(RawAction::Down, 3, 1.0, 1.0));

        assert!(engine.wait_for(Duration::from_secs(5), |calls| {
            calls.contains(&Call::pointer(PointerKind::Down, 3, 1.0, 1.0))
        }));

        drop(surface);
        render.join().unwrap();
        assert!(input.is_closed());
    }
}
