//=========================================================================
// Render Thread
//
// Dedicated thread running the `RenderLoopDriver` at a fixed frame rate.
//
// Responsibilities:
// - Own the driver (and therefore the engine) for its whole lifetime
// - Apply host lifecycle commands at the start of each tick
// - Tick the driver once per frame and pace to the target rate
// - Exit on Destroyed, on a fatal engine error, or once every host
//   handle is dropped
//
// Notes:
// Host callbacks arrive on other threads (UI thread, winit main thread).
// They never touch the engine; they post `SurfaceCommand`s through a
// `SurfaceHandle`, so every native call happens on this thread.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================

use crossbeam_channel::{unbounded, SendError, Sender};
use log::{debug, info, warn};

//=== Internal Modules ====================================================

use crate::core::error::BridgeError;
use crate::core::native::NativeEngine;
use crate::core::platform_bridge::{CommandCollector, SurfaceCommand, TickControl};
use crate::core::render_loop::RenderLoopDriver;

//=== SurfaceHandle =======================================================

/// Cloneable host-side handle posting lifecycle callbacks to the render
/// thread.
///
/// Posting never waits on the render thread. Every method returns `false`
/// once the render thread has exited.
#[derive(Debug, Clone)]
pub struct SurfaceHandle {
    sender: Sender<SurfaceCommand>,
    /// Pending commands at which `post` starts warning.
    backlog_warning: usize,
    render_finished: Arc<AtomicBool>,
}

impl SurfaceHandle {
    pub(crate) fn new(sender: Sender<SurfaceCommand>, backlog_warning: usize) -> Self {
        Self {
            sender,
            backlog_warning,
            render_finished: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn created(&self) -> bool {
        self.post(SurfaceCommand::Created)
    }

    pub fn resized(&self, width: u32, height: u32) -> bool {
        self.post(SurfaceCommand::Resized { width, height })
    }

    pub fn paused(&self) -> bool {
        self.post(SurfaceCommand::Paused)
    }

    pub fn resumed(&self) -> bool {
        self.post(SurfaceCommand::Resumed)
    }

    pub fn destroyed(&self) -> bool {
        self.post(SurfaceCommand::Destroyed)
    }

    /// Queues a command for the next tick without blocking.
    pub fn post(&self, command: SurfaceCommand) -> bool {
        let backlog = self.sender.len();
        if backlog >= self.backlog_warning {
            warn!(
                target: "platform",
                "Render thread is {} commands behind, posting {:?}",
                backlog,
                command
            );
        }

        match self.sender.send(command) {
            Ok(()) => true,
            Err(SendError(command)) => {
                debug!(target: "platform", "Render thread gone, dropping {:?}", command);
                false
            }
        }
    }

    /// True once the render thread has stopped, for any reason.
    pub fn is_render_finished(&self) -> bool {
        self.render_finished.load(Ordering::Acquire)
    }
}

/// Raises the finished flag when the render closure returns or unwinds.
struct FinishedGuard(Arc<AtomicBool>);

impl Drop for FinishedGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

//=== RenderThread ========================================================

/// Join handle for a running render thread plus its command handle.
pub struct RenderThread {
    handle: thread::JoinHandle<Result<(), BridgeError>>,
    surface: SurfaceHandle,
}

impl RenderThread {
    //--- spawn() ----------------------------------------------------------
    //
    // Each tick:
    //  1. Collects posted lifecycle commands and applies them in order
    //     (the command channel is unbounded; `backlog_warning` only sets
    //     when posting starts to log)
    //  2. Ticks the driver (drain input, forward, render one frame)
    //  3. Sleeps to maintain fixed pacing
    //  4. Exits once the surface is destroyed or the host is gone
    //
    pub fn spawn<E>(
        mut driver: RenderLoopDriver<E>,
        fps: f64,
        backlog_warning: usize,
    ) -> Result<Self, BridgeError>
    where
        E: NativeEngine + 'static,
    {
        assert!(fps > 0.0, "FPS must be positive, got {}", fps);
        assert!(backlog_warning > 0, "Command backlog warning must be positive");

        let frame_duration = Duration::from_secs_f64(1.0 / fps);
        let (tx, rx) = unbounded();
        let surface = SurfaceHandle::new(tx, backlog_warning);
        let finished = FinishedGuard(Arc::clone(&surface.render_finished));

        let handle = thread::Builder::new()
            .name("render".into())
            .spawn(move || {
                let _finished = finished;
                let mut collector = CommandCollector::new(rx);
                info!(target: "render", "Render thread started ({} fps)", fps);

                loop {
                    let frame_start = Instant::now();

                    //--- Step 1: Apply lifecycle commands -----------------
                    let control = collector.collect_frame();
                    for command in collector.take_pending() {
                        driver.apply(command)?;
                    }
                    if control == TickControl::Exit {
                        info!(target: "render", "All surface handles dropped, shutting down");
                        driver.destroy();
                    }
                    if driver.state().is_destroyed() {
                        break;
                    }

                    //--- Step 2: Drain input and render -------------------
                    driver.tick()?;

                    //--- Step 3: Maintain pacing --------------------------
                    let elapsed = frame_start.elapsed();
                    if elapsed < frame_duration {
                        thread::sleep(frame_duration - elapsed);
                    }
                }

                info!(
                    target: "render",
                    "Render thread exiting after {} frames",
                    driver.frames_rendered()
                );
                Ok(())
            })
            .map_err(BridgeError::ThreadSpawn)?;

        Ok(Self { handle, surface })
    }

    /// Handle for posting lifecycle callbacks.
    pub fn surface(&self) -> SurfaceHandle {
        self.surface.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the render thread to exit and returns how it ended.
    ///
    /// Dropping this handle's own `SurfaceHandle` first lets the thread
    /// exit once every other clone is gone too.
    pub fn join(self) -> Result<(), BridgeError> {
        let Self { handle, surface } = self;
        drop(surface);

        match handle.join() {
            Ok(result) => result,
            Err(_) => Err(BridgeError::RenderThreadPanicked),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
