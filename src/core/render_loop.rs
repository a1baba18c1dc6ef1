//=========================================================================
// Render Loop Driver
//=========================================================================
//
// Render-thread entry point. Owns the native engine, the surface
// lifecycle, and the consumer half of the input queue.
//
// Each tick:
//  1. Evaluates the frame gate (Resized → Running on the first tick)
//  2. Drains the input queue and forwards every event, in order
//  3. Requests exactly one frame
//
// Input for a tick is always fully applied before that tick's frame.
// While not Running, input stays queued and the engine is not touched.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::BridgeError;
use crate::core::input::{InputEvent, InputReceiver};
use crate::core::lifecycle::{SurfaceLifecycle, SurfaceState};
use crate::core::native::{EngineError, NativeEngine};
use crate::core::platform_bridge::SurfaceCommand;
use crate::time::FrameClock;

//=== TickOutcome =========================================================

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Input was forwarded and one frame requested.
    Rendered { events: usize },

    /// The surface was not Running; the engine was not touched.
    Skipped(SurfaceState),
}

//=== RenderLoopDriver ====================================================

/// Drives the native engine from the render thread.
///
/// Lifecycle methods take `&mut self` and must be called from the same
/// context as [`tick`](Self::tick); hosts delivering callbacks on another
/// thread post [`SurfaceCommand`]s instead (see `RenderThread`).
pub struct RenderLoopDriver<E: NativeEngine> {
    engine: E,
    lifecycle: SurfaceLifecycle,
    input: InputReceiver,
    clock: FrameClock,
    dropped_seen: u64,
}

impl<E: NativeEngine> RenderLoopDriver<E> {
    //--- Construction -----------------------------------------------------

    pub fn new(engine: E, input: InputReceiver) -> Self {
        Self {
            engine,
            lifecycle: SurfaceLifecycle::new(),
            input,
            clock: FrameClock::new(),
            dropped_seen: 0,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn surface_created(&mut self) -> Result<(), BridgeError> {
        let result = self.lifecycle.create(&mut self.engine);
        self.check(result)
    }

    pub fn surface_resized(&mut self, width: u32, height: u32) -> Result<(), BridgeError> {
        let result = self.lifecycle.resize(&mut self.engine, width, height);
        self.check(result)
    }

    pub fn pause(&mut self) {
        self.lifecycle.pause();
    }

    pub fn resume(&mut self) {
        let was_paused = self.lifecycle.state() == SurfaceState::Paused;
        self.lifecycle.resume();
        if was_paused {
            self.clock.reset();
        }
    }

    /// Terminal. Leftover queued input is discarded and the producer side
    /// starts ignoring new touches.
    pub fn destroy(&mut self) {
        if self.lifecycle.state().is_destroyed() {
            return;
        }
        self.lifecycle.destroy();
        let discarded = self.input.close();
        debug!(target: "render", "Surface destroyed, {} queued events discarded", discarded);
    }

    /// Applies one lifecycle command posted by the host.
    pub fn apply(&mut self, command: SurfaceCommand) -> Result<(), BridgeError> {
        trace!(target: "render", "Applying {:?}", command);
        match command {
            SurfaceCommand::Created => self.surface_created(),
            SurfaceCommand::Resized { width, height } => self.surface_resized(width, height),
            SurfaceCommand::Paused => {
                self.pause();
                Ok(())
            }
            SurfaceCommand::Resumed => {
                self.resume();
                Ok(())
            }
            SurfaceCommand::Destroyed => {
                self.destroy();
                Ok(())
            }
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one render tick.
    pub fn tick(&mut self) -> Result<TickOutcome, BridgeError> {
        if !self.lifecycle.begin_frame() {
            return Ok(TickOutcome::Skipped(self.lifecycle.state()));
        }

        let events = self.input.drain();
        self.report_drops();

        let result = self.forward(&events);
        self.check(result)?;

        let result = self.engine.render_frame();
        self.check(result)?;

        self.clock.tick();
        if let Some(report) = self.clock.take_report() {
            debug!(
                target: "render",
                "{} frames in the last second ({:.1}s running)",
                report.frames,
                report.running_time
            );
        }

        Ok(TickOutcome::Rendered {
            events: events.len(),
        })
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> SurfaceState {
        self.lifecycle.state()
    }

    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.lifecycle.size()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.clock.frames()
    }

    /// Events discarded by the queue's drop-oldest policy.
    pub fn dropped_events(&self) -> u64 {
        self.input.dropped()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    //--- Internal Helpers -------------------------------------------------

    fn forward(&mut self, events: &[InputEvent]) -> Result<(), EngineError> {
        for event in events {
            trace!(
                target: "render",
                "Forwarding #{} {:?} pointer {} ({}, {})",
                event.sequence,
                event.kind,
                event.pointer_id,
                event.x,
                event.y
            );
            self.engine
                .submit_pointer_event(event.pointer_id, event.kind, event.x, event.y)?;
        }
        Ok(())
    }

    fn report_drops(&mut self) {
        let dropped = self.input.dropped();
        if dropped > self.dropped_seen {
            warn!(
                target: "input::queue",
                "Input queue saturated: {} events dropped since last frame",
                dropped - self.dropped_seen
            );
            self.dropped_seen = dropped;
        }
    }

    /// Native failures are fatal: log, tear down, and surface the error.
    fn check(&mut self, result: Result<(), EngineError>) -> Result<(), BridgeError> {
        result.map_err(|e| {
            error!(target: "render", "{}", e);
            self.destroy();
            BridgeError::Engine(e)
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
