//=========================================================================
// Surface Lifecycle
//=========================================================================
//
// State machine gating when frames may be requested and input forwarded.
//
// Transitions:
// ```text
//   Uninitialized ──create──> Created ──resize──> Resized ──tick──> Running
//                                         ↑  │                        │  ↑
//                                         └──┘ resize          pause  │  │ resume
//                                                                     ↓  │
//                                                                    Paused
//
//   any ──destroy──> Destroyed   (terminal)
// ```
//
// Host callback order is not guaranteed across platform versions, so
// out-of-order callbacks are coerced into the nearest valid transition
// instead of being rejected.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::native::{EngineError, NativeEngine};

//=== SurfaceState ========================================================

/// State of the single drawable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceState {
    /// No surface yet; the engine has not been initialized.
    Uninitialized,

    /// Engine initialized with a nominal size; real size unknown.
    Created,

    /// Real size applied; waiting for the first frame tick.
    Resized,

    /// Frames and input flow.
    Running,

    /// Suspended by the host; input is captured but not forwarded.
    Paused,

    /// Terminal.
    Destroyed,
}

impl SurfaceState {
    /// Whether frames may be requested and input forwarded.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_destroyed(self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

//=== SurfaceLifecycle ====================================================

/// Owns the [`SurfaceState`] and performs the engine calls its
/// transitions require.
#[derive(Debug)]
pub struct SurfaceLifecycle {
    state: SurfaceState,
    size: Option<(u32, u32)>,
    resume_to: SurfaceState,
}

impl SurfaceLifecycle {
    /// Nominal size passed to `initialize`; the real one is not known yet.
    pub const NOMINAL_SIZE: (u32, u32) = (1, 1);

    pub fn new() -> Self {
        Self {
            state: SurfaceState::Uninitialized,
            size: None,
            resume_to: SurfaceState::Running,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Last size applied through `resize`.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    //--- Transitions ------------------------------------------------------

    /// `Uninitialized → Created`, initializing the engine at 1×1.
    pub fn create<E: NativeEngine + ?Sized>(&mut self, engine: &mut E) -> Result<(), EngineError> {
        match self.state {
            SurfaceState::Uninitialized => {
                let (width, height) = Self::NOMINAL_SIZE;
                engine.initialize(width, height)?;
                self.transition(SurfaceState::Created);
                Ok(())
            }
            SurfaceState::Destroyed => {
                trace!(target: "lifecycle", "create after destroy ignored");
                Ok(())
            }
            state => {
                debug!(target: "lifecycle", "create while {:?}: engine already initialized", state);
                Ok(())
            }
        }
    }

    /// Applies a new surface size.
    ///
    /// Identical repeated sizes issue no engine call. A resize before
    /// `create` performs the create implicitly.
    pub fn resize<E: NativeEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        width: u32,
        height: u32,
    ) -> Result<(), EngineError> {
        if self.state.is_destroyed() {
            trace!(target: "lifecycle", "resize after destroy ignored");
            return Ok(());
        }

        if width == 0 || height == 0 {
            warn!(target: "lifecycle", "Ignoring degenerate surface size {}x{}", width, height);
            return Ok(());
        }

        if self.state == SurfaceState::Uninitialized {
            debug!(target: "lifecycle", "resize before create, creating implicitly");
            self.create(engine)?;
        }

        if self.size == Some((width, height)) {
            trace!(target: "lifecycle", "Surface already {}x{}", width, height);
            return Ok(());
        }

        engine.resize(width, height)?;
        self.size = Some((width, height));
        info!(target: "lifecycle", "Surface resized to {}x{}", width, height);

        match self.state {
            SurfaceState::Paused => {
                // Stay paused; pick up the new size when resumed.
                if self.resume_to == SurfaceState::Created {
                    self.resume_to = SurfaceState::Resized;
                }
            }
            _ => self.transition(SurfaceState::Resized),
        }
        Ok(())
    }

    /// Evaluates the frame gate for one tick.
    ///
    /// Enters `Running` on the first tick after a resize. Returns whether
    /// this tick may forward input and request a frame.
    pub fn begin_frame(&mut self) -> bool {
        if self.state == SurfaceState::Resized {
            self.transition(SurfaceState::Running);
        }
        self.state.is_running()
    }

    pub fn pause(&mut self) {
        match self.state {
            SurfaceState::Created | SurfaceState::Resized | SurfaceState::Running => {
                self.resume_to = self.state;
                self.transition(SurfaceState::Paused);
            }
            state => debug!(target: "lifecycle", "pause while {:?} ignored", state),
        }
    }

    /// Returns to the state held before `pause`, without re-initializing.
    pub fn resume(&mut self) {
        match self.state {
            SurfaceState::Paused => self.transition(self.resume_to),
            state => debug!(target: "lifecycle", "resume while {:?} ignored", state),
        }
    }

    pub fn destroy(&mut self) {
        if !self.state.is_destroyed() {
            self.transition(SurfaceState::Destroyed);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn transition(&mut self, next: SurfaceState) {
        info!(target: "lifecycle", "{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl Default for SurfaceLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
