//=========================================================================
// Command Collector
//=========================================================================
//
// Render-side collection of lifecycle commands posted by the host.
//
// Architecture:
//   Receiver<SurfaceCommand> → collect_frame() → pending → TickControl
//
// Bounded polling keeps a burst of callbacks from starving the frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::SurfaceCommand;

//=== TickControl =========================================================

/// Render loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== CommandCollector ====================================================

/// Collects posted lifecycle commands once per tick.
pub(crate) struct CommandCollector {
    receiver: Receiver<SurfaceCommand>,
    pending: Vec<SurfaceCommand>,
}

impl CommandCollector {
    pub(crate) const MAX_COMMANDS_PER_TICK: usize = 64;

    pub(crate) fn new(receiver: Receiver<SurfaceCommand>) -> Self {
        Self {
            receiver,
            pending: Vec::with_capacity(4),
        }
    }

    /// Collects commands posted since the last tick (bounded).
    ///
    /// Returns `Exit` once every host handle is gone and nothing is left
    /// to apply; commands collected before the disconnect stay pending.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.pending.clear();

        while self.pending.len() < Self::MAX_COMMANDS_PER_TICK {
            match self.receiver.try_recv() {
                Ok(command) => self.pending.push(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return if self.pending.is_empty() {
                        TickControl::Exit
                    } else {
                        TickControl::Continue
                    };
                }
            }
        }

        if self.pending.len() >= Self::MAX_COMMANDS_PER_TICK {
            warn!(
                target: "render",
                "Lifecycle command backlog: collected {} commands this tick",
                self.pending.len()
            );
        }

        TickControl::Continue
    }

    /// Takes the collected commands, leaving an empty buffer.
    pub(crate) fn take_pending(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.pending)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
