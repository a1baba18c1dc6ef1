//=========================================================================
// Bridge Errors
//=========================================================================
//
// Errors surfaced to the host. Recoverable conditions (stale input,
// out-of-order callbacks, queue saturation) never appear here: they are
// counted and discarded. Only a broken native call, a failed host shell,
// or a lost render thread reach the host.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::native::EngineError;
use crate::core::platform_bridge::PlatformError;

//=== BridgeError =========================================================

#[derive(Debug, Error)]
pub enum BridgeError {
    /// A native engine call failed; rendering cannot continue.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The host shell failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The render thread could not be started.
    #[error("failed to spawn render thread")]
    ThreadSpawn(#[source] std::io::Error),

    /// The render thread panicked.
    #[error("render thread panicked")]
    RenderThreadPanicked,
}

impl BridgeError {
    /// Whether this error came from the native engine.
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, Self::Engine(_))
    }
}
