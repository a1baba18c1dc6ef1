//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Host-to-render-thread interface types (commands and errors).
//
// Defines the contract between the host shell delivering OS callbacks and
// the render thread applying them.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== SurfaceCommand ======================================================

/// Lifecycle callbacks posted by a host thread to the render thread.
///
/// Applied in posting order at the start of the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// Drawable surface created.
    Created,

    /// Surface size changed, in physical pixels.
    Resized { width: u32, height: u32 },

    /// Host moved to the background.
    Paused,

    /// Host returned to the foreground.
    Resumed,

    /// Surface gone for good.
    Destroyed,
}

//=== PlatformError =======================================================

/// Host shell initialization and runtime errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    /// Event loop execution error.
    #[error("event loop error")]
    EventLoopExecution(#[source] winit::error::EventLoopError),

    /// The single surface window could not be created.
    #[error("window creation failed")]
    WindowCreation(#[source] winit::error::OsError),
}
