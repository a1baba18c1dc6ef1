//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the host shell (winit, JNI, ...) with the render thread.
//
// This module defines the contract between host implementations and the
// render loop, so host backends can be swapped without touching core code.
//
// Components:
// - `interface`: Command types and error definitions (the contract)
// - `command_collector`: Render-side command collection
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod command_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use command_collector::{CommandCollector, TickControl};
pub use interface::{PlatformError, SurfaceCommand};
