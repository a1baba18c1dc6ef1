//=========================================================================
// Core Systems
//
// Everything between the host shell and the native engine.
//
// Responsibilities:
// - Normalize and queue pointer input (`input`)
// - Gate frames on the surface state machine (`lifecycle`)
// - Forward input and request frames once per tick (`render_loop`)
// - Run the driver on its own thread at a fixed rate (`render_thread`)
// - Define the native engine contract (`native`)
//
// Notes:
// The core never talks to an OS directly. Hosts reach it through
// `TouchInput` (input thread) and `SurfaceHandle` (lifecycle callbacks),
// and the engine is reached only from the render thread.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod error;
pub mod input;
pub mod lifecycle;
pub mod native;
pub mod platform_bridge;
pub mod render_loop;
pub mod render_thread;

//=== Public API ==========================================================

pub use error::BridgeError;
pub use input::{InputEvent, PointerEvent, PointerId, PointerKind, TouchInput};
pub use lifecycle::{SurfaceLifecycle, SurfaceState};
pub use native::{AssetError, AssetSource, EngineCall, EngineError, NativeEngine};
pub use platform_bridge::{PlatformError, SurfaceCommand};
pub use render_loop::{RenderLoopDriver, TickOutcome};
pub use render_thread::{RenderThread, SurfaceHandle};
