//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use surface_bridge::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Bridge
pub use crate::bridge::{Bridge, BridgeBuilder};
pub use crate::core::{BridgeError, SurfaceState, TickOutcome};

// Threading
pub use crate::core::render_thread::{RenderThread, SurfaceHandle};

// Input
pub use crate::core::input::{PointerKind, RawAction, RawPointer, RawTouchEvent, TouchInput};

// Native engine
pub use crate::core::native::{AssetSource, DirAssetSource, EngineError, MemoryAssetSource, NativeEngine};
