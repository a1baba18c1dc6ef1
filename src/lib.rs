//=========================================================================
// Surface Bridge — Library Root
//
// Connects a host's drawable surface and multi-touch input to a native
// rendering engine.
//
// Responsibilities:
// - Expose the bridge object (`Bridge`) and its builder
// - Keep the winit host shell (`platform`) internal
// - Provide the native engine contract and its C ABI realization
//
// Typical usage:
// ```no_run
// use std::sync::Arc;
// use surface_bridge::{BridgeBuilder, DirAssetSource, NativeEngine};
//
// fn main_with<E: NativeEngine + 'static>(engine: E) -> Result<(), surface_bridge::BridgeError> {
//     surface_bridge::logging::init_logging(Default::default());
//     BridgeBuilder::new()
//         .build(engine, Arc::new(DirAssetSource::new("assets")))?
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the input pipeline, surface lifecycle, render loop, and the
// native engine contract. Hosts with their own shell (JNI, SDL, ...) use
// it directly; others go through `Bridge`.
//
pub mod core;
pub mod ffi;
pub mod logging;
pub mod prelude;
pub mod time;

//--- Internal Modules ----------------------------------------------------
//
// `platform` is the winit host used by `Bridge::run`.
//
mod bridge;
mod platform;

#[cfg(test)]
mod testing;

//--- Public Exports ------------------------------------------------------

pub use bridge::{Bridge, BridgeBuilder};
pub use crate::core::input::{PointerId, PointerKind, RawAction, RawPointer, RawTouchEvent, TouchInput};
pub use crate::core::native::{
    AssetError, AssetSource, DirAssetSource, EngineCall, EngineError, MemoryAssetSource, NativeEngine,
};
pub use crate::core::{
    BridgeError, PlatformError, RenderLoopDriver, RenderThread, SurfaceCommand, SurfaceHandle,
    SurfaceState, TickOutcome,
};
pub use platform::MOUSE_POINTER_ID;
