//=========================================================================
// Native Engine Boundary
//=========================================================================
//
// The capability set this crate consumes from the external rendering
// engine. The bridge calls it and never implements it.
//
// Call contract:
// - `bind_asset_source` once at startup, before anything else
// - `initialize` once, before any other surface call
// - `resize` idempotent; repeated identical sizes are filtered upstream
// - `submit_pointer_event` only while the surface is Running
// - `render_frame` at most once per tick, after that tick's input
//
// Any `Err` is fatal for the bridge.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod asset;

//=== Public API ==========================================================

pub use asset::{AssetError, AssetSource, DirAssetSource, MemoryAssetSource};

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::input::{PointerId, PointerKind};

//=== EngineCall ==========================================================

/// Names one entry point of the native engine, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineCall {
    Initialize,
    Resize,
    SubmitPointerEvent,
    RenderFrame,
    BindAssetSource,
}

impl fmt::Display for EngineCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initialize => "initialize",
            Self::Resize => "resize",
            Self::SubmitPointerEvent => "submit_pointer_event",
            Self::RenderFrame => "render_frame",
            Self::BindAssetSource => "bind_asset_source",
        };
        f.write_str(name)
    }
}

//=== EngineError =========================================================

/// A failed native engine call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("native engine call `{call}` failed: {message}")]
pub struct EngineError {
    pub call: EngineCall,
    pub message: String,
}

impl EngineError {
    pub fn new(call: EngineCall, message: impl Into<String>) -> Self {
        Self {
            call,
            message: message.into(),
        }
    }
}

//=== NativeEngine ========================================================

/// The external rendering engine, as seen from the bridge.
///
/// Implementations are moved onto the render thread, hence `Send`.
pub trait NativeEngine: Send {
    /// One-time setup. The bridge passes a nominal 1×1 size; the real
    /// dimensions follow through [`resize`](Self::resize).
    fn initialize(&mut self, width: u32, height: u32) -> Result<(), EngineError>;

    /// Viewport/target resize.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError>;

    /// Applies one normalized pointer event.
    fn submit_pointer_event(
        &mut self,
        pointer_id: PointerId,
        kind: PointerKind,
        x: f32,
        y: f32,
    ) -> Result<(), EngineError>;

    /// Produces and presents one frame. Returns once GPU submission is
    /// queued, not when the frame is displayed.
    fn render_frame(&mut self) -> Result<(), EngineError>;

    /// Supplies the read-only asset store the engine loads from.
    fn bind_asset_source(&mut self, assets: Arc<dyn AssetSource>) -> Result<(), EngineError>;
}

impl<E: NativeEngine + ?Sized> NativeEngine for Box<E> {
    fn initialize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        (**self).initialize(width, height)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        (**self).resize(width, height)
    }

    fn submit_pointer_event(
        &mut self,
        pointer_id: PointerId,
        kind: PointerKind,
        x: f32,
        y: f32,
    ) -> Result<(), EngineError> {
        (**self).submit_pointer_event(pointer_id, kind, x, y)
    }

    fn render_frame(&mut self) -> Result<(), EngineError> {
        (**self).render_frame()
    }

    fn bind_asset_source(&mut self, assets: Arc<dyn AssetSource>) -> Result<(), EngineError> {
        (**self).bind_asset_source(assets)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
