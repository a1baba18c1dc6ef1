//=========================================================================
// Test Support
//=========================================================================
//
// Recording native engine shared by the unit tests of every module.
// Clones share one call log, so a test can keep a handle while the
// engine itself moves into a driver or onto the render thread.
//
//=========================================================================

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::core::input::{PointerId, PointerKind};
use crate::core::native::{AssetSource, EngineCall, EngineError, NativeEngine};

//=== Call ================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    BindAssetSource,
    Initialize(u32, u32),
    Resize(u32, u32),
    Pointer {
        id: PointerId,
        kind: PointerKind,
        x: f32,
        y: f32,
    },
    RenderFrame,
}

impl Call {
    pub(crate) fn pointer(kind: PointerKind, id: PointerId, x: f32, y: f32) -> Self {
        Self::Pointer { id, kind, x, y }
    }
}

//=== RecordingEngine =====================================================

#[derive(Clone, Default)]
pub(crate) struct RecordingEngine {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_on: Arc<Mutex<Option<EngineCall>>>,
    assets: Arc<Mutex<Option<Arc<dyn AssetSource>>>>,
    frame_delay: Arc<Mutex<Duration>>,
}

impl RecordingEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub(crate) fn frames(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::RenderFrame))
            .count()
    }

    pub(crate) fn pointer_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Pointer { .. }))
            .collect()
    }

    /// Makes every later call of `call` fail.
    pub(crate) fn fail_on(&self, call: EngineCall) {
        *self.fail_on.lock().unwrap() = Some(call);
    }

    /// Makes every later `render_frame` take at least `delay`.
    pub(crate) fn set_frame_delay(&self, delay: Duration) {
        *self.frame_delay.lock().unwrap() = delay;
    }

    pub(crate) fn bound_assets(&self) -> Option<Arc<dyn AssetSource>> {
        self.assets.lock().unwrap().clone()
    }

    /// Polls until `predicate` holds or the timeout expires.
    pub(crate) fn wait_for(&self, timeout: Duration, predicate: impl Fn(&[Call]) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if predicate(&self.calls()) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        predicate(&self.calls())
    }

    fn record(&self, call: EngineCall, entry: Call) -> Result<(), EngineError> {
        if *self.fail_on.lock().unwrap() == Some(call) {
            return Err(EngineError::new(call, "injected failure"));
        }
        self.calls.lock().unwrap().push(entry);
        Ok(())
    }
}

impl NativeEngine for RecordingEngine {
    fn initialize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        self.record(EngineCall::Initialize, Call::Initialize(width, height))
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        self.record(EngineCall::Resize, Call::Resize(width, height))
    }

    fn submit_pointer_event(
        &mut self,
        pointer_id: PointerId,
        kind: PointerKind,
        x: f32,
        y: f32,
    ) -> Result<(), EngineError> {
        self.record(
            EngineCall::SubmitPointerEvent,
            Call::pointer(kind, pointer_id, x, y),
        )
    }

    fn render_frame(&mut self) -> Result<(), EngineError> {
        let delay = *self.frame_delay.lock().unwrap();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.record(EngineCall::RenderFrame, Call::RenderFrame)
    }

    fn bind_asset_source(&mut self, assets: Arc<dyn AssetSource>) -> Result<(), EngineError> {
        self.record(EngineCall::BindAssetSource, Call::BindAssetSource)?;
        *self.assets.lock().unwrap() = Some(assets);
        Ok(())
    }
}
