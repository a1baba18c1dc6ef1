//=========================================================================
// C ABI
//=========================================================================
//
// Realizes `NativeEngine` over a C function table, and exports the bound
// asset store back to native code.
//
// Conventions:
// - Every engine entry point returns 0 on success, anything else is a
//   failure and is fatal for the bridge
// - Pointer kinds cross as DOWN=0, UP=1, MOVE=2
// - Sizes cross as i32; larger values are rejected before the call
// - Buffers returned by `surface_bridge_asset_read` are owned by Rust and
//   released with `surface_bridge_asset_free`
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ffi::{c_char, c_void, CStr};
use std::fmt;
use std::ptr;
use std::sync::Arc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::input::{PointerId, PointerKind};
use crate::core::native::{AssetError, AssetSource, EngineCall, EngineError, NativeEngine};

//=== Status Codes ========================================================

pub const STATUS_OK: i32 = 0;

/// Asset missing, or path rejected by the store.
pub const STATUS_NOT_FOUND: i32 = -1;

/// Null handle, path, or output pointer; or a path that is not UTF-8.
pub const STATUS_INVALID_ARGUMENT: i32 = -2;

/// The store failed while reading.
pub const STATUS_IO_ERROR: i32 = -3;

//=== AssetSourceHandle ===================================================

/// Opaque handle to the bound asset store, as seen from C.
///
/// Stays valid until the `ExternEngine` that received it is dropped.
pub struct AssetSourceHandle {
    source: Arc<dyn AssetSource>,
}

impl fmt::Debug for AssetSourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetSourceHandle").finish_non_exhaustive()
    }
}

//=== EngineVTable ========================================================

/// Native engine entry points.
///
/// `context` is passed back unchanged as the first argument of every call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct EngineVTable {
    pub context: *mut c_void,
    pub initialize: unsafe extern "C" fn(context: *mut c_void, width: i32, height: i32) -> i32,
    pub resize: unsafe extern "C" fn(context: *mut c_void, width: i32, height: i32) -> i32,
    pub submit_pointer_event:
        unsafe extern "C" fn(context: *mut c_void, pointer_id: i32, kind: i32, x: f32, y: f32) -> i32,
    pub render_frame: unsafe extern "C" fn(context: *mut c_void) -> i32,
    pub bind_asset_source:
        unsafe extern "C" fn(context: *mut c_void, assets: *const AssetSourceHandle) -> i32,
}

//=== ExternEngine ========================================================

/// A native engine reached through an [`EngineVTable`].
#[derive(Debug)]
pub struct ExternEngine {
    vtable: EngineVTable,
    assets: Option<Box<AssetSourceHandle>>,
}

impl ExternEngine {
    /// # Safety
    ///
    /// - Every function pointer must be callable with `vtable.context`
    ///   for as long as this value lives
    /// - The engine behind `context` must tolerate being called from the
    ///   thread this value is moved to (the render thread)
    pub unsafe fn new(vtable: EngineVTable) -> Self {
        Self {
            vtable,
            assets: None,
        }
    }

    fn check(call: EngineCall, status: i32) -> Result<(), EngineError> {
        if status == STATUS_OK {
            Ok(())
        } else {
            Err(EngineError::new(call, format!("returned status {}", status)))
        }
    }

    fn dimensions(call: EngineCall, width: u32, height: u32) -> Result<(i32, i32), EngineError> {
        match (i32::try_from(width), i32::try_from(height)) {
            (Ok(w), Ok(h)) => Ok((w, h)),
            _ => Err(EngineError::new(
                call,
                format!("size {}x{} does not fit the C ABI", width, height),
            )),
        }
    }
}

// SAFETY: the caller of `ExternEngine::new` vouches for cross-thread use,
// and the asset handle it owns is `Send + Sync`.
unsafe impl Send for ExternEngine {}

impl NativeEngine for ExternEngine {
    fn initialize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        let (w, h) = Self::dimensions(EngineCall::Initialize, width, height)?;
        let status = unsafe { (self.vtable.initialize)(self.vtable.context, w, h) };
        Self::check(EngineCall::Initialize, status)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        let (w, h) = Self::dimensions(EngineCall::Resize, width, height)?;
        let status = unsafe { (self.vtable.resize)(self.vtable.context, w, h) };
        Self::check(EngineCall::Resize, status)
    }

    fn submit_pointer_event(
        &mut self,
        pointer_id: PointerId,
        kind: PointerKind,
        x: f32,
        y: f32,
    ) -> Result<(), EngineError> {
        let status = unsafe {
            (self.vtable.submit_pointer_event)(self.vtable.context, pointer_id, kind.code(), x, y)
        };
        Self::check(EngineCall::SubmitPointerEvent, status)
    }

    fn render_frame(&mut self) -> Result<(), EngineError> {
        let status = unsafe { (self.vtable.render_frame)(self.vtable.context) };
        Self::check(EngineCall::RenderFrame, status)
    }

    fn bind_asset_source(&mut self, assets: Arc<dyn AssetSource>) -> Result<(), EngineError> {
        let handle = Box::new(AssetSourceHandle { source: assets });
        let raw: *const AssetSourceHandle = &*handle;

        // Keep the previous handle alive until the engine has switched over.
        let previous = self.assets.replace(handle);
        let status = unsafe { (self.vtable.bind_asset_source)(self.vtable.context, raw) };
        if status != STATUS_OK {
            // The engine still holds the old pointer.
            self.assets = previous;
        } else if previous.is_some() {
            debug!(target: "ffi", "Asset source rebound");
        }
        Self::check(EngineCall::BindAssetSource, status)
    }
}

//=== Exported Functions ==================================================

/// Bytes handed to native code.
#[repr(C)]
#[derive(Debug)]
pub struct AssetBuffer {
    pub data: *mut u8,
    pub len: usize,
}

impl AssetBuffer {
    pub const EMPTY: Self = Self {
        data: ptr::null_mut(),
        len: 0,
    };
}

/// Reads one asset from a bound store.
///
/// On success fills `out` and returns [`STATUS_OK`]; the buffer must be
/// released with [`surface_bridge_asset_free`]. On failure `out` is left
/// empty.
///
/// # Safety
/// - `handle` must come from `bind_asset_source` and still be bound
/// - `path` must be a valid null-terminated string
/// - `out` must be valid for writes
#[no_mangle]
pub unsafe extern "C" fn surface_bridge_asset_read(
    handle: *const AssetSourceHandle,
    path: *const c_char,
    out: *mut AssetBuffer,
) -> i32 {
    if handle.is_null() || path.is_null() || out.is_null() {
        return STATUS_INVALID_ARGUMENT;
    }
    *out = AssetBuffer::EMPTY;

    let path = match CStr::from_ptr(path).to_str() {
        Ok(path) => path,
        Err(_) => return STATUS_INVALID_ARGUMENT,
    };

    match (*handle).source.read(path) {
        Ok(bytes) => {
            let bytes = bytes.into_boxed_slice();
            let len = bytes.len();
            let data = Box::into_raw(bytes) as *mut u8;
            *out = AssetBuffer { data, len };
            STATUS_OK
        }
        Err(e) => {
            warn!(target: "ffi", "{}", e);
            match e {
                AssetError::NotFound(_) | AssetError::InvalidPath(_) => STATUS_NOT_FOUND,
                AssetError::Io { .. } => STATUS_IO_ERROR,
            }
        }
    }
}

/// Releases a buffer filled by [`surface_bridge_asset_read`] and resets it.
///
/// # Safety
/// - `buffer` must be null, empty, or filled by `surface_bridge_asset_read`
///   and not freed since
#[no_mangle]
pub unsafe extern "C" fn surface_bridge_asset_free(buffer: *mut AssetBuffer) {
    if buffer.is_null() || (*buffer).data.is_null() {
        return;
    }
    let AssetBuffer { data, len } = ptr::replace(buffer, AssetBuffer::EMPTY);
    drop(Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)));
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::native::MemoryAssetSource;
    use std::ffi::CString;

    #[derive(Default)]
    struct NativeLog {
        calls: Vec<(&'static str, i32, i32)>,
        assets: Option<*const AssetSourceHandle>,
        status: i32,
    }

    unsafe fn native<'a>(context: *mut c_void) -> &'a mut NativeLog {
        &mut *(context as *mut NativeLog)
    }

    unsafe extern "C" fn initialize(context: *mut c_void, w: i32, h: i32) -> i32 {
        let log = native(context);
        log.calls.push(("initialize", w, h));
        log.status
    }

    unsafe extern "C" fn resize(context: *mut c_void, w: i32, h: i32) -> i32 {
        let log = native(context);
        log.calls.push(("resize", w, h));
        log.status
    }

    unsafe extern "C" fn submit(context: *mut c_void, id: i32, kind: i32, _x: f32, _y: f32) -> i32 {
        let log = native(context);
        log.calls.push(("pointer", id, kind));
        log.status
    }

    unsafe extern "C" fn render(context: *mut c_void) -> i32 {
        let log = native(context);
        log.calls.push(("render", 0, 0));
        log.status
    }

    unsafe extern "C" fn bind(context: *mut c_void, assets: *const AssetSourceHandle) -> i32 {
        let log = native(context);
        log.assets = Some(assets);
        log.status
    }

    fn engine(native: &mut NativeLog) -> ExternEngine {
        let vtable = EngineVTable {
            context: native as *mut NativeLog as *mut c_void,
            initialize,
            resize,
            submit_pointer_event: submit,
            render_frame: render,
            bind_asset_source: bind,
        };
        unsafe { ExternEngine::new(vtable) }
    }

    #[test]
    fn calls_reach_native_with_abi_codes() {
        let mut native = NativeLog::default();
        let mut engine = engine(&mut native);

        engine.initialize(1, 1).unwrap();
        engine.resize(800, 600).unwrap();
        engine.submit_pointer_event(4, PointerKind::Down, 0.0, 0.0).unwrap();
        engine.submit_pointer_event(4, PointerKind::Move, 0.0, 0.0).unwrap();
        engine.submit_pointer_event(4, PointerKind::Up, 0.0, 0.0).unwrap();
        engine.render_frame().unwrap();
        drop(engine);

        assert_eq!(
            native.calls,
            vec![
                ("initialize", 1, 1),
                ("resize", 800, 600),
                ("pointer", 4, 0),
                ("pointer", 4, 2),
                ("pointer", 4, 1),
                ("render", 0, 0),
            ]
        );
    }

    #[test]
    fn nonzero_status_is_engine_error() {
        let mut native = NativeLog {
            status: 7,
            ..NativeLog::default()
        };
        let mut engine = engine(&mut native);

        let err = engine.render_frame().unwrap_err();

        assert_eq!(err.call, EngineCall::RenderFrame);
        assert!(err.message.contains('7'));
    }

    #[test]
    fn oversized_dimensions_are_rejected_before_the_call() {
        let mut native = NativeLog::default();
        let mut engine = engine(&mut native);

        let err = engine.resize(u32::MAX, 10).unwrap_err();
        drop(engine);

        assert_eq!(err.call, EngineCall::Resize);
        assert!(native.calls.is_empty());
    }

    #[test]
    fn native_code_reads_bound_assets() {
        let mut native = NativeLog::default();
        let mut engine = engine(&mut native);
        let store = MemoryAssetSource::new().with_file("shaders/basic.frag", "precision mediump float;");
        engine.bind_asset_source(Arc::new(store)).unwrap();

        let handle = native.assets.unwrap();
        let path = CString::new("shaders/basic.frag").unwrap();
        let mut buffer = AssetBuffer::EMPTY;

        let status = unsafe { surface_bridge_asset_read(handle, path.as_ptr(), &mut buffer) };
        assert_eq!(status, STATUS_OK);
        let bytes = unsafe { std::slice::from_raw_parts(buffer.data, buffer.len) };
        assert_eq!(bytes, b"precision mediump float;");

        unsafe { surface_bridge_asset_free(&mut buffer) };
        assert!(buffer.data.is_null());
        assert_eq!(buffer.len, 0);
        drop(engine);
    }

    #[test]
    fn failed_rebind_keeps_previous_assets_alive() {
        let mut native = NativeLog::default();
        let mut engine = engine(&mut native);
        let first = MemoryAssetSource::new().with_file("a.txt", "first");
        engine.bind_asset_source(Arc::new(first)).unwrap();
        let handle = native.assets.unwrap();

        native.status = 4;
        let second = MemoryAssetSource::new().with_file("a.txt", "second");
        assert!(engine.bind_asset_source(Arc::new(second)).is_err());

        let path = CString::new("a.txt").unwrap();
        let mut buffer = AssetBuffer::EMPTY;
        let status = unsafe { surface_bridge_asset_read(handle, path.as_ptr(), &mut buffer) };
        assert_eq!(status, STATUS_OK);
        let bytes = unsafe { std::slice::from_raw_parts(buffer.data, buffer.len) };
        assert_eq!(bytes, b"first");

        unsafe { surface_bridge_asset_free(&mut buffer) };
        drop(engine);
    }

    #[test]
    fn asset_read_status_codes() {
        let mut native = NativeLog::default();
        let mut engine = engine(&mut native);
        engine.bind_asset_source(Arc::new(MemoryAssetSource::new())).unwrap();
        let handle = native.assets.unwrap();
        let mut buffer = AssetBuffer::EMPTY;

        let missing = CString::new("missing.bin").unwrap();
        let escape = CString::new("../secret").unwrap();

        unsafe {
            assert_eq!(
                surface_bridge_asset_read(handle, missing.as_ptr(), &mut buffer),
                STATUS_NOT_FOUND
            );
            assert_eq!(
                surface_bridge_asset_read(handle, escape.as_ptr(), &mut buffer),
                STATUS_NOT_FOUND
            );
            assert_eq!(
                surface_bridge_asset_read(ptr::null(), missing.as_ptr(), &mut buffer),
                STATUS_INVALID_ARGUMENT
            );
            assert_eq!(
                surface_bridge_asset_read(handle, ptr::null(), &mut buffer),
                STATUS_INVALID_ARGUMENT
            );
            surface_bridge_asset_free(&mut buffer);
            surface_bridge_asset_free(ptr::null_mut());
        }
        assert!(buffer.data.is_null());
        drop(engine);
    }
}
