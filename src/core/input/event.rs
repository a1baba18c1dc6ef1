//=========================================================================
// Pointer Event Types
//
// Defines the canonical Down/Move/Up vocabulary shared by the input
// pipeline and the native engine boundary.
//
// Event Flow:
// ```text
// RawTouchEvent (host encoding)
//         ↓
//    PointerTracker  ──>  PointerEvent (unsequenced)
//         ↓
//    InputQueue      ──>  InputEvent (sequence stamped at enqueue)
//         ↓
//    RenderLoopDriver ──> NativeEngine::submit_pointer_event
// ```
//
//=========================================================================

//=== PointerId ===========================================================

/// Identifier of one contact, stable from its Down to its Up.
///
/// Matches the width of the platform pointer id (Android `int`).
pub type PointerId = i32;

//=== PointerKind =========================================================

/// Semantic kind of a normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Contact started.
    Down,

    /// Contact moved.
    Move,

    /// Contact ended (lifted or cancelled).
    Up,
}

impl PointerKind {
    /// Numeric code used across the C ABI (`DOWN=0`, `UP=1`, `MOVE=2`).
    pub fn code(self) -> i32 {
        match self {
            Self::Down => 0,
            Self::Up => 1,
            Self::Move => 2,
        }
    }
}

//=== PointerEvent ========================================================

/// A normalized pointer event before it enters the queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pointer_id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, pointer_id: PointerId, x: f32, y: f32) -> Self {
        Self { kind, pointer_id, x, y }
    }
}

//=== InputEvent ==========================================================

/// A pointer event owned by the queue, stamped with its global order.
///
/// `sequence` is assigned by the producer at enqueue time and strictly
/// increases across all pointers, so the consumer can replay events in
/// generation order even when the host batches several pointers together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub kind: PointerKind,
    pub pointer_id: PointerId,
    pub x: f32,
    pub y: f32,
    pub sequence: u64,
}

impl InputEvent {
    pub(crate) fn stamped(event: PointerEvent, sequence: u64) -> Self {
        Self {
            kind: event.kind,
            pointer_id: event.pointer_id,
            x: event.x,
            y: event.y,
            sequence,
        }
    }

    /// Strips the sequence number.
    pub fn pointer_event(&self) -> PointerEvent {
        PointerEvent::new(self.kind, self.pointer_id, self.x, self.y)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
