//=========================================================================
// Raw Touch Encoding
//=========================================================================
//
// Host-native multi-touch events, before normalization.
//
// The encoding follows Android's `MotionEvent`: a masked action code plus
// an action index selecting which pointer sample the action refers to.
// Packed actions carry the index in bits 8..16.
//
// ```text
//   action = 0x0105  →  POINTER_DOWN (5) for the sample at index 1
//            └┬┘└┬┘
//           index  masked action
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event::PointerId;

//=== RawAction ===========================================================

/// Masked action of a raw touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawAction {
    /// First pointer of a gesture went down.
    Down,

    /// An additional pointer went down while others are active.
    PointerDown,

    /// One or more active pointers moved.
    Move,

    /// Last pointer of a gesture went up.
    Up,

    /// A non-last pointer went up.
    PointerUp,

    /// The gesture was aborted by the host.
    Cancel,

    /// Touch landed outside the surface bounds.
    Outside,

    /// Any code without touch semantics (hover, scroll, buttons).
    Other(i32),
}

impl RawAction {
    pub const ACTION_MASK: i32 = 0xff;
    pub const ACTION_POINTER_INDEX_MASK: i32 = 0xff00;
    pub const ACTION_POINTER_INDEX_SHIFT: i32 = 8;

    pub const ACTION_DOWN: i32 = 0;
    pub const ACTION_UP: i32 = 1;
    pub const ACTION_MOVE: i32 = 2;
    pub const ACTION_CANCEL: i32 = 3;
    pub const ACTION_OUTSIDE: i32 = 4;
    pub const ACTION_POINTER_DOWN: i32 = 5;
    pub const ACTION_POINTER_UP: i32 = 6;

    /// Decodes an already-masked action code.
    pub fn from_masked(code: i32) -> Self {
        match code {
            Self::ACTION_DOWN => Self::Down,
            Self::ACTION_UP => Self::Up,
            Self::ACTION_MOVE => Self::Move,
            Self::ACTION_CANCEL => Self::Cancel,
            Self::ACTION_OUTSIDE => Self::Outside,
            Self::ACTION_POINTER_DOWN => Self::PointerDown,
            Self::ACTION_POINTER_UP => Self::PointerUp,
            other => Self::Other(other),
        }
    }

    /// Splits a packed action into its masked action and pointer index.
    pub fn decode(packed: i32) -> (Self, usize) {
        let masked = packed & Self::ACTION_MASK;
        let index = (packed & Self::ACTION_POINTER_INDEX_MASK) >> Self::ACTION_POINTER_INDEX_SHIFT;
        (Self::from_masked(masked), index as usize)
    }
}

//=== RawPointer ==========================================================

/// One pointer sample reported in a raw event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointer {
    pub id: PointerId,
    pub x: f32,
    pub y: f32,
}

impl RawPointer {
    pub fn new(id: PointerId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

//=== RawTouchEvent =======================================================

/// A raw multi-touch callback as delivered by the host.
///
/// `pointers` lists every sample the host reported, in host order.
/// `action_index` selects the sample the action applies to; it is ignored
/// for `Move` and `Cancel`, which concern all samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTouchEvent {
    pub action: RawAction,
    pub action_index: usize,
    pub pointers: Vec<RawPointer>,
}

impl RawTouchEvent {
    pub fn new(action: RawAction, action_index: usize, pointers: Vec<RawPointer>) -> Self {
        Self {
            action,
            action_index,
            pointers,
        }
    }

    /// Builds an event from a packed host action code.
    pub fn from_packed(action: i32, pointers: Vec<RawPointer>) -> Self {
        let (action, action_index) = RawAction::decode(action);
        Self::new(action, action_index, pointers)
    }

    /// Single-sample event; the common case for down/up callbacks.
    pub fn single(action: RawAction, id: PointerId, x: f32, y: f32) -> Self {
        Self::new(action, 0, vec![RawPointer::new(id, x, y)])
    }

    /// The sample the action refers to, if the index is in range.
    pub fn action_pointer(&self) -> Option<&RawPointer> {
        self.pointers.get(self.action_index)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
