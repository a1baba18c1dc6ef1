//=========================================================================
// Input Pipeline
//
// Producer-side half of the bridge: raw host touch callbacks are
// normalized by the `PointerTracker`, stamped and queued by the
// `InputQueue`, and drained on the render thread.
//
// Responsibilities:
// - Decode the host's native multi-touch encoding (`raw`)
// - Track active contacts and classify Down/Move/Up (`pointer_tracker`)
// - Hand events to the render thread without blocking (`input_queue`)
//
// Notes:
// `TouchInput` bundles the tracker with the queue sender. It is `Send`
// and owned by the input-producing thread; nothing in it is shared
// except the queue itself.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
pub mod input_queue;
pub mod pointer_tracker;
pub mod raw;

//=== Public API ==========================================================

pub use event::{InputEvent, PointerEvent, PointerId, PointerKind};
pub use input_queue::{input_queue, InputReceiver, InputSender};
pub use pointer_tracker::{PointerPhase, PointerRecord, PointerTracker};
pub use raw::{RawAction, RawPointer, RawTouchEvent};

//=== External Crates =====================================================

use log::trace;

//=== TouchInput ==========================================================

/// The bridge's `touch` capability: normalizes and enqueues raw events.
#[derive(Debug)]
pub struct TouchInput {
    tracker: PointerTracker,
    queue: InputSender,
}

impl TouchInput {
    pub fn new(queue: InputSender) -> Self {
        Self {
            tracker: PointerTracker::new(),
            queue,
        }
    }

    /// Processes one raw callback. Returns how many events were enqueued.
    ///
    /// After the surface is destroyed this is a no-op.
    pub fn on_touch(&mut self, raw: &RawTouchEvent) -> usize {
        if self.queue.is_closed() {
            trace!(target: "input", "Surface destroyed, ignoring {:?}", raw.action);
            return 0;
        }

        self.tracker
            .on_raw_event(raw)
            .into_iter()
            .filter_map(|event| self.queue.enqueue(event))
            .count()
    }

    /// Convenience for hosts that decode the packed action themselves.
    pub fn on_packed_touch(&mut self, action: i32, pointers: Vec<RawPointer>) -> usize {
        self.on_touch(&RawTouchEvent::from_packed(action, pointers))
    }

    //--- Diagnostics ------------------------------------------------------

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn stale_events(&self) -> u64 {
        self.tracker.stale_events()
    }

    pub fn dropped_events(&self) -> u64 {
        self.queue.dropped()
    }

    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
