//=========================================================================
// Input Queue
//=========================================================================
//
// Bounded, order-preserving hand-off of pointer events from the input
// thread to the render thread.
//
// Architecture:
// ```text
//  Input Thread                          Render Thread
//  ┌─────────────────────┐              ┌─────────────────────┐
//  │ InputSender         │   bounded    │ InputReceiver       │
//  │  ├─ stamp sequence  │ ──────────>  │  └─ drain() per tick│
//  │  └─ evict oldest    │   channel    │                     │
//  │     when full       │              │                     │
//  └─────────────────────┘              └─────────────────────┘
// ```
//
// Saturation policy: drop-oldest. The producer keeps a receiver clone
// used only for eviction, so `enqueue` never waits on the consumer.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, PointerEvent};

//=== Shared State ========================================================

#[derive(Debug, Default)]
struct QueueShared {
    dropped: AtomicU64,
    closed: AtomicBool,
}

//=== Construction ========================================================

/// Creates a connected sender/receiver pair holding at most `capacity`
/// undrained events.
///
/// # Panics
///
/// Panics if `capacity == 0`.
pub fn input_queue(capacity: usize) -> (InputSender, InputReceiver) {
    assert!(capacity > 0, "Input queue capacity must be positive");

    let (tx, rx) = bounded(capacity);
    let shared = Arc::new(QueueShared::default());

    let sender = InputSender {
        tx,
        evict: rx.clone(),
        next_sequence: 0,
        shared: Arc::clone(&shared),
    };
    let receiver = InputReceiver {
        rx,
        capacity,
        shared,
    };

    (sender, receiver)
}

//=== InputSender =========================================================

/// Producer half. Owned by the input thread; not cloneable, so sequence
/// numbers follow enqueue order exactly.
#[derive(Debug)]
pub struct InputSender {
    tx: Sender<InputEvent>,
    evict: Receiver<InputEvent>,
    next_sequence: u64,
    shared: Arc<QueueShared>,
}

impl InputSender {
    /// Stamps `event` with the next sequence number and enqueues it.
    ///
    /// When the queue is full the oldest undrained event is discarded and
    /// the drop counter incremented. Returns the assigned sequence, or
    /// `None` once the queue has been closed.
    pub fn enqueue(&mut self, event: PointerEvent) -> Option<u64> {
        if self.is_closed() {
            trace!(target: "input::queue", "Queue closed, ignoring {:?}", event);
            return None;
        }

        let sequence = self.next_sequence;
        let mut pending = InputEvent::stamped(event, sequence);

        loop {
            match self.tx.try_send(pending) {
                Ok(()) => break,
                Err(TrySendError::Full(rejected)) => {
                    // The consumer may drain between the failed send and
                    // this eviction; then there is nothing to drop.
                    if let Ok(evicted) = self.evict.try_recv() {
                        let total = self.shared.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                        debug!(
                            target: "input::queue",
                            "Queue full, dropped event #{} ({} dropped so far)",
                            evicted.sequence,
                            total
                        );
                    }
                    pending = rejected;
                }
                Err(TrySendError::Disconnected(_)) => return None,
            }
        }

        self.next_sequence += 1;
        Some(sequence)
    }

    /// Total number of events discarded by the drop-oldest policy.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}

//=== InputReceiver =======================================================

/// Consumer half. Owned by the render thread.
#[derive(Debug)]
pub struct InputReceiver {
    rx: Receiver<InputEvent>,
    capacity: usize,
    shared: Arc<QueueShared>,
}

impl InputReceiver {
    /// Removes and returns every event queued when the call starts, in
    /// ascending sequence order.
    ///
    /// Events enqueued while draining are left for the next call.
    pub fn drain(&self) -> Vec<InputEvent> {
        let pending = self.rx.len();
        let mut events = Vec::with_capacity(pending);

        while events.len() < pending {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                // Producer evicted entries concurrently.
                Err(_) => break,
            }
        }

        debug_assert!(
            events.windows(2).all(|w| w[0].sequence < w[1].sequence),
            "drained events out of sequence order"
        );

        events
    }

    /// Closes the queue: later enqueues become no-ops and everything still
    /// queued is discarded. Returns the number of discarded events.
    pub fn close(&self) -> usize {
        self.shared.closed.store(true, Ordering::Release);
        let discarded = self.rx.try_iter().count();
        if discarded > 0 {
            debug!(target: "input::queue", "Discarded {} events on close", discarded);
        }
        discarded
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Total number of events discarded by the drop-oldest policy.
    pub fn dropped(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{PointerId, PointerKind};
    use std::thread;

    fn mv(id: PointerId, x: f32) -> PointerEvent {
        PointerEvent::new(PointerKind::Move, id, x, 0.0)
    }

    #[test]
    fn drain_returns_events_in_sequence_order() {
        let (mut tx, rx) = input_queue(16);

        tx.enqueue(mv(1, 1.0));
        tx.enqueue(mv(2, 2.0));
        tx.enqueue(mv(1, 3.0));

        let events = rx.drain();
        let sequences: Vec<u64> = events.iter().map(|e| e.sequence).collect();
        let ids: Vec<PointerId> = events.iter().map(|e| e.pointer_id).collect();

        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(ids, vec![1, 2, 1]);
    }

    #[test]
    fn drain_empties_queue() {
        let (mut tx, rx) = input_queue(4);
        tx.enqueue(mv(1, 1.0));

        assert_eq!(rx.drain().len(), 1);
        assert!(rx.drain().is_empty());
        assert!(rx.is_empty());
    }

    #[test]
    fn saturation_drops_oldest() {
        const N: usize = 4;
        let (mut tx, rx) = input_queue(N);

        for i in 0..=N {
            tx.enqueue(mv(1, i as f32));
        }

        let events = rx.drain();
        let xs: Vec<f32> = events.iter().map(|e| e.x).collect();

        assert_eq!(xs, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(rx.dropped(), 1);
        assert_eq!(tx.dropped(), 1);
    }

    #[test]
    fn sequences_keep_increasing_across_drains() {
        let (mut tx, rx) = input_queue(2);
        tx.enqueue(mv(1, 0.0));
        rx.drain();

        assert_eq!(tx.enqueue(mv(1, 1.0)), Some(1));
        assert_eq!(rx.drain()[0].sequence, 1);
    }

    #[test]
    fn close_discards_and_rejects() {
        let (mut tx, rx) = input_queue(8);
        tx.enqueue(mv(1, 0.0));
        tx.enqueue(mv(1, 1.0));

        assert_eq!(rx.close(), 2);
        assert!(tx.is_closed());
        assert_eq!(tx.enqueue(mv(1, 2.0)), None);
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn concurrent_producer_never_duplicates_or_reorders() {
        const TOTAL: u64 = 10_000;
        let (mut tx, rx) = input_queue(64);

        let producer = thread::spawn(move || {
            for i in 0..TOTAL {
                tx.enqueue(mv((i % 3) as PointerId, i as f32));
            }
            tx
        });

        let mut received = Vec::new();
        loop {
            received.extend(rx.drain());
            if producer.is_finished() {
                break;
            }
            thread::yield_now();
        }
        let tx = producer.join().unwrap();
        received.extend(rx.drain());

        assert!(received.windows(2).all(|w| w[0].sequence < w[1].sequence));
        assert_eq!(received.len() as u64 + tx.dropped(), TOTAL);
        assert_eq!(received.last().map(|e| e.sequence), Some(TOTAL - 1));
    }
}
