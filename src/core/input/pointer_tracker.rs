//=========================================================================
// Pointer Tracker
//=========================================================================
//
// Per-contact state tracking for multi-touch input.
//
// Architecture:
//   RawTouchEvent → on_raw_event() → BTreeMap<PointerId, PointerRecord>
//                                  → Vec<PointerEvent>
//
// Lives on the input-producing thread and is its only mutator.
// Stale input (Move/Up for an untracked id) is dropped and counted.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::event::{PointerEvent, PointerId, PointerKind};
use super::raw::{RawAction, RawPointer, RawTouchEvent};

//=== PointerPhase ========================================================

/// Where a tracked contact is in its Down → Move* → Up life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Moving,
    Up,
}

//=== PointerRecord =======================================================

/// Last known state of one contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRecord {
    pub pointer_id: PointerId,
    pub x: f32,
    pub y: f32,
    pub state: PointerPhase,
}

impl PointerRecord {
    fn event(&self) -> PointerEvent {
        let kind = match self.state {
            PointerPhase::Down => PointerKind::Down,
            PointerPhase::Moving => PointerKind::Move,
            PointerPhase::Up => PointerKind::Up,
        };
        PointerEvent::new(kind, self.pointer_id, self.x, self.y)
    }
}

//=== PointerTracker ======================================================

/// Classifies raw touch callbacks into per-pointer Down/Move/Up events.
#[derive(Debug, Default)]
pub struct PointerTracker {
    active: BTreeMap<PointerId, PointerRecord>,
    stale_events: u64,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Event Processing -------------------------------------------------

    /// Normalizes one raw callback into zero or more pointer events.
    ///
    /// Events are returned in the order they must reach the engine.
    pub fn on_raw_event(&mut self, raw: &RawTouchEvent) -> Vec<PointerEvent> {
        let mut out = Vec::with_capacity(raw.pointers.len().max(1));

        match raw.action {
            RawAction::Down => {
                // A new gesture while contacts are still tracked means
                // their Up never arrived.
                self.release_all(&mut out);
                self.press_action_pointer(raw, &mut out);
            }

            RawAction::PointerDown => self.press_action_pointer(raw, &mut out),

            RawAction::Move => {
                for sample in &raw.pointers {
                    self.move_pointer(sample, &mut out);
                }
            }

            RawAction::PointerUp => self.release_action_pointer(raw, &mut out),

            RawAction::Up => {
                self.release_action_pointer(raw, &mut out);
                self.release_all(&mut out);
            }

            RawAction::Cancel => self.release_all(&mut out),

            RawAction::Outside | RawAction::Other(_) => {
                trace!(target: "input", "Ignoring raw action {:?}", raw.action);
            }
        }

        out
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_active(&self, pointer_id: PointerId) -> bool {
        self.active.contains_key(&pointer_id)
    }

    pub fn record(&self, pointer_id: PointerId) -> Option<&PointerRecord> {
        self.active.get(&pointer_id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of raw samples dropped because they referenced no tracked
    /// contact (or no sample at all).
    pub fn stale_events(&self) -> u64 {
        self.stale_events
    }

    //--- Internal Helpers -------------------------------------------------

    fn press_action_pointer(&mut self, raw: &RawTouchEvent, out: &mut Vec<PointerEvent>) {
        match raw.action_pointer() {
            Some(sample) => self.press(sample, out),
            None => self.drop_stale(raw),
        }
    }

    fn release_action_pointer(&mut self, raw: &RawTouchEvent, out: &mut Vec<PointerEvent>) {
        let Some(sample) = raw.action_pointer() else {
            self.drop_stale(raw);
            return;
        };

        match self.active.remove(&sample.id) {
            Some(mut record) => {
                record.x = sample.x;
                record.y = sample.y;
                record.state = PointerPhase::Up;
                out.push(record.event());
            }
            None => {
                self.stale_events += 1;
                trace!(target: "input", "Dropping up for untracked pointer {}", sample.id);
            }
        }
    }

    fn press(&mut self, sample: &RawPointer, out: &mut Vec<PointerEvent>) {
        if let Some(mut previous) = self.active.remove(&sample.id) {
            warn!(
                target: "input",
                "Pointer {} pressed while already down, releasing previous contact",
                sample.id
            );
            previous.state = PointerPhase::Up;
            out.push(previous.event());
        }

        let record = PointerRecord {
            pointer_id: sample.id,
            x: sample.x,
            y: sample.y,
            state: PointerPhase::Down,
        };
        out.push(record.event());
        self.active.insert(sample.id, record);
    }

    fn move_pointer(&mut self, sample: &RawPointer, out: &mut Vec<PointerEvent>) {
        match self.active.get_mut(&sample.id) {
            Some(record) => {
                record.x = sample.x;
                record.y = sample.y;
                record.state = PointerPhase::Moving;
                out.push(record.event());
            }
            None => {
                self.stale_events += 1;
                trace!(target: "input", "Dropping move for untracked pointer {}", sample.id);
            }
        }
    }

    /// Releases every tracked contact at its last known position,
    /// in ascending pointer id order.
    fn release_all(&mut self, out: &mut Vec<PointerEvent>) {
        for (_, mut record) in std::mem::take(&mut self.active) {
            record.state = PointerPhase::Up;
            out.push(record.event());
        }
    }

    fn drop_stale(&mut self, raw: &RawTouchEvent) {
        self.stale_events += 1;
        warn!(
            target: "input",
            "Raw {:?} has no sample at index {} ({} samples)",
            raw.action,
            raw.action_index,
            raw.pointers.len()
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn single(action: RawAction, id: PointerId, x: f32, y: f32) -> RawTouchEvent {
        RawTouchEvent::single(action, id, x, y)
    }

    fn ev(kind: PointerKind, id: PointerId, x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(kind, id, x, y)
    }

    #[test]
    fn down_move_up_single_pointer() {
        let mut tracker = PointerTracker::new();

        let down = tracker.on_raw_event(&single(RawAction::Down, 1, 10.0, 10.0));
        assert_eq!(down, vec![ev(PointerKind::Down, 1, 10.0, 10.0)]);
        assert!(tracker.is_active(1));

        let moved = tracker.on_raw_event(&single(RawAction::Move, 1, 12.0, 11.0));
        assert_eq!(moved, vec![ev(PointerKind::Move, 1, 12.0, 11.0)]);
        assert_eq!(tracker.record(1).map(|r| r.state), Some(PointerPhase::Moving));

        let up = tracker.on_raw_event(&single(RawAction::Up, 1, 12.0, 11.0));
        assert_eq!(up, vec![ev(PointerKind::Up, 1, 12.0, 11.0)]);
        assert!(!tracker.is_active(1));
    }

    #[test]
    fn secondary_pointer_uses_action_index() {
        let mut tracker = PointerTracker::new();
        tracker.on_raw_event(&single(RawAction::Down, 0, 1.0, 1.0));

        let samples = vec![RawPointer::new(0, 1.0, 1.0), RawPointer::new(4, 50.0, 60.0)];
        let events = tracker.on_raw_event(&RawTouchEvent::from_packed(0x0105, samples.clone()));
        assert_eq!(events, vec![ev(PointerKind::Down, 4, 50.0, 60.0)]);
        assert_eq!(tracker.active_count(), 2);

        let events = tracker.on_raw_event(&RawTouchEvent::from_packed(0x0106, samples));
        assert_eq!(events, vec![ev(PointerKind::Up, 4, 50.0, 60.0)]);
        assert!(tracker.is_active(0));
        assert!(!tracker.is_active(4));
    }

    #[test]
    fn move_expands_per_active_pointer_in_host_order() {
        let mut tracker = PointerTracker::new();
        tracker.on_raw_event(&single(RawAction::Down, 2, 0.0, 0.0));
        tracker.on_raw_event(&RawTouchEvent::new(
            RawAction::PointerDown,
            1,
            vec![RawPointer::new(2, 0.0, 0.0), RawPointer::new(1, 5.0, 5.0)],
        ));

        let events = tracker.on_raw_event(&RawTouchEvent::new(
            RawAction::Move,
            0,
            vec![RawPointer::new(2, 3.0, 3.0), RawPointer::new(1, 6.0, 7.0)],
        ));

        assert_eq!(
            events,
            vec![ev(PointerKind::Move, 2, 3.0, 3.0), ev(PointerKind::Move, 1, 6.0, 7.0)]
        );
    }

    #[test]
    fn up_without_down_is_dropped() {
        let mut tracker = PointerTracker::new();

        let events = tracker.on_raw_event(&single(RawAction::Up, 5, 3.0, 3.0));

        assert!(events.is_empty());
        assert_eq!(tracker.stale_events(), 1);
    }

    #[test]
    fn move_for_untracked_pointer_is_skipped() {
        let mut tracker = PointerTracker::new();
        tracker.on_raw_event(&single(RawAction::Down, 1, 0.0, 0.0));

        let events = tracker.on_raw_event(&RawTouchEvent::new(
            RawAction::Move,
            0,
            vec![RawPointer::new(9, 1.0, 1.0), RawPointer::new(1, 2.0, 2.0)],
        ));

        assert_eq!(events, vec![ev(PointerKind::Move, 1, 2.0, 2.0)]);
        assert_eq!(tracker.stale_events(), 1);
    }

    #[test]
    fn cancel_releases_all_in_id_order() {
        let mut tracker = PointerTracker::new();
        tracker.on_raw_event(&single(RawAction::Down, 3, 30.0, 30.0));
        tracker.on_raw_event(&RawTouchEvent::new(
            RawAction::PointerDown,
            1,
            vec![RawPointer::new(3, 30.0, 30.0), RawPointer::new(1, 10.0, 10.0)],
        ));

        let events = tracker.on_raw_event(&RawTouchEvent::new(RawAction::Cancel, 0, vec![]));

        assert_eq!(
            events,
            vec![ev(PointerKind::Up, 1, 10.0, 10.0), ev(PointerKind::Up, 3, 30.0, 30.0)]
        );
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn primary_down_releases_leftover_contacts() {
        let mut tracker = PointerTracker::new();
        tracker.on_raw_event(&single(RawAction::Down, 1, 1.0, 1.0));

        // Up for pointer 1 was lost; a fresh gesture starts.
        let events = tracker.on_raw_event(&single(RawAction::Down, 2, 8.0, 8.0));

        assert_eq!(
            events,
            vec![ev(PointerKind::Up, 1, 1.0, 1.0), ev(PointerKind::Down, 2, 8.0, 8.0)]
        );
        assert!(!tracker.is_active(1));
        assert!(tracker.is_active(2));
    }

    #[test]
    fn primary_up_releases_leftover_contacts() {
        let mut tracker = PointerTracker::new();
        tracker.on_raw_event(&single(RawAction::Down, 1, 1.0, 1.0));
        tracker.on_raw_event(&RawTouchEvent::new(
            RawAction::PointerDown,
            1,
            vec![RawPointer::new(1, 1.0, 1.0), RawPointer::new(2, 2.0, 2.0)],
        ));

        let events = tracker.on_raw_event(&single(RawAction::Up, 1, 4.0, 4.0));

        assert_eq!(
            events,
            vec![ev(PointerKind::Up, 1, 4.0, 4.0), ev(PointerKind::Up, 2, 2.0, 2.0)]
        );
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn repeated_down_closes_previous_contact() {
        let mut tracker = PointerTracker::new();
        tracker.on_raw_event(&single(RawAction::Down, 0, 1.0, 1.0));

        let events = tracker.on_raw_event(&RawTouchEvent::new(
            RawAction::PointerDown,
            0,
            vec![RawPointer::new(0, 9.0, 9.0)],
        ));

        assert_eq!(
            events,
            vec![ev(PointerKind::Up, 0, 1.0, 1.0), ev(PointerKind::Down, 0, 9.0, 9.0)]
        );
        assert_eq!(tracker.active_count(), 1);
    }

    #[test]
    fn missing_action_sample_is_stale() {
        let mut tracker = PointerTracker::new();

        let events = tracker.on_raw_event(&RawTouchEvent::new(RawAction::PointerDown, 2, vec![]));

        assert!(events.is_empty());
        assert_eq!(tracker.stale_events(), 1);
    }

    #[test]
    fn outside_and_unknown_actions_produce_nothing() {
        let mut tracker = PointerTracker::new();
        tracker.on_raw_event(&single(RawAction::Down, 1, 0.0, 0.0));

        assert!(tracker.on_raw_event(&single(RawAction::Outside, 1, 0.0, 0.0)).is_empty());
        assert!(tracker.on_raw_event(&single(RawAction::Other(9), 1, 0.0, 0.0)).is_empty());
        assert!(tracker.is_active(1));
        assert_eq!(tracker.stale_events(), 0);
    }
}
