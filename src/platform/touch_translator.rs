//=========================================================================
// Touch Translator
//=========================================================================
//
// Converts winit's per-contact touch phases into the host-native
// multi-touch encoding consumed by the `PointerTracker`.
//
// Architecture:
//   winit Touch { phase, id } → TouchTranslator → RawTouchEvent → TouchInput
//
// winit reports one contact per event; the raw encoding reports every
// active sample with an action index. The translator keeps the active
// set so each raw event carries all samples, the way a phone does.
//
// winit touch ids are opaque u64s; they are mapped to the lowest free
// non-negative pointer id for the lifetime of the contact.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use log::trace;
use winit::event::TouchPhase;

//=== Internal Dependencies ===============================================

use crate::core::input::{PointerId, RawAction, RawPointer, RawTouchEvent};

//=== Constants ===========================================================

/// Pointer id used for the emulated mouse contact.
pub const MOUSE_POINTER_ID: PointerId = PointerId::MAX;

/// winit-side id reserved for the emulated mouse contact.
pub(crate) const MOUSE_TOUCH_ID: u64 = u64::MAX;

//=== TouchTranslator =====================================================

#[derive(Debug, Default)]
pub(crate) struct TouchTranslator {
    /// winit touch id → pointer id.
    ids: BTreeMap<u64, PointerId>,

    /// Active samples by pointer id (ascending = host sample order).
    samples: BTreeMap<PointerId, (f32, f32)>,
}

impl TouchTranslator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Translates one winit contact update.
    ///
    /// Returns `None` for updates about contacts that never started.
    pub(crate) fn translate(
        &mut self,
        phase: TouchPhase,
        touch_id: u64,
        x: f32,
        y: f32,
    ) -> Option<RawTouchEvent> {
        match phase {
            TouchPhase::Started => {
                if let Some(&pointer_id) = self.ids.get(&touch_id) {
                    // Repeated start: a re-press of this contact only. A
                    // primary Down would release every other finger.
                    self.samples.insert(pointer_id, (x, y));
                    let action = if self.samples.len() > 1 {
                        RawAction::PointerDown
                    } else {
                        RawAction::Down
                    };
                    return Some(self.event(action, pointer_id));
                }

                let pointer_id = self.allocate(touch_id);
                let action = if self.samples.is_empty() {
                    RawAction::Down
                } else {
                    RawAction::PointerDown
                };
                self.samples.insert(pointer_id, (x, y));
                Some(self.event(action, pointer_id))
            }

            TouchPhase::Moved => {
                let pointer_id = self.known(touch_id)?;
                self.samples.insert(pointer_id, (x, y));
                Some(self.event(RawAction::Move, pointer_id))
            }

            TouchPhase::Ended | TouchPhase::Cancelled => {
                let pointer_id = self.known(touch_id)?;
                self.samples.insert(pointer_id, (x, y));

                let last = self.samples.len() == 1;
                let action = match (phase, last) {
                    (TouchPhase::Cancelled, true) => RawAction::Cancel,
                    (_, true) => RawAction::Up,
                    (_, false) => RawAction::PointerUp,
                };
                let event = self.event(action, pointer_id);

                self.samples.remove(&pointer_id);
                self.ids.remove(&touch_id);
                Some(event)
            }
        }
    }

    pub(crate) fn active_count(&self) -> usize {
        self.samples.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn known(&self, touch_id: u64) -> Option<PointerId> {
        let found = self.ids.get(&touch_id).copied();
        if found.is_none() {
            trace!(target: "platform::input", "Update for unknown touch {} ignored", touch_id);
        }
        found
    }

    fn allocate(&mut self, touch_id: u64) -> PointerId {
        let pointer_id = if touch_id == MOUSE_TOUCH_ID {
            MOUSE_POINTER_ID
        } else {
            (0..MOUSE_POINTER_ID)
                .find(|id| !self.samples.contains_key(id))
                .unwrap_or(MOUSE_POINTER_ID - 1)
        };
        self.ids.insert(touch_id, pointer_id);
        pointer_id
    }

    fn event(&self, action: RawAction, pointer_id: PointerId) -> RawTouchEvent {
        let pointers: Vec<RawPointer> = self
            .samples
            .iter()
            .map(|(&id, &(x, y))| RawPointer::new(id, x, y))
            .collect();
        let action_index = pointers
            .iter()
            .position(|p| p.id == pointer_id)
            .unwrap_or(0);
        RawTouchEvent::new(action, action_index, pointers)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
