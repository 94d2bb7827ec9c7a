//! Scroll anchoring for a message timeline.
//!
//! Consumes the height observer's events: jumps to the entry message once it
//! is laid out, and compensates for messages above the viewport that grow or
//! shrink so the visible messages do not move.

use crate::observer::ObserverEvent;

/// Space left above the entry message when jumping to it.
const ENTRY_MARGIN: f32 = 16.0;

#[derive(Debug, Default, Clone)]
pub struct ScrollAnchor {
    /// Last scroll offset reported by the scroll area.
    offset: f32,
    /// Offset to apply on the next frame.
    pending: Option<f32>,
    /// The entry message has been positioned; no more auto jumps.
    entry_positioned: bool,
}

impl ScrollAnchor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the scroll area's current offset.
    pub fn sync_offset(&mut self, offset: f32) {
        if self.pending.is_none() {
            self.offset = offset;
        }
    }

    pub fn offset(&self) -> f32 {
        self.pending.unwrap_or(self.offset)
    }

    pub fn entry_positioned(&self) -> bool {
        self.entry_positioned
    }

    /// Apply one observer event. `viewport_top` is the top edge of the
    /// visible area, in the same coordinates as the event.
    pub fn handle(&mut self, event: &ObserverEvent, viewport_top: f32) {
        match event {
            ObserverEvent::EntryMessageLoaded { offset, .. } => {
                if self.entry_positioned {
                    tracing::trace!("entry message already positioned");
                    return;
                }
                let target = (offset - ENTRY_MARGIN).max(0.0);
                tracing::debug!(target, "scrolling to entry message");
                self.pending = Some(target);
                self.entry_positioned = true;
            }
            ObserverEvent::HeightChanged { change, .. } => {
                if change.height_diff == 0.0 || change.last_bottom > viewport_top {
                    return;
                }
                let next = (self.offset() + change.height_diff).max(0.0);
                tracing::trace!(diff = change.height_diff, next, "compensating height change above viewport");
                self.pending = Some(next);
            }
        }
    }

    /// Offset the scroll area should jump to, if any. Returned once.
    pub fn take_request(&mut self) -> Option<f32> {
        let request = self.pending.take();
        if let Some(offset) = request {
            self.offset = offset;
        }
        request
    }

    /// Forget everything, e.g. after navigating to another channel.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
