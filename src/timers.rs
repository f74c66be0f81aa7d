//! Scheduled cosmetic delays. The browser clears its queue on teardown, so
//! nothing fires afterwards even through another handle.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Delay between the browser becoming visible and the welcome modal.
pub const TOUR_WELCOME_DELAY: Duration = Duration::from_millis(100);
/// Delay before a requested highlight is applied.
pub const HIGHLIGHT_DELAY: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    ShowTourWelcome,
    ApplyHighlight(u32),
}

/// A queue of pending events. Clones share the same queue.
#[derive(Clone, Debug, Default)]
pub struct Timers {
    pending: Rc<RefCell<Vec<(Instant, TimerEvent)>>>,
}

impl Timers {
    /// Schedule `event` to fire `delay` after `now`. Re-scheduling an event
    /// that is already pending moves its deadline.
    pub fn schedule(&self, event: TimerEvent, delay: Duration, now: Instant) {
        self.cancel(event);
        self.pending.borrow_mut().push((now + delay, event));
        tracing::trace!(?event, ?delay, "timer scheduled");
    }

    pub fn cancel(&self, event: TimerEvent) {
        self.pending.borrow_mut().retain(|(_, e)| *e != event);
    }

    /// Remove and return every event whose deadline has passed, earliest
    /// first.
    pub fn due(&self, now: Instant) -> Vec<TimerEvent> {
        let mut fired: Vec<(Instant, TimerEvent)> = Vec::new();
        self.pending.borrow_mut().retain(|entry| {
            if entry.0 <= now {
                fired.push(*entry);
                false
            } else {
                true
            }
        });
        fired.sort_by_key(|(at, _)| *at);
        fired.into_iter().map(|(_, e)| e).collect()
    }

    /// Time until the next deadline, for sizing the event-poll timeout.
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.pending
            .borrow()
            .iter()
            .map(|(at, _)| at.saturating_duration_since(now))
            .min()
    }

    /// Drop every pending timer.
    pub fn clear(&self) {
        let mut pending = self.pending.borrow_mut();
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "cancelled pending timers");
        }
        pending.clear();
    }
}
