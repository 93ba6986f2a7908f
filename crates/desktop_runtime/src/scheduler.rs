//! Virtual-time queue for window transition completions.

use crate::model::{WindowId, WindowTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A transition completion due at `due_ms` on the virtual clock.
pub struct ScheduledTransition {
    /// Virtual time the transition completes at.
    pub due_ms: u64,
    /// Window the transition belongs to.
    pub window_id: WindowId,
    /// Transition that completes.
    pub transition: WindowTransition,
    seq: u64,
}

#[derive(Debug, Clone, Default)]
/// Pending transition completions, fired by [`TransitionScheduler::advance`].
///
/// Time only moves when the owner advances it, so tests step through animations
/// deterministically.
pub struct TransitionScheduler {
    now_ms: u64,
    next_seq: u64,
    pending: Vec<ScheduledTransition>,
}

impl TransitionScheduler {
    /// Schedules `transition` to complete `delay_ms` from now.
    ///
    /// An earlier pending entry for the same window and transition is replaced.
    pub fn schedule(&mut self, window_id: WindowId, transition: WindowTransition, delay_ms: u64) {
        self.pending
            .retain(|entry| !(entry.window_id == window_id && entry.transition == transition));
        self.pending.push(ScheduledTransition {
            due_ms: self.now_ms.saturating_add(delay_ms),
            window_id,
            transition,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Drops every pending entry for a window.
    pub fn cancel_window(&mut self, window_id: WindowId) {
        self.pending.retain(|entry| entry.window_id != window_id);
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Moves the clock forward and returns the entries that became due, oldest deadline first.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<ScheduledTransition> {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        let now = self.now_ms;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|entry| entry.due_ms <= now);
        self.pending = pending;
        due.sort_by_key(|entry| (entry.due_ms, entry.seq));
        due
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn entries_fire_once_their_deadline_passes() {
        let mut scheduler = TransitionScheduler::default();
        scheduler.schedule(WindowId(1), WindowTransition::Closing, 200);
        scheduler.schedule(WindowId(2), WindowTransition::Appearing, 10);

        assert!(scheduler.advance(9).is_empty());
        let fired = scheduler.advance(1);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].window_id, WindowId(2));

        assert!(scheduler.advance(150).is_empty());
        let fired = scheduler.advance(40);
        assert_eq!(fired[0].transition, WindowTransition::Closing);
        assert_eq!(fired[0].due_ms, 200);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn rescheduling_replaces_the_pending_entry() {
        let mut scheduler = TransitionScheduler::default();
        scheduler.schedule(WindowId(1), WindowTransition::Maximizing, 300);
        scheduler.advance(200);
        scheduler.schedule(WindowId(1), WindowTransition::Maximizing, 300);

        assert!(scheduler.advance(200).is_empty());
        assert_eq!(scheduler.advance(100).len(), 1);
    }

    #[test]
    fn due_entries_come_back_in_deadline_order() {
        let mut scheduler = TransitionScheduler::default();
        scheduler.schedule(WindowId(1), WindowTransition::Closing, 30);
        scheduler.schedule(WindowId(2), WindowTransition::Closing, 10);
        scheduler.schedule(WindowId(3), WindowTransition::Closing, 10);
        let order: Vec<u64> = scheduler.advance(100).iter().map(|e| e.window_id.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }
}
