//! A virtual clock with delayed, cancellable actions. Nothing here sleeps: the owner moves the
//! clock forward and collects whatever came due.

use std::time::Duration;

/// Identifies a scheduled action so it can be cancelled before it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Scheduled<T> {
    handle: TaskHandle,
    due: Duration,
    action: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Scheduler<T> {
        Scheduler {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|task| task.handle == handle)
    }

    /// Queues `action` to fire once `delay` has passed on the clock.
    pub fn schedule(&mut self, delay: Duration, action: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            handle,
            due: self.now + delay,
            action,
        });
        handle
    }

    /// Drops the action behind `handle`. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.handle != handle);
        before != self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Time left until the earliest pending action is due.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|task| task.due.saturating_sub(self.now))
            .min()
    }

    /// Pops the earliest action due no later than `until`, moving the clock to its due time.
    /// Ties fire in scheduling order.
    pub fn next_due(&mut self, until: Duration) -> Option<(TaskHandle, T)> {
        let (idx, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= until)
            .min_by_key(|(_, task)| (task.due, task.handle.0))?;
        let task = self.pending.remove(idx);
        self.now = self.now.max(task.due);
        Some((task.handle, task.action))
    }

    /// Moves the clock to `until` once every action due before it has been collected.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2 * SECOND, "late");
        scheduler.schedule(SECOND, "early");
        assert_eq!(scheduler.time_until_next(), Some(SECOND));

        assert_eq!(scheduler.next_due(SECOND / 2), None);
        assert_eq!(scheduler.next_due(3 * SECOND).map(|(_, a)| a), Some("early"));
        assert_eq!(scheduler.now(), SECOND);
        assert_eq!(scheduler.next_due(3 * SECOND).map(|(_, a)| a), Some("late"));
        assert_eq!(scheduler.next_due(3 * SECOND), None);
        scheduler.settle(3 * SECOND);
        assert_eq!(scheduler.now(), 3 * SECOND);
    }

    #[test]
    fn test_cancelled_action_never_fires() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(SECOND, 1);
        scheduler.schedule(SECOND, 2);
        assert!(scheduler.is_pending(handle));
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(!scheduler.is_pending(handle));

        let fired: Vec<i32> = std::iter::from_fn(|| scheduler.next_due(5 * SECOND))
            .map(|(_, action)| action)
            .collect();
        assert_eq!(fired, vec![2]);
    }

    #[test]
    fn test_delay_is_relative_to_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.settle(10 * SECOND);
        scheduler.schedule(SECOND, ());
        assert_eq!(scheduler.time_until_next(), Some(SECOND));
        assert!(scheduler.next_due(10 * SECOND).is_none());
        assert!(scheduler.next_due(11 * SECOND).is_some());
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(SECOND, ());
        scheduler.schedule(SECOND, ());
        scheduler.cancel_all();
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.time_until_next(), None);
    }
}
