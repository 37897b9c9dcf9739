use std::time::{Duration, Instant};

/// A payload waiting for its quiet period to end
#[derive(Debug, Clone)]
pub struct ScheduledTask<T> {
    pub payload: T,
    pub due: Instant,
}

/// Holds at most one scheduled task. Scheduling replaces whatever was pending.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<ScheduledTask<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Drop the pending task. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Schedule `payload` to fire `delay` after `now`
    pub fn schedule(&mut self, payload: T, now: Instant) {
        self.cancel();
        self.pending = Some(ScheduledTask {
            payload,
            due: now + self.delay,
        });
    }

    /// Take the payload if its time has come
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(task) if task.due <= now => self.pending.take().map(|task| task.payload),
            _ => None,
        }
    }

    /// When the pending task is due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|task| task.due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(600);

    #[test]
    fn test_fires_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule("a", start);

        assert_eq!(debouncer.fire(start + Duration::from_millis(599)), None);
        assert_eq!(debouncer.fire(start + DELAY), Some("a"));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.fire(start + DELAY * 2), None);
    }

    #[test]
    fn test_reschedule_replaces_and_restarts() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.schedule(1, start);
        debouncer.schedule(2, start + Duration::from_millis(400));

        assert_eq!(debouncer.fire(start + DELAY), None);
        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(1000)));
        assert_eq!(debouncer.fire(start + Duration::from_millis(1000)), Some(2));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(DELAY);
        assert!(!debouncer.cancel());
        debouncer.schedule((), start);
        assert!(debouncer.cancel());
        assert_eq!(debouncer.fire(start + DELAY), None);
    }
}
