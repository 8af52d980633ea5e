//! Module implementing a debouncer for bursts of edits.

use std::time::{Duration, Instant};


/// Coalesces a burst of changes into a single action,
/// which becomes due once no change arrived for the whole delay.
///
/// The debouncer doesn't keep time on its own: the owner reports changes
/// with `touch` and asks whether the action is due with `poll`.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[inline]
    pub fn new(delay: Duration) -> Self {
        Debouncer{delay, deadline: None}
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a change that happened at given time, postponing the action.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Whether there are changes that haven't been acted upon yet.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time when the pending action becomes due, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Check whether the action is due at given time.
    /// If it is, the pending state is reset and `true` is returned (only once).
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Forget about pending changes, e.g. because they were acted upon already.
    #[inline]
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}


#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};
    use super::Debouncer;

    #[test]
    fn idle() {
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(Instant::now()));
    }

    #[test]
    fn burst_is_coalesced() {
        let start = Instant::now();
        let ms = |n| start + Duration::from_millis(n);
        let mut debouncer = Debouncer::new(Duration::from_millis(150));

        debouncer.touch(ms(0));
        debouncer.touch(ms(100));
        debouncer.touch(ms(200));
        assert!(!debouncer.poll(ms(300)));
        assert!(debouncer.poll(ms(350)));
        assert!(!debouncer.poll(ms(400)));
    }

    #[test]
    fn cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(150));
        debouncer.touch(start);
        debouncer.cancel();
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
    }
}
