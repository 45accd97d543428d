//! Debounced resource switching for the selector pane.
//!
//! Every cursor movement issues a new token; only the most recent token
//! may fire. The timer itself lives in the runtime, which reports back the
//! generation it was started for.

use lazyhog_core::Resource;
use std::time::{Duration, Instant};

/// A scheduled switch to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceToken {
    pub target: Resource,
    pub issued_at: Instant,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<DebounceToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Supersede any pending token with a new one for `target`.
    pub fn issue(&mut self, target: Resource, now: Instant) -> DebounceToken {
        self.generation += 1;
        let token = DebounceToken {
            target,
            issued_at: now,
            generation: self.generation,
        };
        self.pending = Some(token);
        token
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&DebounceToken> {
        self.pending.as_ref()
    }

    /// Consume the pending token if `generation` is still the latest.
    pub fn fire(&mut self, generation: u64) -> Option<Resource> {
        match self.pending {
            Some(token) if token.generation == generation => {
                self.pending = None;
                Some(token.target)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_token_fires() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(200));
        let first = debouncer.issue(Resource::Persons, now);
        let second = debouncer.issue(Resource::Flags, now);

        assert_eq!(debouncer.fire(first.generation), None);
        assert_eq!(debouncer.fire(second.generation), Some(Resource::Flags));
        assert!(debouncer.pending().is_none());
    }

    #[test]
    fn test_token_fires_once() {
        let mut debouncer = Debouncer::new(Duration::from_millis(200));
        let token = debouncer.issue(Resource::Persons, Instant::now());
        assert_eq!(debouncer.fire(token.generation), Some(Resource::Persons));
        assert_eq!(debouncer.fire(token.generation), None);
    }

    #[test]
    fn test_cancel_invalidates_pending() {
        let mut debouncer = Debouncer::new(Duration::from_millis(200));
        let token = debouncer.issue(Resource::Flags, Instant::now());
        debouncer.cancel();
        assert_eq!(debouncer.fire(token.generation), None);
    }

    #[test]
    fn test_generations_increase() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        let now = Instant::now();
        let a = debouncer.issue(Resource::Events, now);
        let b = debouncer.issue(Resource::Events, now);
        assert!(b.generation > a.generation);
        assert_eq!(debouncer.delay(), Duration::from_millis(50));
    }
}
