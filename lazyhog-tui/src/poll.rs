//! Refresh gating for the live resource.

use crate::nav::Focus;
use lazyhog_core::Resource;
use std::time::{Duration, Instant};

/// What the selector pane advertises for the live feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    Live,
    Paused,
}

impl PollStatus {
    pub fn label(self) -> &'static str {
        match self {
            PollStatus::Live => "● Live",
            PollStatus::Paused => "⏸ Paused",
        }
    }
}

/// Decides, on each timer tick, whether the live resource is refreshed.
///
/// Polling continues while the operator works in the selector or the list.
/// It pauses while they read the inspector, until they have been idle for
/// longer than `pause_after`.
#[derive(Debug, Clone, Copy)]
pub struct PollScheduler {
    interval: Duration,
    pause_after: Duration,
}

impl PollScheduler {
    pub fn new(interval: Duration, pause_after: Duration) -> Self {
        Self {
            interval,
            pause_after,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn should_poll(
        &self,
        resource: Resource,
        focus: Focus,
        last_interaction: Instant,
        now: Instant,
    ) -> bool {
        if !resource.is_live() {
            return false;
        }
        focus != Focus::Inspector
            || now.saturating_duration_since(last_interaction) > self.pause_after
    }

    pub fn status(
        &self,
        resource: Resource,
        focus: Focus,
        last_interaction: Instant,
        now: Instant,
    ) -> PollStatus {
        if self.should_poll(resource, focus, last_interaction, now) {
            PollStatus::Live
        } else {
            PollStatus::Paused
        }
    }
}
