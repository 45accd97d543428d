//! Side effects requested by state transitions.
//!
//! `App` never performs I/O. Transitions return intents and the runtime
//! carries them out, feeding results back in as `TuiEvent`s.

use crate::fetch::{FetchRequest, FetchTicket};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Fetch {
        ticket: FetchTicket,
        request: FetchRequest,
    },
    ScheduleDebounce {
        generation: u64,
        delay: Duration,
    },
    CopyToClipboard {
        text: String,
    },
    Quit,
}
