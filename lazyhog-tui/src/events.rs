//! Event types for the TUI event loop.

use crate::fetch::{FetchOutcome, FetchTicket};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    /// Poll timer fired.
    Tick,
    /// The debounce sleep for `generation` finished.
    DebounceElapsed(u64),
    FetchCompleted {
        ticket: FetchTicket,
        outcome: Box<FetchOutcome>,
    },
}
