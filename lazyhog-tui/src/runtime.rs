//! Carries out intents and feeds their results back into the event loop.

use crate::clipboard;
use crate::events::TuiEvent;
use crate::fetch;
use crate::intent::Intent;
use lazyhog_core::DataSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct Runtime {
    source: Arc<dyn DataSource>,
    sender: mpsc::Sender<TuiEvent>,
    request_timeout: Duration,
}

impl Runtime {
    pub fn new(
        source: Arc<dyn DataSource>,
        sender: mpsc::Sender<TuiEvent>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            source,
            sender,
            request_timeout,
        }
    }

    /// Start every intent. Returns true when one of them asks to quit.
    pub fn dispatch(&self, intents: Vec<Intent>) -> bool {
        let mut quit = false;
        for intent in intents {
            match intent {
                Intent::Fetch { ticket, request } => {
                    let source = Arc::clone(&self.source);
                    let sender = self.sender.clone();
                    let timeout = self.request_timeout;
                    tokio::spawn(async move {
                        let outcome = fetch::execute(source.as_ref(), &request, timeout).await;
                        let event = TuiEvent::FetchCompleted {
                            ticket,
                            outcome: Box::new(outcome),
                        };
                        if sender.send(event).await.is_err() {
                            debug!("event loop gone, dropping fetch result");
                        }
                    });
                }
                Intent::ScheduleDebounce { generation, delay } => {
                    let sender = self.sender.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = sender.send(TuiEvent::DebounceElapsed(generation)).await;
                    });
                }
                Intent::CopyToClipboard { text } => {
                    if let Err(e) = clipboard::copy(&text) {
                        warn!(error = %e, "clipboard write failed");
                    }
                }
                Intent::Quit => quit = true,
            }
        }
        quit
    }
}
