//! Fetch tickets, requests and their execution against a `DataSource`.
//!
//! Every asynchronous request carries a ticket. Only the most recently
//! issued ticket of each kind is current; results for any other ticket are
//! dropped when they arrive.

use crate::notifications::NotificationLevel;
use lazyhog_core::{DataError, DataResult, DataSource, EventRecord, PersonRecord, Record, Resource};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Logical target of a fetch. Last write wins per kind, so writes to
/// different flags never supersede each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    List(Resource),
    Detail,
    Pivot,
    FlagToggle(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub kind: FetchKind,
    pub seq: u64,
}

/// Issues tickets and remembers which are current and still in flight.
#[derive(Debug, Clone, Default)]
pub struct FetchTracker {
    next_seq: u64,
    latest: HashMap<FetchKind, u64>,
    in_flight: HashSet<FetchTicket>,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, kind: FetchKind) -> FetchTicket {
        self.next_seq += 1;
        let ticket = FetchTicket {
            kind,
            seq: self.next_seq,
        };
        self.latest.insert(kind, ticket.seq);
        self.in_flight.insert(ticket);
        ticket
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.latest.get(&ticket.kind) == Some(&ticket.seq)
    }

    /// Mark `ticket` finished. Returns whether its result should be applied.
    pub fn complete(&mut self, ticket: &FetchTicket) -> bool {
        self.in_flight.remove(ticket);
        let current = self.is_current(ticket);
        if current {
            self.latest.remove(&ticket.kind);
        } else {
            debug!(kind = ?ticket.kind, seq = ticket.seq, "discarding stale fetch result");
        }
        current
    }

    /// Make every outstanding ticket of `kind` stale.
    pub fn invalidate(&mut self, kind: FetchKind) {
        self.latest.remove(&kind);
    }

    /// Whether a current request of `kind` has not completed yet.
    pub fn in_flight(&self, kind: FetchKind) -> bool {
        match self.latest.get(&kind) {
            Some(seq) => self.in_flight.contains(&FetchTicket { kind, seq: *seq }),
            None => false,
        }
    }
}

// ============================================================================
// Requests and outcomes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    List { resource: Resource, limit: usize },
    Detail { resource: Resource, id: String },
    Pivot { correlation_key: String, related_limit: usize },
    FlagToggle { id: i64, active: bool },
}

/// Result of a pivot: the person plus, best effort, their recent events.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotResult {
    pub person: PersonRecord,
    pub related: Vec<EventRecord>,
    pub related_error: Option<DataError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    List {
        resource: Resource,
        result: Result<Vec<Record>, DataError>,
    },
    Detail {
        id: String,
        result: Result<Record, DataError>,
    },
    Pivot(Result<PivotResult, DataError>),
    FlagToggle {
        id: i64,
        active: bool,
        result: Result<(), DataError>,
    },
}

/// How a failure is surfaced to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    NotFound,
    /// A secondary lookup failed while the primary one succeeded.
    PartialFailure,
}

impl FailureKind {
    pub fn classify(error: &DataError) -> Self {
        if error.is_not_found() {
            FailureKind::NotFound
        } else {
            FailureKind::Network
        }
    }

    /// Partial failures still produced a usable result, so they only warn.
    pub fn level(self) -> NotificationLevel {
        match self {
            FailureKind::Network | FailureKind::NotFound => NotificationLevel::Error,
            FailureKind::PartialFailure => NotificationLevel::Warning,
        }
    }
}

impl PivotResult {
    /// The secondary lookup's failure, if it had one.
    pub fn partial_failure(&self) -> Option<(FailureKind, &DataError)> {
        self.related_error
            .as_ref()
            .map(|error| (FailureKind::PartialFailure, error))
    }
}

/// Run `request` to completion. Every data-source call is bounded by
/// `timeout` on its own.
pub async fn execute(
    source: &dyn DataSource,
    request: &FetchRequest,
    timeout: Duration,
) -> FetchOutcome {
    match request {
        FetchRequest::List { resource, limit } => {
            let result = match resource {
                Resource::Events => bounded(timeout, source.list_live_items(*limit))
                    .await
                    .map(|events| events.into_iter().map(Record::from).collect()),
                other => bounded(timeout, source.list_items(*other, *limit)).await,
            };
            FetchOutcome::List {
                resource: *resource,
                result,
            }
        }
        FetchRequest::Detail { resource, id } => FetchOutcome::Detail {
            id: id.clone(),
            result: bounded(timeout, source.get_record(*resource, id)).await,
        },
        FetchRequest::Pivot {
            correlation_key,
            related_limit,
        } => FetchOutcome::Pivot(pivot(source, correlation_key, *related_limit, timeout).await),
        FetchRequest::FlagToggle { id, active } => FetchOutcome::FlagToggle {
            id: *id,
            active: *active,
            result: bounded(timeout, source.set_flag_state(*id, *active)).await,
        },
    }
}

async fn bounded<T>(
    timeout: Duration,
    call: impl Future<Output = DataResult<T>>,
) -> DataResult<T> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            let timeout_ms = timeout.as_millis() as u64;
            warn!(timeout_ms, "data source call timed out");
            Err(DataError::Timeout { timeout_ms })
        }
    }
}

async fn pivot(
    source: &dyn DataSource,
    correlation_key: &str,
    related_limit: usize,
    timeout: Duration,
) -> DataResult<PivotResult> {
    let person = bounded(timeout, source.get_person(correlation_key)).await?;
    let related = bounded(timeout, source.get_related(correlation_key, related_limit)).await;
    let (related, related_error) = match related {
        Ok(related) => (related, None),
        Err(error) => (Vec::new(), Some(error)),
    };
    Ok(PivotResult {
        person,
        related,
        related_error,
    })
}
