//! The data-access contract the dashboard engine depends on.

use crate::{DataResult, EventRecord, PersonRecord, Record, Resource};
use async_trait::async_trait;

/// Remote collections the dashboard browses.
///
/// Implementations are shared across fetch tasks as `Arc<dyn DataSource>`.
/// None of these calls retry; a failure is reported once.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Most recent events, oldest first so the newest is last.
    async fn list_live_items(&self, limit: usize) -> DataResult<Vec<EventRecord>>;

    /// A page of records from a collection.
    async fn list_items(&self, resource: Resource, limit: usize) -> DataResult<Vec<Record>>;

    /// Fetch a single record by its identity.
    async fn get_record(&self, resource: Resource, id: &str) -> DataResult<Record>;

    /// Look up the person a distinct id resolves to.
    async fn get_person(&self, distinct_id: &str) -> DataResult<PersonRecord>;

    /// Recent events sharing a correlation key, newest first.
    async fn get_related(&self, correlation_key: &str, limit: usize)
        -> DataResult<Vec<EventRecord>>;

    /// Enable or disable a feature flag.
    async fn set_flag_state(&self, id: i64, active: bool) -> DataResult<()>;
}
