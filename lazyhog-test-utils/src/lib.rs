//! lazyhog Test Utilities
//!
//! Shared test infrastructure for the lazyhog workspace:
//! - An in-memory, scriptable `DataSource`
//! - Proptest generators for record types
//! - Fixtures for common scenarios

pub use lazyhog_core::{
    DataError, DataResult, DataSource, EventRecord, FeatureFlag, PersonRecord, Record, Resource,
    Timestamp,
};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration as StdDuration;

// ============================================================================
// FAKE DATA SOURCE
// ============================================================================

/// Operations of the `DataSource` contract, used to script failures and
/// inspect the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeOperation {
    ListLiveItems,
    ListItems,
    GetRecord,
    GetPerson,
    GetRelated,
    SetFlagState,
}

/// In-memory `DataSource` backed by plain vectors.
///
/// Clones share state, so a test can keep a handle while the runtime owns
/// another behind an `Arc<dyn DataSource>`.
#[derive(Debug, Clone, Default)]
pub struct FakeDataSource {
    events: Arc<RwLock<Vec<EventRecord>>>,
    persons: Arc<RwLock<Vec<PersonRecord>>>,
    flags: Arc<RwLock<Vec<FeatureFlag>>>,
    failures: Arc<RwLock<HashMap<FakeOperation, DataError>>>,
    stalls: Arc<RwLock<HashMap<FakeOperation, StdDuration>>>,
    calls: Arc<RwLock<Vec<(FakeOperation, String)>>>,
}

impl FakeDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the event log. Events are stored oldest first.
    pub fn with_events(self, events: Vec<EventRecord>) -> Self {
        self.set_events(events);
        self
    }

    pub fn with_persons(self, persons: Vec<PersonRecord>) -> Self {
        *self.persons.write().unwrap() = persons;
        self
    }

    pub fn with_flags(self, flags: Vec<FeatureFlag>) -> Self {
        *self.flags.write().unwrap() = flags;
        self
    }

    pub fn set_events(&self, events: Vec<EventRecord>) {
        *self.events.write().unwrap() = events;
    }

    pub fn push_event(&self, event: EventRecord) {
        self.events.write().unwrap().push(event);
    }

    /// Make every subsequent call of `operation` fail with `error`.
    pub fn fail(&self, operation: FakeOperation, error: DataError) {
        self.failures.write().unwrap().insert(operation, error);
    }

    /// Undo a previous `fail`.
    pub fn recover(&self, operation: FakeOperation) {
        self.failures.write().unwrap().remove(&operation);
    }

    /// Delay every subsequent call of `operation` by `delay` before it
    /// answers. Pair with a paused tokio clock to simulate a hung backend.
    pub fn stall(&self, operation: FakeOperation, delay: StdDuration) {
        self.stalls.write().unwrap().insert(operation, delay);
    }

    /// Current state of a flag, if it exists.
    pub fn flag(&self, id: i64) -> Option<FeatureFlag> {
        self.flags.read().unwrap().iter().find(|f| f.id == id).cloned()
    }

    /// Every call made so far, with its main argument rendered as a string.
    pub fn calls(&self) -> Vec<(FakeOperation, String)> {
        self.calls.read().unwrap().clone()
    }

    /// Number of calls made to one operation.
    pub fn call_count(&self, operation: FakeOperation) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|(op, _)| *op == operation)
            .count()
    }

    async fn record_call(
        &self,
        operation: FakeOperation,
        argument: impl Into<String>,
    ) -> DataResult<()> {
        self.calls
            .write()
            .unwrap()
            .push((operation, argument.into()));
        let stall = self.stalls.read().unwrap().get(&operation).copied();
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
        match self.failures.read().unwrap().get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn latest_events(&self, limit: usize) -> Vec<EventRecord> {
        let events = self.events.read().unwrap();
        let start = events.len().saturating_sub(limit);
        events[start..].to_vec()
    }
}

#[async_trait]
impl DataSource for FakeDataSource {
    async fn list_live_items(&self, limit: usize) -> DataResult<Vec<EventRecord>> {
        self.record_call(FakeOperation::ListLiveItems, limit.to_string()).await?;
        Ok(self.latest_events(limit))
    }

    async fn list_items(&self, resource: Resource, limit: usize) -> DataResult<Vec<Record>> {
        self.record_call(FakeOperation::ListItems, resource.as_str()).await?;
        let records = match resource {
            Resource::Events => self.latest_events(limit).into_iter().map(Record::from).collect(),
            Resource::Persons => self
                .persons
                .read()
                .unwrap()
                .iter()
                .take(limit)
                .cloned()
                .map(Record::from)
                .collect(),
            Resource::Flags => self
                .flags
                .read()
                .unwrap()
                .iter()
                .take(limit)
                .cloned()
                .map(Record::from)
                .collect(),
        };
        Ok(records)
    }

    async fn get_record(&self, resource: Resource, id: &str) -> DataResult<Record> {
        self.record_call(FakeOperation::GetRecord, format!("{}:{}", resource, id)).await?;
        let found = match resource {
            Resource::Events => self
                .events
                .read()
                .unwrap()
                .iter()
                .find(|e| e.identity() == id)
                .cloned()
                .map(Record::from),
            Resource::Persons => self
                .persons
                .read()
                .unwrap()
                .iter()
                .find(|p| p.identity() == id)
                .cloned()
                .map(Record::from),
            Resource::Flags => self
                .flags
                .read()
                .unwrap()
                .iter()
                .find(|f| f.id.to_string() == id)
                .cloned()
                .map(Record::from),
        };
        found.ok_or_else(|| DataError::NotFound {
            resource,
            id: id.to_string(),
        })
    }

    async fn get_person(&self, distinct_id: &str) -> DataResult<PersonRecord> {
        self.record_call(FakeOperation::GetPerson, distinct_id).await?;
        self.persons
            .read()
            .unwrap()
            .iter()
            .find(|p| p.distinct_ids.iter().any(|d| d == distinct_id))
            .cloned()
            .ok_or_else(|| DataError::NotFound {
                resource: Resource::Persons,
                id: distinct_id.to_string(),
            })
    }

    async fn get_related(
        &self,
        correlation_key: &str,
        limit: usize,
    ) -> DataResult<Vec<EventRecord>> {
        self.record_call(FakeOperation::GetRelated, correlation_key).await?;
        Ok(self
            .events
            .read()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| e.distinct_id == correlation_key)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn set_flag_state(&self, id: i64, active: bool) -> DataResult<()> {
        self.record_call(FakeOperation::SetFlagState, format!("{}={}", id, active)).await?;
        let mut flags = self.flags.write().unwrap();
        let flag = flags
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| DataError::NotFound {
                resource: Resource::Flags,
                id: id.to_string(),
            })?;
        flag.active = active;
        Ok(())
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating lazyhog record types.

    use super::*;
    use proptest::prelude::*;

    /// Generate one of the three resources.
    pub fn arb_resource() -> impl Strategy<Value = Resource> {
        prop_oneof![
            Just(Resource::Events),
            Just(Resource::Persons),
            Just(Resource::Flags),
        ]
    }

    /// Generate a Timestamp within 2020-2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    /// Generate an event name in the style of analytics events.
    pub fn arb_event_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("$pageview".to_string()),
            Just("$autocapture".to_string()),
            Just("page_view".to_string()),
            Just("click".to_string()),
            "[a-z_]{3,16}",
        ]
    }

    /// Generate a distinct id, sometimes empty.
    pub fn arb_distinct_id() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => "u[0-9]{1,4}",
            1 => Just(String::new()),
        ]
    }

    pub fn arb_event_record() -> impl Strategy<Value = EventRecord> {
        (
            "[a-f0-9]{8}",
            arb_event_name(),
            arb_distinct_id(),
            proptest::option::of(arb_timestamp()),
        )
            .prop_map(|(id, event, distinct_id, timestamp)| EventRecord {
                uuid: Some(id.clone()),
                id,
                event,
                timestamp,
                distinct_id,
                ..Default::default()
            })
    }

    pub fn arb_person_record() -> impl Strategy<Value = PersonRecord> {
        (
            "[a-f0-9]{8}",
            "[A-Za-z ]{0,12}",
            proptest::collection::vec("u[0-9]{1,4}", 0..3),
        )
            .prop_map(|(id, name, distinct_ids)| PersonRecord {
                id,
                name,
                distinct_ids,
                ..Default::default()
            })
    }

    pub fn arb_feature_flag() -> impl Strategy<Value = FeatureFlag> {
        (1i64..10_000, "[a-z][a-z_-]{2,20}", any::<bool>()).prop_map(|(id, key, active)| {
            FeatureFlag {
                id,
                name: key.replace(['_', '-'], " "),
                key,
                active,
                ..Default::default()
            }
        })
    }

    /// Generate any record.
    pub fn arb_record() -> impl Strategy<Value = Record> {
        prop_oneof![
            arb_event_record().prop_map(Record::Event),
            arb_person_record().prop_map(Record::Person),
            arb_feature_flag().prop_map(Record::Flag),
        ]
    }

    /// Generate a list of event records with unique identities.
    pub fn arb_event_list(max: usize) -> impl Strategy<Value = Vec<Record>> {
        proptest::collection::vec(arb_event_name(), 0..=max).prop_map(|names| {
            names
                .into_iter()
                .enumerate()
                .map(|(i, name)| Record::Event(fixtures::event(&format!("evt-{i}"), &name, "u1")))
                .collect()
        })
    }

    /// Generate a search query, including the empty query.
    pub fn arb_query() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[a-z_$]{1,6}",
            "[A-Z]{1,3}",
        ]
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records for common testing scenarios.

    use super::*;

    fn base_time() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// An event with the given identity, name and distinct id.
    pub fn event(id: &str, name: &str, distinct_id: &str) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            uuid: Some(id.to_string()),
            event: name.to_string(),
            timestamp: Some(base_time()),
            distinct_id: distinct_id.to_string(),
            properties: serde_json::Map::new(),
            person_id: None,
        }
    }

    /// `count` events with ids `evt-0..`, oldest first, one second apart.
    pub fn event_stream(count: usize) -> Vec<EventRecord> {
        (0..count)
            .map(|i| {
                let mut e = event(&format!("evt-{i}"), "$pageview", &format!("u{}", i % 5));
                e.timestamp = Some(base_time() + Duration::seconds(i as i64));
                e
            })
            .collect()
    }

    /// Events built from `"name:distinct_id"` labels.
    pub fn labelled_events(labels: &[&str]) -> Vec<Record> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let (name, distinct_id) = label.split_once(':').unwrap_or((*label, ""));
                Record::Event(event(&format!("evt-{i}"), name, distinct_id))
            })
            .collect()
    }

    pub fn person(distinct_id: &str, name: &str) -> PersonRecord {
        PersonRecord {
            id: format!("person-{distinct_id}"),
            uuid: None,
            name: name.to_string(),
            distinct_ids: vec![distinct_id.to_string()],
            properties: serde_json::Map::new(),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
        }
    }

    pub fn flag(id: i64, key: &str, active: bool) -> FeatureFlag {
        FeatureFlag {
            id,
            key: key.to_string(),
            name: key.replace('_', " "),
            active,
            ..Default::default()
        }
    }

    /// A person-bearing data set: two persons, a short event stream, two flags.
    pub fn populated_source() -> FakeDataSource {
        let mut events = event_stream(6);
        events.push(event("evt-ada", "signed_up", "ada"));
        FakeDataSource::new()
            .with_events(events)
            .with_persons(vec![person("ada", "Ada Lovelace"), person("u1", "Grace")])
            .with_flags(vec![flag(1, "new_onboarding", true), flag(2, "beta_search", false)])
    }
}
