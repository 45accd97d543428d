//! Record types returned by the analytics backend.
//!
//! Field names follow the REST payloads so records deserialize directly from
//! response bodies. Every field has a serde default: the backend omits keys
//! freely and a partially-populated record is still worth showing.

use crate::Resource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Timestamp type used by all records.
pub type Timestamp = DateTime<Utc>;

// ============================================================================
// EVENT
// ============================================================================

/// A captured analytics event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub distinct_id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub person_id: Option<String>,
}

impl EventRecord {
    /// Stable identity: the uuid when present, the id otherwise.
    pub fn identity(&self) -> &str {
        match self.uuid.as_deref() {
            Some(uuid) if !uuid.is_empty() => uuid,
            _ => &self.id,
        }
    }
}

// ============================================================================
// PERSON
// ============================================================================

/// A person profile with the distinct ids that resolve to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub distinct_ids: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl PersonRecord {
    /// First non-empty distinct id, if any.
    pub fn primary_distinct_id(&self) -> Option<&str> {
        self.distinct_ids
            .first()
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Stable identity: the first distinct id, the id otherwise.
    pub fn identity(&self) -> &str {
        self.primary_distinct_id().unwrap_or(&self.id)
    }
}

// ============================================================================
// FEATURE FLAG
// ============================================================================

/// A feature flag definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureFlag {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub filters: Value,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub created_by: Value,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub ensure_experience_continuity: bool,
}

// ============================================================================
// RECORD
// ============================================================================

/// Any record the dashboard can list or inspect.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Event(EventRecord),
    Person(PersonRecord),
    Flag(FeatureFlag),
}

impl Record {
    /// The collection this record belongs to.
    pub fn resource(&self) -> Resource {
        match self {
            Record::Event(_) => Resource::Events,
            Record::Person(_) => Resource::Persons,
            Record::Flag(_) => Resource::Flags,
        }
    }

    /// Stable identity used for selection tracking and drill-down.
    pub fn id(&self) -> String {
        match self {
            Record::Event(event) => event.identity().to_string(),
            Record::Person(person) => person.identity().to_string(),
            Record::Flag(flag) => flag.id.to_string(),
        }
    }

    /// Key shared across collections, used to pivot from an item to its person.
    ///
    /// Empty strings count as absent. Flags never carry one.
    pub fn correlation_key(&self) -> Option<&str> {
        match self {
            Record::Event(event) => Some(event.distinct_id.as_str()).filter(|k| !k.is_empty()),
            Record::Person(person) => person.primary_distinct_id(),
            Record::Flag(_) => None,
        }
    }

    /// Unstyled text that search matches against.
    pub fn searchable_text(&self) -> String {
        match self {
            Record::Event(event) => format!("{} {}", event.event, event.distinct_id),
            Record::Person(person) => {
                let mut parts = Vec::with_capacity(person.distinct_ids.len() + 1);
                if !person.name.is_empty() {
                    parts.push(person.name.as_str());
                }
                parts.extend(person.distinct_ids.iter().map(String::as_str));
                parts.join(" ")
            }
            Record::Flag(flag) => format!("{} {}", flag.key, flag.name),
        }
    }

    /// The full record as JSON, shown in the inspector and copied to the clipboard.
    pub fn payload(&self) -> Value {
        let encoded = match self {
            Record::Event(event) => serde_json::to_value(event),
            Record::Person(person) => serde_json::to_value(person),
            Record::Flag(flag) => serde_json::to_value(flag),
        };
        // Records hold only JSON-native data, so encoding cannot fail.
        encoded.unwrap_or(Value::Null)
    }
}

impl From<EventRecord> for Record {
    fn from(event: EventRecord) -> Self {
        Record::Event(event)
    }
}

impl From<PersonRecord> for Record {
    fn from(person: PersonRecord) -> Self {
        Record::Person(person)
    }
}

impl From<FeatureFlag> for Record {
    fn from(flag: FeatureFlag) -> Self {
        Record::Flag(flag)
    }
}

/// Accept ids sent either as JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_event_correlation_key_is_never_empty(distinct_id in ".{0,12}") {
            let record = Record::Event(EventRecord {
                distinct_id,
                ..Default::default()
            });
            if let Some(key) = record.correlation_key() {
                prop_assert!(!key.is_empty());
            }
        }

        #[test]
        fn prop_resource_matches_variant(id in 0i64..1000) {
            let record = Record::Flag(FeatureFlag { id, ..Default::default() });
            prop_assert_eq!(record.resource(), Resource::Flags);
            prop_assert_eq!(record.id(), id.to_string());
        }
    }
}
