//! REST client for the PostHog API, implementing `DataSource`.

use crate::config::TuiConfig;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use lazyhog_core::{
    DataError, DataResult, DataSource, EventRecord, FeatureFlag, PersonRecord, Record, Resource,
    Timestamp,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

const CURRENT_PROJECT_PATH: &str = "/api/projects/@current";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

/// One page of a paginated listing.
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct CurrentUser {
    #[serde(default)]
    team: Option<Team>,
}

#[derive(Debug, Deserialize)]
struct Team {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct HogQlResponse {
    #[serde(default)]
    results: Vec<Vec<Value>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
    project_id: Option<u64>,
    project_path: Arc<OnceCell<String>>,
    timeout_ms: u64,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let auth_header = build_auth_headers(&config.api_key)?;
        Ok(Self {
            client,
            base_url: config.instance_url.trim_end_matches('/').to_string(),
            auth_header,
            project_id: config.project_id,
            project_path: Arc::new(OnceCell::new()),
            timeout_ms: config.request_timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `/api/projects/<id>`, resolved once from the config or the current user.
    pub async fn project_path(&self) -> &str {
        self.project_path
            .get_or_init(|| self.resolve_project_path())
            .await
            .as_str()
    }

    async fn resolve_project_path(&self) -> String {
        if let Some(id) = self.project_id {
            return format!("/api/projects/{id}");
        }
        match self.get_json::<CurrentUser, ()>("/api/users/@me/", None).await {
            Ok(CurrentUser {
                team: Some(Team { id }),
            }) if id != 0 => {
                debug!(project_id = id, "resolved project from current user");
                format!("/api/projects/{id}")
            }
            Ok(_) => CURRENT_PROJECT_PATH.to_string(),
            Err(e) => {
                warn!(error = %e, "could not resolve project, using @current");
                CURRENT_PROJECT_PATH.to_string()
            }
        }
    }

    pub async fn recent_events(&self, limit: usize) -> Result<Vec<EventRecord>, ApiClientError> {
        let path = format!("{}/events/", self.project_path().await);
        let query = [("limit", limit.to_string()), ("orderBy", "-timestamp".to_string())];
        let page: Page<EventRecord> = self.get_json(&path, Some(&query)).await?;
        let mut events = page.results;
        // The API answers newest first; the list shows newest last.
        events.reverse();
        Ok(events)
    }

    pub async fn event(&self, id: &str) -> Result<EventRecord, ApiClientError> {
        let path = format!("{}/events/{}/", self.project_path().await, id);
        self.get_json::<EventRecord, ()>(&path, None).await
    }

    pub async fn persons(&self, limit: usize) -> Result<Vec<PersonRecord>, ApiClientError> {
        let path = format!("{}/persons/", self.project_path().await);
        let page: Page<PersonRecord> = self
            .get_json(&path, Some(&[("limit", limit.to_string())]))
            .await?;
        Ok(page.results)
    }

    /// The person owning `distinct_id`, if any.
    pub async fn person_by_distinct_id(
        &self,
        distinct_id: &str,
    ) -> Result<Option<PersonRecord>, ApiClientError> {
        let path = format!("{}/persons/", self.project_path().await);
        let page: Page<PersonRecord> = self
            .get_json(&path, Some(&[("distinct_id", distinct_id)]))
            .await?;
        Ok(page.results.into_iter().next())
    }

    pub async fn flags(&self, limit: usize) -> Result<Vec<FeatureFlag>, ApiClientError> {
        let path = format!("{}/feature_flags/", self.project_path().await);
        let page: Page<FeatureFlag> = self
            .get_json(&path, Some(&[("limit", limit.to_string())]))
            .await?;
        Ok(page.results)
    }

    pub async fn flag(&self, id: &str) -> Result<FeatureFlag, ApiClientError> {
        let path = format!("{}/feature_flags/{}/", self.project_path().await, id);
        self.get_json::<FeatureFlag, ()>(&path, None).await
    }

    pub async fn update_flag(&self, id: i64, active: bool) -> Result<(), ApiClientError> {
        let path = format!("{}/feature_flags/{}/", self.project_path().await, id);
        let _: Value = self.patch_json(&path, &json!({ "active": active })).await?;
        Ok(())
    }

    /// Newest events for `distinct_id`, via a HogQL query.
    pub async fn events_for(
        &self,
        distinct_id: &str,
        limit: usize,
    ) -> Result<Vec<EventRecord>, ApiClientError> {
        let path = format!("{}/query/", self.project_path().await);
        let body = json!({
            "query": {
                "kind": "HogQLQuery",
                "query": related_events_query(distinct_id, limit),
            }
        });
        let response: HogQlResponse = self.post_json(&path, &body).await?;
        if let Some(error) = response.error.filter(|e| !e.is_empty()) {
            return Err(ApiClientError::InvalidResponse(format!("query error: {error}")));
        }
        Ok(response
            .results
            .iter()
            .filter_map(|row| event_from_row(row))
            .collect())
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(url).headers(self.auth_header.clone());
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = request.send().await?;
        self.parse_response(response).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(url)
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn patch_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .patch(url)
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response.text().await?;
            Err(ApiClientError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn data_error(&self, err: ApiClientError) -> DataError {
        let mapped = match err {
            ApiClientError::Http(e) if e.is_timeout() => DataError::Timeout {
                timeout_ms: self.timeout_ms,
            },
            other => to_data_error(other),
        };
        warn!(error = %mapped, "request failed");
        mapped
    }

    fn not_found_or(&self, err: ApiClientError, resource: Resource, id: &str) -> DataError {
        match err {
            ApiClientError::Status { status: 404, .. } => DataError::NotFound {
                resource,
                id: id.to_string(),
            },
            other => self.data_error(other),
        }
    }
}

#[async_trait]
impl DataSource for RestClient {
    async fn list_live_items(&self, limit: usize) -> DataResult<Vec<EventRecord>> {
        self.recent_events(limit)
            .await
            .map_err(|e| self.data_error(e))
    }

    async fn list_items(&self, resource: Resource, limit: usize) -> DataResult<Vec<Record>> {
        let records = match resource {
            Resource::Events => self
                .recent_events(limit)
                .await
                .map(|items| items.into_iter().map(Record::from).collect()),
            Resource::Persons => self
                .persons(limit)
                .await
                .map(|items| items.into_iter().map(Record::from).collect()),
            Resource::Flags => self
                .flags(limit)
                .await
                .map(|items| items.into_iter().map(Record::from).collect()),
        };
        records.map_err(|e| self.data_error(e))
    }

    async fn get_record(&self, resource: Resource, id: &str) -> DataResult<Record> {
        match resource {
            Resource::Events => self
                .event(id)
                .await
                .map(Record::from)
                .map_err(|e| self.not_found_or(e, resource, id)),
            Resource::Persons => self.get_person(id).await.map(Record::from),
            Resource::Flags => self
                .flag(id)
                .await
                .map(Record::from)
                .map_err(|e| self.not_found_or(e, resource, id)),
        }
    }

    async fn get_person(&self, distinct_id: &str) -> DataResult<PersonRecord> {
        match self.person_by_distinct_id(distinct_id).await {
            Ok(Some(person)) => Ok(person),
            Ok(None) => Err(DataError::NotFound {
                resource: Resource::Persons,
                id: distinct_id.to_string(),
            }),
            Err(e) => Err(self.not_found_or(e, Resource::Persons, distinct_id)),
        }
    }

    async fn get_related(
        &self,
        correlation_key: &str,
        limit: usize,
    ) -> DataResult<Vec<EventRecord>> {
        self.events_for(correlation_key, limit)
            .await
            .map_err(|e| self.data_error(e))
    }

    async fn set_flag_state(&self, id: i64, active: bool) -> DataResult<()> {
        self.update_flag(id, active)
            .await
            .map_err(|e| self.not_found_or(e, Resource::Flags, &id.to_string()))
    }
}

fn to_data_error(err: ApiClientError) -> DataError {
    match err {
        ApiClientError::Http(e) => DataError::Network {
            reason: e.to_string(),
        },
        ApiClientError::Serde(e) => DataError::InvalidResponse {
            reason: e.to_string(),
        },
        ApiClientError::Status { status, body } => DataError::Http { status, body },
        ApiClientError::InvalidResponse(reason) => DataError::InvalidResponse { reason },
        ApiClientError::Config(reason) => DataError::Network { reason },
    }
}

fn build_auth_headers(api_key: &str) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    let value = format!("Bearer {}", api_key.trim());
    headers.insert(
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&value).map_err(|e| ApiClientError::Config(e.to_string()))?,
    );
    Ok(headers)
}

// ============================================================================
// HogQL
// ============================================================================

/// Quote `value` for use inside a single-quoted HogQL string literal.
pub fn escape_hogql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

pub fn related_events_query(distinct_id: &str, limit: usize) -> String {
    format!(
        "SELECT uuid, event, timestamp, distinct_id, properties, person_id \
         FROM events WHERE distinct_id = '{}' ORDER BY timestamp DESC LIMIT {}",
        escape_hogql(distinct_id),
        limit
    )
}

/// Build an event from a result row with the columns
/// `uuid, event, timestamp, distinct_id, properties, person_id`.
pub fn event_from_row(row: &[Value]) -> Option<EventRecord> {
    if row.len() < 6 {
        return None;
    }
    let text = |value: &Value| value.as_str().map(str::to_string);
    let uuid = text(&row[0]).unwrap_or_default();

    Some(EventRecord {
        id: uuid.clone(),
        uuid: Some(uuid),
        event: text(&row[1]).unwrap_or_default(),
        timestamp: row[2].as_str().and_then(parse_timestamp),
        distinct_id: text(&row[3]).unwrap_or_default(),
        properties: properties_from(&row[4]),
        person_id: text(&row[5]),
    })
}

fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Properties arrive either as an object or as a JSON-encoded string.
fn properties_from(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        Value::String(encoded) => serde_json::from_str(encoded).unwrap_or_default(),
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TuiConfig {
        TuiConfig {
            instance_url: "https://eu.posthog.com/".to_string(),
            api_key: "phx_secret".to_string(),
            project_id: Some(42),
            ..TuiConfig::default()
        }
    }

    #[test]
    fn test_new_trims_base_url_and_sets_bearer() {
        let client = RestClient::new(&config()).unwrap();
        assert_eq!(client.base_url(), "https://eu.posthog.com");
        assert_eq!(
            client.auth_header.get("authorization").unwrap(),
            "Bearer phx_secret"
        );
    }

    #[test]
    fn test_invalid_api_key_is_config_error() {
        let bad = TuiConfig {
            api_key: "bad\nkey".to_string(),
            ..config()
        };
        assert!(matches!(RestClient::new(&bad), Err(ApiClientError::Config(_))));
    }

    #[tokio::test]
    async fn test_configured_project_skips_lookup() {
        let client = RestClient::new(&config()).unwrap();
        assert_eq!(client.project_path().await, "/api/projects/42");
    }

    #[test]
    fn test_hogql_escapes_quotes() {
        let query = related_events_query("o'brien\\", 20);
        assert!(query.contains("distinct_id = 'o\\'brien\\\\'"));
        assert!(query.ends_with("LIMIT 20"));
    }

    #[test]
    fn test_event_from_row() {
        let row = vec![
            json!("0190-uuid"),
            json!("$pageview"),
            json!("2024-05-01T10:00:00Z"),
            json!("user-1"),
            json!({"$browser": "Firefox"}),
            json!("person-9"),
        ];
        let event = event_from_row(&row).unwrap();
        assert_eq!(event.id, "0190-uuid");
        assert_eq!(event.identity(), "0190-uuid");
        assert_eq!(event.event, "$pageview");
        assert!(event.timestamp.is_some());
        assert_eq!(event.properties["$browser"], json!("Firefox"));
        assert_eq!(event.person_id.as_deref(), Some("person-9"));
    }

    #[test]
    fn test_event_from_row_string_properties_and_naive_time() {
        let row = vec![
            json!("u"),
            json!("click"),
            json!("2024-05-01 10:00:00.250"),
            json!("d"),
            json!("{\"k\": 1}"),
            Value::Null,
        ];
        let event = event_from_row(&row).unwrap();
        assert_eq!(event.properties["k"], json!(1));
        assert!(event.timestamp.is_some());
        assert!(event.person_id.is_none());
    }

    #[test]
    fn test_short_rows_are_skipped() {
        assert!(event_from_row(&[json!("u"), json!("e")]).is_none());
    }

    #[test]
    fn test_status_maps_to_http_error() {
        let err = to_data_error(ApiClientError::Status {
            status: 500,
            body: "boom".to_string(),
        });
        assert_eq!(
            err,
            DataError::Http {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_404_maps_to_not_found() {
        let client = RestClient::new(&config()).unwrap();
        let err = client.not_found_or(
            ApiClientError::Status {
                status: 404,
                body: String::new(),
            },
            Resource::Flags,
            "7",
        );
        assert_eq!(
            err,
            DataError::NotFound {
                resource: Resource::Flags,
                id: "7".to_string()
            }
        );
    }

    #[test]
    fn test_page_tolerates_missing_results() {
        let page: Page<FeatureFlag> = serde_json::from_str("{}").unwrap();
        assert!(page.results.is_empty());
    }
}
