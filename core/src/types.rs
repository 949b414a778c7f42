//! Records exchanged with the M2X API.
//!
//! # Design
//! Response records mirror the API's JSON one-to-one and are only ever
//! created by decoding. The API omits or nulls fields freely, so every field
//! that is not an `Option` falls back to its default when it is missing or
//! `null`, instead of failing the whole decode.
//! Request parameter records skip unset fields so that updates only touch
//! what the caller set.

use serde::{Deserialize, Deserializer, Serialize};

/// Health indicators returned by `/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    #[serde(deserialize_with = "nullable")]
    pub api: String,
    #[serde(deserialize_with = "nullable")]
    pub triggers: String,
}

// ---------------------------------------------------------------------------
// Blueprints and batches
// ---------------------------------------------------------------------------

/// Number of data sources provisioned from a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasourceCounts {
    #[serde(deserialize_with = "nullable")]
    pub total: u64,
    #[serde(deserialize_with = "nullable")]
    pub registered: u64,
    #[serde(deserialize_with = "nullable")]
    pub unregistered: u64,
}

/// A device template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blueprint {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub visibility: String,
    pub serial: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    /// Path of the feed backing this blueprint, e.g. `/feeds/{id}`.
    #[serde(deserialize_with = "nullable")]
    pub feed: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub created: String,
    #[serde(deserialize_with = "nullable")]
    pub updated: String,
    pub datasources: Option<DatasourceCounts>,
}

impl Blueprint {
    /// Id of the backing feed.
    pub fn feed_id(&self) -> &str {
        feed_id(&self.feed)
    }
}

/// A template for provisioning a group of devices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Batch {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub visibility: String,
    pub serial: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub feed: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub created: String,
    #[serde(deserialize_with = "nullable")]
    pub updated: String,
    pub datasources: Option<DatasourceCounts>,
}

impl Batch {
    pub fn feed_id(&self) -> &str {
        feed_id(&self.feed)
    }
}

/// Decode an explicit `null` as the field's default, the same as a missing
/// field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn feed_id(feed: &str) -> &str {
    feed.strip_prefix("/feeds/").unwrap_or(feed)
}

/// One page of blueprints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blueprints {
    #[serde(deserialize_with = "nullable")]
    pub blueprints: Vec<Blueprint>,
    #[serde(deserialize_with = "nullable")]
    pub total: u64,
    #[serde(deserialize_with = "nullable")]
    pub pages: u64,
    #[serde(deserialize_with = "nullable")]
    pub limit: u64,
    #[serde(deserialize_with = "nullable")]
    pub current_page: u64,
}

/// One page of batches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Batches {
    #[serde(deserialize_with = "nullable")]
    pub batches: Vec<Batch>,
    #[serde(deserialize_with = "nullable")]
    pub total: u64,
    #[serde(deserialize_with = "nullable")]
    pub pages: u64,
    #[serde(deserialize_with = "nullable")]
    pub limit: u64,
    #[serde(deserialize_with = "nullable")]
    pub current_page: u64,
}

/// Payload for creating or updating a blueprint or a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `"public"` or `"private"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

/// A point on a feed's location history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Waypoint {
    #[serde(deserialize_with = "nullable")]
    pub timestamp: String,
    #[serde(deserialize_with = "nullable")]
    pub latitude: String,
    #[serde(deserialize_with = "nullable")]
    pub longitude: String,
    #[serde(deserialize_with = "nullable")]
    pub elevation: String,
}

/// Location metadata attached to a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub latitude: String,
    #[serde(deserialize_with = "nullable")]
    pub longitude: String,
    #[serde(deserialize_with = "nullable")]
    pub elevation: String,
    #[serde(deserialize_with = "nullable")]
    pub waypoints: Vec<Waypoint>,
}

/// Payload for setting a feed's location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub latitude: String,
    pub longitude: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Unit {
    #[serde(deserialize_with = "nullable")]
    pub label: String,
    #[serde(deserialize_with = "nullable")]
    pub symbol: String,
}

/// A named time-series channel of a feed.
///
/// `value`, `min` and `max` are kept as raw JSON: the API reports them as
/// strings or numbers depending on how the values were posted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stream {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub value: serde_json::Value,
    pub min: serde_json::Value,
    pub max: serde_json::Value,
    #[serde(deserialize_with = "nullable")]
    pub unit: Unit,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub created: String,
    #[serde(deserialize_with = "nullable")]
    pub updated: String,
}

/// Payload for creating or updating a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

/// A single timestamped stream value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Value {
    #[serde(deserialize_with = "nullable")]
    pub at: String,
    #[serde(deserialize_with = "nullable")]
    pub value: String,
}

impl Value {
    pub fn new(at: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            at: at.into(),
            value: value.into(),
        }
    }
}

/// Values of a stream within a time window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Values {
    #[serde(deserialize_with = "nullable")]
    pub start: String,
    #[serde(deserialize_with = "nullable")]
    pub end: String,
    #[serde(deserialize_with = "nullable")]
    pub limit: u64,
    #[serde(deserialize_with = "nullable")]
    pub values: Vec<Value>,
}

/// Payload for posting new values to a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuesParams {
    pub values: Vec<Value>,
}

/// One entry of a feed's request log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggedRequest {
    #[serde(deserialize_with = "nullable")]
    pub at: String,
    #[serde(deserialize_with = "nullable")]
    pub status: u16,
    #[serde(deserialize_with = "nullable")]
    pub method: String,
    #[serde(deserialize_with = "nullable")]
    pub path: String,
}

/// Recent API requests that touched a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestLog {
    #[serde(deserialize_with = "nullable")]
    pub requests: Vec<LoggedRequest>,
}

/// A device's container of streams, location and triggers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feed {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub visibility: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    #[serde(deserialize_with = "nullable")]
    pub created: String,
    #[serde(deserialize_with = "nullable")]
    pub updated: String,
    #[serde(deserialize_with = "nullable")]
    pub location: Location,
    #[serde(deserialize_with = "nullable")]
    pub streams: Vec<Stream>,
    #[serde(deserialize_with = "nullable")]
    pub triggers: Vec<Trigger>,
}

/// One page of feeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feeds {
    #[serde(deserialize_with = "nullable")]
    pub feeds: Vec<Feed>,
    #[serde(deserialize_with = "nullable")]
    pub total: u64,
    #[serde(deserialize_with = "nullable")]
    pub pages: u64,
    #[serde(deserialize_with = "nullable")]
    pub limit: u64,
    #[serde(deserialize_with = "nullable")]
    pub current_page: u64,
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// An access key scoped to the account, a feed or a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Key {
    pub id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// The key itself; also the id used in `/keys/{key}`.
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    #[serde(deserialize_with = "nullable")]
    pub master: bool,
    pub feed: Option<String>,
    pub stream: Option<String>,
    pub expires_at: Option<String>,
    pub expired: Option<bool>,
    #[serde(deserialize_with = "nullable")]
    pub permissions: Vec<String>,
}

/// One page of keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keys {
    #[serde(deserialize_with = "nullable")]
    pub keys: Vec<Key>,
    #[serde(deserialize_with = "nullable")]
    pub total: u64,
    #[serde(deserialize_with = "nullable")]
    pub pages: u64,
    #[serde(deserialize_with = "nullable")]
    pub limit: u64,
    #[serde(deserialize_with = "nullable")]
    pub current_page: u64,
}

/// Payload for creating or updating a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyParams {
    pub name: String,
    /// HTTP verbs the key may use, e.g. `["GET", "PUT"]`.
    pub permissions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// A server-side condition on a stream that calls back when met.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trigger {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub stream: String,
    #[serde(deserialize_with = "nullable")]
    pub condition: String,
    #[serde(deserialize_with = "nullable")]
    pub value: String,
    #[serde(deserialize_with = "nullable")]
    pub callback_url: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub created: String,
    #[serde(deserialize_with = "nullable")]
    pub updated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Triggers {
    #[serde(deserialize_with = "nullable")]
    pub triggers: Vec<Trigger>,
}

/// Payload for creating or updating a trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    /// One of `<`, `<=`, `=`, `>`, `>=`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// `"enabled"` or `"disabled"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
