//! In-memory stand-in for the M2X API, used by the client's tests.
//!
//! Every route lives under `/v1` and, except `/v1/status`, requires the
//! `X-M2X-KEY` header to match the key the app was built with. Error bodies
//! have the same `{"message": ..., "errors": ...}` shape as the real service.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Key accepted when none is configured.
pub const DEFAULT_API_KEY: &str = "test-key";

/// Timestamp stamped on every record the server creates.
pub const TIMESTAMP: &str = "2014-01-11T16:14:14Z";

const VALUES_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DatasourceCounts {
    pub total: u64,
    pub registered: u64,
    pub unregistered: u64,
}

/// A blueprint or a batch; both have the same shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Datasource {
    pub id: String,
    pub name: String,
    pub description: String,
    pub visibility: String,
    pub serial: Option<String>,
    pub status: String,
    pub feed: String,
    pub url: String,
    pub key: String,
    pub tags: Vec<String>,
    pub created: String,
    pub updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasources: Option<DatasourceCounts>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Unit {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Value {
    pub at: String,
    pub value: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Waypoint {
    pub timestamp: String,
    pub latitude: String,
    pub longitude: String,
    pub elevation: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub elevation: String,
    pub waypoints: Vec<Waypoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Key {
    pub name: String,
    pub key: String,
    pub master: bool,
    pub feed: Option<String>,
    pub stream: Option<String>,
    pub expires_at: Option<String>,
    pub expired: bool,
    pub permissions: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub name: String,
    pub stream: String,
    pub condition: String,
    pub value: String,
    pub callback_url: String,
    pub url: String,
    pub status: String,
    pub created: String,
    pub updated: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedRequest {
    pub at: String,
    pub status: u16,
    pub method: String,
    pub path: String,
}

#[derive(Clone, Debug)]
struct StreamRecord {
    name: String,
    unit: Unit,
    url: String,
    values: Vec<Value>,
}

impl StreamRecord {
    fn to_json(&self) -> JsonValue {
        let numbers = self.values.iter().filter_map(|v| v.value.trim().parse::<f64>().ok());
        let min = numbers.clone().reduce(f64::min);
        let max = numbers.reduce(f64::max);
        json!({
            "name": self.name,
            "value": self.values.last().map(|v| v.value.clone()),
            "min": min,
            "max": max,
            "unit": self.unit,
            "url": self.url,
            "created": TIMESTAMP,
            "updated": TIMESTAMP,
        })
    }
}

#[derive(Clone, Debug)]
struct FeedRecord {
    id: String,
    name: String,
    description: String,
    visibility: String,
    kind: &'static str,
    key: String,
    location: Option<Location>,
    streams: BTreeMap<String, StreamRecord>,
    triggers: Vec<Trigger>,
    log: Vec<LoggedRequest>,
}

impl FeedRecord {
    fn to_json(&self) -> JsonValue {
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "visibility": self.visibility,
            "status": "enabled",
            "type": self.kind,
            "tags": [],
            "url": format!("/feeds/{}", self.id),
            "key": self.key,
            "location": self.location.as_ref().map_or_else(|| json!({}), |l| json!(l)),
            "streams": self.streams.values().map(StreamRecord::to_json).collect::<Vec<_>>(),
            "triggers": self.triggers,
            "created": TIMESTAMP,
            "updated": TIMESTAMP,
        })
    }

    fn trigger_index(&self, id_or_name: &str) -> Option<usize> {
        self.triggers
            .iter()
            .position(|t| t.id == id_or_name || t.name == id_or_name)
    }
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct DatasourceParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<String>,
    pub tags: Option<String>,
}

#[derive(Deserialize)]
pub struct KeyParams {
    pub name: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub feed: Option<String>,
    pub stream: Option<String>,
    pub expires_at: Option<String>,
}

#[derive(Deserialize)]
pub struct LocationParams {
    pub name: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub elevation: Option<String>,
}

#[derive(Deserialize)]
pub struct StreamParams {
    pub unit: Option<Unit>,
}

#[derive(Deserialize)]
pub struct ValuesParams {
    pub values: Vec<Value>,
}

#[derive(Deserialize)]
pub struct TriggerParams {
    pub name: Option<String>,
    pub stream: Option<String>,
    pub condition: Option<String>,
    pub value: Option<String>,
    pub callback_url: Option<String>,
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// State and errors
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Store {
    blueprints: HashMap<String, Datasource>,
    batches: HashMap<String, Datasource>,
    keys: HashMap<String, Key>,
    feeds: HashMap<String, FeedRecord>,
}

#[derive(Clone)]
struct AppState {
    db: Arc<RwLock<Store>>,
    api_key: Arc<str>,
}

/// A non-success answer with the API's error body.
#[derive(Debug)]
struct Failure {
    status: StatusCode,
    message: String,
    errors: Option<JsonValue>,
}

impl Failure {
    fn not_found(what: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("The specified {what} does not exist"),
            errors: None,
        }
    }

    fn invalid(field: &str, problem: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Validation Failed".to_string(),
            errors: Some(json!({ field: [problem] })),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = match self.errors {
            Some(errors) => json!({ "message": self.message, "errors": errors }),
            None => json!({ "message": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

type Reply<T> = Result<T, Failure>;

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn required(value: Option<String>, field: &str) -> Reply<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Failure::invalid(field, "can't be blank")),
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        api_key: Arc::from(api_key),
    };

    let api = Router::new()
        .route("/blueprints", get(list_blueprints).post(create_blueprint))
        .route(
            "/blueprints/{id}",
            get(get_blueprint).put(update_blueprint).delete(delete_blueprint),
        )
        .route("/batches", get(list_batches).post(create_batch))
        .route(
            "/batches/{id}",
            get(get_batch).put(update_batch).delete(delete_batch),
        )
        .route("/keys", get(list_keys).post(create_key))
        .route("/keys/{key}", get(get_key).put(update_key).delete(delete_key))
        .route("/feeds", get(list_feeds))
        .route("/feeds/{id}", get(get_feed))
        .route("/feeds/{id}/location", get(get_location).put(update_location))
        .route("/feeds/{id}/streams/{name}", get(get_stream).put(update_stream))
        .route(
            "/feeds/{id}/streams/{name}/values",
            get(list_values).post(post_values),
        )
        .route("/feeds/{id}/log", get(request_log))
        .route("/feeds/{id}/triggers", get(list_triggers).post(create_trigger))
        .route(
            "/feeds/{id}/triggers/{trigger}",
            get(get_trigger).put(update_trigger).delete(delete_trigger),
        )
        .route("/feeds/{id}/triggers/{trigger}/test", post(test_trigger))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .route("/status", get(status))
        .with_state(state);

    Router::new().nest("/v1", api)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!("mock M2X API listening on {addr}");
    }
    axum::serve(listener, app(api_key)).await
}

/// Rejects requests without the right key and records feed requests in
/// the feed's log.
async fn authenticate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get("x-m2x-key")
        .is_some_and(|key| key == &*state.api_key);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid or missing API key" })),
        )
            .into_response();
    }

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let feed_id = path
        .trim_start_matches("/v1")
        .strip_prefix("/feeds/")
        .and_then(|rest| rest.split('/').next())
        .map(str::to_string);
    if let Some(feed_id) = feed_id {
        if let Some(feed) = state.db.write().await.feeds.get_mut(&feed_id) {
            debug!("log {method} {path} on feed {feed_id}");
            feed.log.insert(
                0,
                LoggedRequest {
                    at: TIMESTAMP.to_string(),
                    status: response.status().as_u16(),
                    method,
                    path,
                },
            );
        }
    }
    response
}

async fn status() -> Json<JsonValue> {
    Json(json!({ "api": "OK", "triggers": "OK" }))
}

// ---------------------------------------------------------------------------
// Blueprints and batches
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Kind {
    Blueprint,
    Batch,
}

impl Kind {
    fn label(self) -> &'static str {
        match self {
            Kind::Blueprint => "blueprint",
            Kind::Batch => "batch",
        }
    }

    fn collection(self) -> &'static str {
        match self {
            Kind::Blueprint => "blueprints",
            Kind::Batch => "batches",
        }
    }

    fn table(self, store: &Store) -> &HashMap<String, Datasource> {
        match self {
            Kind::Blueprint => &store.blueprints,
            Kind::Batch => &store.batches,
        }
    }

    fn table_mut(self, store: &mut Store) -> &mut HashMap<String, Datasource> {
        match self {
            Kind::Blueprint => &mut store.blueprints,
            Kind::Batch => &mut store.batches,
        }
    }
}

fn page(collection: &str, items: Vec<JsonValue>) -> JsonValue {
    let total = items.len();
    json!({
        collection: items,
        "total": total,
        "pages": 1,
        "limit": 10,
        "current_page": 1,
    })
}

async fn list_datasources(state: &AppState, kind: Kind) -> Json<JsonValue> {
    let db = state.db.read().await;
    let items = kind.table(&db).values().map(|d| json!(d)).collect();
    Json(page(kind.collection(), items))
}

async fn get_datasource(state: &AppState, kind: Kind, id: &str) -> Reply<Json<Datasource>> {
    let db = state.db.read().await;
    kind.table(&db)
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure::not_found(kind.label()))
}

async fn create_datasource(
    state: &AppState,
    kind: Kind,
    params: DatasourceParams,
) -> Reply<(StatusCode, Json<Datasource>)> {
    let name = required(params.name, "name")?;
    let id = new_id();
    let key = new_id();
    let visibility = params.visibility.unwrap_or_else(|| "public".to_string());
    let datasource = Datasource {
        id: id.clone(),
        name: name.clone(),
        description: params.description.unwrap_or_default(),
        visibility: visibility.clone(),
        serial: None,
        status: "enabled".to_string(),
        feed: format!("/feeds/{id}"),
        url: format!("/{}/{id}", kind.collection()),
        key: key.clone(),
        tags: split_tags(params.tags.as_deref()),
        created: TIMESTAMP.to_string(),
        updated: TIMESTAMP.to_string(),
        datasources: matches!(kind, Kind::Batch).then(DatasourceCounts::default),
    };

    let mut db = state.db.write().await;
    db.feeds.insert(
        id.clone(),
        FeedRecord {
            id: id.clone(),
            name,
            description: datasource.description.clone(),
            visibility,
            kind: kind.label(),
            key,
            location: None,
            streams: BTreeMap::new(),
            triggers: Vec::new(),
            log: Vec::new(),
        },
    );
    kind.table_mut(&mut db).insert(id, datasource.clone());
    Ok((StatusCode::CREATED, Json(datasource)))
}

async fn update_datasource(
    state: &AppState,
    kind: Kind,
    id: &str,
    params: DatasourceParams,
) -> Reply<StatusCode> {
    let mut db = state.db.write().await;
    let datasource = kind
        .table_mut(&mut db)
        .get_mut(id)
        .ok_or_else(|| Failure::not_found(kind.label()))?;
    if let Some(name) = params.name {
        datasource.name = required(Some(name), "name")?;
    }
    if let Some(description) = params.description {
        datasource.description = description;
    }
    if let Some(visibility) = params.visibility {
        datasource.visibility = visibility;
    }
    if let Some(tags) = params.tags {
        datasource.tags = split_tags(Some(&tags));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_datasource(state: &AppState, kind: Kind, id: &str) -> Reply<StatusCode> {
    let mut db = state.db.write().await;
    kind.table_mut(&mut db)
        .remove(id)
        .ok_or_else(|| Failure::not_found(kind.label()))?;
    db.feeds.remove(id);
    Ok(StatusCode::NO_CONTENT)
}

fn split_tags(tags: Option<&str>) -> Vec<String> {
    tags.map(|tags| {
        tags.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

async fn list_blueprints(State(state): State<AppState>) -> Json<JsonValue> {
    list_datasources(&state, Kind::Blueprint).await
}

async fn get_blueprint(State(state): State<AppState>, Path(id): Path<String>) -> Reply<Json<Datasource>> {
    get_datasource(&state, Kind::Blueprint, &id).await
}

async fn create_blueprint(
    State(state): State<AppState>,
    Json(params): Json<DatasourceParams>,
) -> Reply<(StatusCode, Json<Datasource>)> {
    create_datasource(&state, Kind::Blueprint, params).await
}

async fn update_blueprint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(params): Json<DatasourceParams>,
) -> Reply<StatusCode> {
    update_datasource(&state, Kind::Blueprint, &id, params).await
}

async fn delete_blueprint(State(state): State<AppState>, Path(id): Path<String>) -> Reply<StatusCode> {
    delete_datasource(&state, Kind::Blueprint, &id).await
}

async fn list_batches(State(state): State<AppState>) -> Json<JsonValue> {
    list_datasources(&state, Kind::Batch).await
}

async fn get_batch(State(state): State<AppState>, Path(id): Path<String>) -> Reply<Json<Datasource>> {
    get_datasource(&state, Kind::Batch, &id).await
}

async fn create_batch(
    State(state): State<AppState>,
    Json(params): Json<DatasourceParams>,
) -> Reply<(StatusCode, Json<Datasource>)> {
    create_datasource(&state, Kind::Batch, params).await
}

async fn update_batch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(params): Json<DatasourceParams>,
) -> Reply<StatusCode> {
    update_datasource(&state, Kind::Batch, &id, params).await
}

async fn delete_batch(State(state): State<AppState>, Path(id): Path<String>) -> Reply<StatusCode> {
    delete_datasource(&state, Kind::Batch, &id).await
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

async fn list_keys(State(state): State<AppState>) -> Json<JsonValue> {
    let db = state.db.read().await;
    let keys = db.keys.values().map(|k| json!(k)).collect();
    Json(page("keys", keys))
}

async fn get_key(State(state): State<AppState>, Path(key): Path<String>) -> Reply<Json<Key>> {
    let db = state.db.read().await;
    db.keys
        .get(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure::not_found("key"))
}

async fn create_key(
    State(state): State<AppState>,
    Json(params): Json<KeyParams>,
) -> Reply<(StatusCode, Json<Key>)> {
    let name = required(params.name, "name")?;
    let permissions = params.permissions.unwrap_or_default();
    if permissions.is_empty() {
        return Err(Failure::invalid("permissions", "can't be blank"));
    }
    let key = Key {
        name,
        key: new_id(),
        master: params.feed.is_none(),
        feed: params.feed,
        stream: params.stream,
        expires_at: params.expires_at,
        expired: false,
        permissions,
    };
    state.db.write().await.keys.insert(key.key.clone(), key.clone());
    Ok((StatusCode::CREATED, Json(key)))
}

async fn update_key(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(params): Json<KeyParams>,
) -> Reply<StatusCode> {
    let mut db = state.db.write().await;
    let record = db.keys.get_mut(&key).ok_or_else(|| Failure::not_found("key"))?;
    if let Some(name) = params.name {
        record.name = required(Some(name), "name")?;
    }
    if let Some(permissions) = params.permissions {
        record.permissions = permissions;
    }
    if params.expires_at.is_some() {
        record.expires_at = params.expires_at;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_key(State(state): State<AppState>, Path(key): Path<String>) -> Reply<StatusCode> {
    state
        .db
        .write()
        .await
        .keys
        .remove(&key)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| Failure::not_found("key"))
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

async fn list_feeds(State(state): State<AppState>) -> Json<JsonValue> {
    let db = state.db.read().await;
    let feeds = db.feeds.values().map(FeedRecord::to_json).collect();
    Json(page("feeds", feeds))
}

async fn get_feed(State(state): State<AppState>, Path(id): Path<String>) -> Reply<Json<JsonValue>> {
    let db = state.db.read().await;
    db.feeds
        .get(&id)
        .map(|feed| Json(feed.to_json()))
        .ok_or_else(|| Failure::not_found("feed"))
}

async fn get_location(State(state): State<AppState>, Path(id): Path<String>) -> Reply<Json<JsonValue>> {
    let db = state.db.read().await;
    let feed = db.feeds.get(&id).ok_or_else(|| Failure::not_found("feed"))?;
    Ok(Json(feed.location.as_ref().map_or_else(|| json!({}), |l| json!(l))))
}

async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(params): Json<LocationParams>,
) -> Reply<StatusCode> {
    let latitude = required(params.latitude, "latitude")?;
    let longitude = required(params.longitude, "longitude")?;
    let elevation = params.elevation.unwrap_or_default();

    let mut db = state.db.write().await;
    let feed = db.feeds.get_mut(&id).ok_or_else(|| Failure::not_found("feed"))?;
    let location = feed.location.get_or_insert_with(Location::default);
    location.name = params.name.unwrap_or_default();
    location.waypoints.insert(
        0,
        Waypoint {
            timestamp: TIMESTAMP.to_string(),
            latitude: latitude.clone(),
            longitude: longitude.clone(),
            elevation: elevation.clone(),
        },
    );
    location.latitude = latitude;
    location.longitude = longitude;
    location.elevation = elevation;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_stream(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> Reply<Json<JsonValue>> {
    let db = state.db.read().await;
    let feed = db.feeds.get(&id).ok_or_else(|| Failure::not_found("feed"))?;
    feed.streams
        .get(&name)
        .map(|stream| Json(stream.to_json()))
        .ok_or_else(|| Failure::not_found("stream"))
}

async fn update_stream(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Json(params): Json<StreamParams>,
) -> Reply<StatusCode> {
    let mut db = state.db.write().await;
    let feed = db.feeds.get_mut(&id).ok_or_else(|| Failure::not_found("feed"))?;
    let stream = feed
        .streams
        .entry(name.clone())
        .or_insert_with(|| StreamRecord {
            url: format!("/feeds/{id}/streams/{name}"),
            name,
            unit: Unit::default(),
            values: Vec::new(),
        });
    if let Some(unit) = params.unit {
        stream.unit = unit;
    }
    Ok(StatusCode::CREATED)
}

async fn list_values(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> Reply<Json<JsonValue>> {
    let db = state.db.read().await;
    let feed = db.feeds.get(&id).ok_or_else(|| Failure::not_found("feed"))?;
    let stream = feed.streams.get(&name).ok_or_else(|| Failure::not_found("stream"))?;
    let values: Vec<&Value> = stream.values.iter().rev().take(VALUES_LIMIT).collect();
    Ok(Json(json!({
        "start": stream.values.first().map(|v| v.at.as_str()).unwrap_or_default(),
        "end": stream.values.last().map(|v| v.at.as_str()).unwrap_or_default(),
        "limit": VALUES_LIMIT,
        "values": values,
    })))
}

async fn post_values(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Json(params): Json<ValuesParams>,
) -> Reply<StatusCode> {
    if params.values.is_empty() {
        return Err(Failure::invalid("values", "can't be blank"));
    }
    let mut db = state.db.write().await;
    let feed = db.feeds.get_mut(&id).ok_or_else(|| Failure::not_found("feed"))?;
    let stream = feed.streams.get_mut(&name).ok_or_else(|| Failure::not_found("stream"))?;
    stream.values.extend(params.values);
    Ok(StatusCode::NO_CONTENT)
}

async fn request_log(State(state): State<AppState>, Path(id): Path<String>) -> Reply<Json<JsonValue>> {
    let db = state.db.read().await;
    let feed = db.feeds.get(&id).ok_or_else(|| Failure::not_found("feed"))?;
    Ok(Json(json!({ "requests": feed.log })))
}

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

const CONDITIONS: [&str; 5] = ["<", "<=", "=", ">", ">="];

async fn list_triggers(State(state): State<AppState>, Path(id): Path<String>) -> Reply<Json<JsonValue>> {
    let db = state.db.read().await;
    let feed = db.feeds.get(&id).ok_or_else(|| Failure::not_found("feed"))?;
    Ok(Json(json!({ "triggers": feed.triggers })))
}

async fn get_trigger(
    State(state): State<AppState>,
    Path((id, trigger)): Path<(String, String)>,
) -> Reply<Json<Trigger>> {
    let db = state.db.read().await;
    let feed = db.feeds.get(&id).ok_or_else(|| Failure::not_found("feed"))?;
    let index = feed.trigger_index(&trigger).ok_or_else(|| Failure::not_found("trigger"))?;
    Ok(Json(feed.triggers[index].clone()))
}

async fn create_trigger(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(params): Json<TriggerParams>,
) -> Reply<(StatusCode, Json<Trigger>)> {
    let name = required(params.name, "name")?;
    let stream = required(params.stream, "stream")?;
    let condition = required(params.condition, "condition")?;
    if !CONDITIONS.contains(&condition.as_str()) {
        return Err(Failure::invalid("condition", "is not included in the list"));
    }
    let value = required(params.value, "value")?;
    let callback_url = required(params.callback_url, "callback_url")?;

    let mut db = state.db.write().await;
    let feed = db.feeds.get_mut(&id).ok_or_else(|| Failure::not_found("feed"))?;
    if feed.trigger_index(&name).is_some() {
        return Err(Failure::invalid("name", "has already been taken"));
    }
    let trigger = Trigger {
        id: new_id(),
        url: format!("/feeds/{id}/triggers/{name}"),
        name,
        stream,
        condition,
        value,
        callback_url,
        status: params.status.unwrap_or_else(|| "enabled".to_string()),
        created: TIMESTAMP.to_string(),
        updated: TIMESTAMP.to_string(),
    };
    feed.triggers.push(trigger.clone());
    Ok((StatusCode::CREATED, Json(trigger)))
}

async fn update_trigger(
    State(state): State<AppState>,
    Path((id, trigger)): Path<(String, String)>,
    Json(params): Json<TriggerParams>,
) -> Reply<StatusCode> {
    let mut db = state.db.write().await;
    let feed = db.feeds.get_mut(&id).ok_or_else(|| Failure::not_found("feed"))?;
    let index = feed.trigger_index(&trigger).ok_or_else(|| Failure::not_found("trigger"))?;
    let record = &mut feed.triggers[index];
    if let Some(condition) = params.condition {
        if !CONDITIONS.contains(&condition.as_str()) {
            return Err(Failure::invalid("condition", "is not included in the list"));
        }
        record.condition = condition;
    }
    if let Some(value) = params.value {
        record.value = value;
    }
    if let Some(callback_url) = params.callback_url {
        record.callback_url = callback_url;
    }
    if let Some(status) = params.status {
        record.status = status;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_trigger(
    State(state): State<AppState>,
    Path((id, trigger)): Path<(String, String)>,
) -> Reply<StatusCode> {
    let mut db = state.db.write().await;
    let feed = db.feeds.get_mut(&id).ok_or_else(|| Failure::not_found("feed"))?;
    let index = feed.trigger_index(&trigger).ok_or_else(|| Failure::not_found("trigger"))?;
    feed.triggers.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

async fn test_trigger(
    State(state): State<AppState>,
    Path((id, trigger)): Path<(String, String)>,
) -> Reply<StatusCode> {
    let db = state.db.read().await;
    let feed = db.feeds.get(&id).ok_or_else(|| Failure::not_found("feed"))?;
    feed.trigger_index(&trigger)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| Failure::not_found("trigger"))
}
