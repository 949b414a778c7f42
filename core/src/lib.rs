//! Synchronous client for the M2X IoT data-platform API.
//!
//! # Overview
//! Covers blueprints, batches, feeds (location, streams, values, request
//! log), access keys and triggers, plus the `/status` health check and the
//! payload the service POSTs to trigger callbacks.
//!
//! # Design
//! - Every call runs the same pipeline: build request, apply the header
//!   policy, execute on a `Transport`, branch on the one expected status
//!   code, then decode or normalize the error. That pipeline is
//!   `Operation<T>`; resource methods only choose its path, verb, status and
//!   codec.
//! - Every method returns `Result<T, ApiError>`; `ApiError` always carries a
//!   message and the HTTP status code (0 if nothing was received).
//! - `M2xClient` owns its API key. Clients with different keys can be used
//!   side by side.
//! - I/O is behind the `Transport` trait. `UreqTransport` is the default;
//!   tests plug in canned transports.

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod headers;
pub mod http;
pub mod operation;
mod resources;
pub mod transport;
pub mod types;

pub use client::M2xClient;
pub use config::{ClientConfig, ConfigError, DEFAULT_API_BASE};
pub use error::{ApiError, ErrorKind, TransportError};
pub use event::{EventFieldError, EventValue, TriggerEvent};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use operation::Operation;
pub use transport::{Transport, UreqTransport};
pub use types::{
    Batch, Batches, Blueprint, Blueprints, DatasourceCounts, DatasourceParams, Feed, Feeds, Key,
    KeyParams, Keys, Location, LocationParams, LoggedRequest, RequestLog, Status, Stream,
    StreamParams, Trigger, TriggerParams, Triggers, Unit, Value, Values, ValuesParams, Waypoint,
};
