//! The M2X API client.
//!
//! # Design
//! `M2xClient` owns its configuration and a `Transport`, and carries no
//! mutable state between calls. Every resource method (see `resources`)
//! builds one `Operation` through the helpers below and runs it, so the
//! request URL, the header policy and the status-code contract are decided
//! in exactly one place. The key sent in `X-M2X-KEY` is always this
//! client's own.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::headers;
use crate::http::{HttpMethod, HttpRequest};
use crate::operation::{self, Codec, Operation};
use crate::transport::{Transport, UreqTransport};
use crate::types::Status;

/// Synchronous client for the M2X API.
#[derive(Debug, Clone)]
pub struct M2xClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl M2xClient<UreqTransport> {
    /// Client for the default endpoint authenticated with `api_key`.
    ///
    /// ```no_run
    /// let client = m2x_core::M2xClient::new("<API-KEY>");
    /// let status = client.status()?;
    /// # Ok::<(), m2x_core::ApiError>(())
    /// ```
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(api_key))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> M2xClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api_base(&self) -> &str {
        self.config.api_base()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Health of the API and of the trigger service.
    pub fn status(&self) -> Result<Status, ApiError> {
        self.fetch("/status")
    }

    /// A request for `path` (relative to the base URL) with the header policy
    /// applied.
    pub fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let mut request = HttpRequest::new(method, format!("{}{path}", self.config.api_base()));
        headers::apply(&mut request, self.config.api_key());
        request
    }

    /// An operation without a request body.
    pub fn operation<R>(
        &self,
        method: HttpMethod,
        path: &str,
        expected_status: u16,
        codec: Codec<R>,
    ) -> Operation<R> {
        Operation::new(self.request(method, path), expected_status, codec)
    }

    /// An operation sending `payload` as JSON.
    ///
    /// Fails with status code 0 if the payload cannot be encoded; the
    /// transport is never involved in that case.
    pub fn operation_with_body<P, R>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &P,
        expected_status: u16,
        codec: Codec<R>,
    ) -> Result<Operation<R>, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload).map_err(ApiError::encode)?;
        let mut request = self.request(method, path);
        request.body = Some(body);
        Ok(Operation::new(request, expected_status, codec))
    }

    /// Run `operation` on this client's transport.
    pub fn execute<R>(&self, operation: &Operation<R>) -> Result<R, ApiError> {
        operation.send(&self.transport)
    }

    /// GET, expecting 200 and a JSON body.
    pub(crate) fn fetch<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.execute(&self.operation(HttpMethod::Get, path, 200, operation::json::<R>))
    }

    /// POST, expecting 201 and the created record.
    pub(crate) fn create<P, R>(&self, path: &str, payload: &P) -> Result<R, ApiError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let op = self.operation_with_body(HttpMethod::Post, path, payload, 201, operation::json::<R>)?;
        self.execute(&op)
    }

    /// PUT, expecting `expected_status` and ignoring the body.
    pub(crate) fn update<P>(&self, path: &str, payload: &P, expected_status: u16) -> Result<(), ApiError>
    where
        P: Serialize + ?Sized,
    {
        let op = self.operation_with_body(HttpMethod::Put, path, payload, expected_status, operation::empty)?;
        self.execute(&op)
    }

    /// POST whose answer is 204 with no body.
    pub(crate) fn submit<P>(&self, path: &str, payload: Option<&P>) -> Result<(), ApiError>
    where
        P: Serialize + ?Sized,
    {
        let op = match payload {
            Some(payload) => {
                self.operation_with_body(HttpMethod::Post, path, payload, 204, operation::empty)?
            }
            None => self.operation(HttpMethod::Post, path, 204, operation::empty),
        };
        self.execute(&op)
    }

    /// DELETE, expecting 204.
    pub(crate) fn remove(&self, path: &str) -> Result<(), ApiError> {
        self.execute(&self.operation(HttpMethod::Delete, path, 204, operation::empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpResponse;

    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError::new("unreachable"))
        }
    }

    fn client(key: &str) -> M2xClient<Unreachable> {
        let config = ClientConfig::new(key).with_api_base("http://localhost:3000/v1/");
        M2xClient::with_transport(config, Unreachable)
    }

    #[test]
    fn request_joins_base_and_path() {
        let req = client("k").request(HttpMethod::Get, "/blueprints/1");
        assert_eq!(req.url, "http://localhost:3000/v1/blueprints/1");
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.body.is_none());
    }

    #[test]
    fn each_client_sends_its_own_key() {
        let first = client("first-key");
        let second = client("second-key");
        assert_eq!(first.request(HttpMethod::Get, "/status").header("X-M2X-KEY"), Some("first-key"));
        assert_eq!(second.request(HttpMethod::Get, "/status").header("X-M2X-KEY"), Some("second-key"));
    }

    #[test]
    fn body_is_encoded_json() {
        let op = client("k")
            .operation_with_body(
                HttpMethod::Post,
                "/keys",
                &serde_json::json!({ "name": "Go key" }),
                201,
                operation::empty,
            )
            .unwrap();
        assert_eq!(op.request().body.as_deref(), Some(br#"{"name":"Go key"}"#.as_slice()));
        assert_eq!(op.expected_status(), 201);
    }

    #[test]
    fn transport_failure_reaches_caller() {
        let err = client("k").status().unwrap_err();
        assert_eq!(err.status_code(), 0);
        assert_eq!(err.message(), "unreachable");
    }
}
