//! The generic resource operation shared by every API call.
//!
//! # Design
//! An `Operation<T>` is a fully built request, the one status code that
//! means success for it, and the codec that turns a success body into `T`.
//! Resource methods differ only in those three values, so each of them is a
//! single constructor call; the branching below runs the same way for all.
//!
//! 1. Transport failure: `ApiError` from the failure, body never decoded.
//! 2. Expected status: decode with the codec, decode failure keeps the status.
//! 3. Any other status: the body goes to the error normalizer.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::http::HttpResponse;
use crate::transport::Transport;

/// Decodes a success body.
pub type Codec<T> = fn(&[u8]) -> Result<T, serde_json::Error>;

/// Decode a JSON body into `T`.
pub fn json<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Ignore the body. Used by operations that answer 201/204 with nothing useful.
pub fn empty(_body: &[u8]) -> Result<(), serde_json::Error> {
    Ok(())
}

/// A single request/response exchange with its success contract.
#[derive(Debug, Clone)]
pub struct Operation<T> {
    request: HttpRequest,
    expected_status: u16,
    codec: Codec<T>,
}

impl<T> Operation<T> {
    pub fn new(request: HttpRequest, expected_status: u16, codec: Codec<T>) -> Self {
        Self {
            request,
            expected_status,
            codec,
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn expected_status(&self) -> u16 {
        self.expected_status
    }

    /// Interpret a response received for this operation.
    pub fn parse(&self, response: &HttpResponse) -> Result<T, ApiError> {
        if response.status != self.expected_status {
            warn!(
                "{} {} returned {} (expected {})",
                self.request.method, self.request.url, response.status, self.expected_status
            );
            return Err(ApiError::from_response(response));
        }
        (self.codec)(&response.body).map_err(|e| ApiError::decode(e, response.status))
    }

    /// Execute the request on `transport` and interpret the outcome.
    pub fn send<R: Transport + ?Sized>(&self, transport: &R) -> Result<T, ApiError> {
        debug!("{} {}", self.request.method, self.request.url);
        let response = transport
            .execute(&self.request)
            .map_err(ApiError::from_transport)?;
        self.parse(&response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use serde::Deserialize;

    use super::*;
    use crate::error::{ErrorKind, TransportError};
    use crate::http::HttpMethod;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    struct Canned {
        outcome: Result<HttpResponse, TransportError>,
        calls: Cell<usize>,
    }

    impl Canned {
        fn respond(status: u16, body: &str) -> Self {
            Self {
                outcome: Ok(HttpResponse::new(status, body)),
                calls: Cell::new(0),
            }
        }

        fn fail(description: &str) -> Self {
            Self {
                outcome: Err(TransportError::new(description)),
                calls: Cell::new(0),
            }
        }
    }

    impl Transport for Canned {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    fn fetch() -> Operation<Named> {
        Operation::new(
            HttpRequest::new(HttpMethod::Get, "http://localhost/v1/blueprints/1"),
            200,
            json::<Named>,
        )
    }

    #[test]
    fn expected_status_decodes_body() {
        let transport = Canned::respond(200, r#"{"name":"Sample Blueprint"}"#);
        let named = fetch().send(&transport).unwrap();
        assert_eq!(named.name, "Sample Blueprint");
        assert_eq!(transport.calls.get(), 1);
    }

    #[test]
    fn other_status_goes_to_normalizer() {
        let transport = Canned::respond(404, r#"{"message":"The specified blueprint does not exist"}"#);
        let err = fetch().send(&transport).unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "The specified blueprint does not exist");
        assert!(err.is_not_found());
    }

    #[test]
    fn success_code_other_than_expected_is_an_error() {
        let transport = Canned::respond(200, r#"{"name":"x"}"#);
        let op = Operation::new(
            HttpRequest::new(HttpMethod::Post, "http://localhost/v1/blueprints"),
            201,
            json::<Named>,
        );
        let err = op.send(&transport).unwrap_err();
        assert_eq!(err.status_code(), 200);
        assert_eq!(err.message(), "");
    }

    #[test]
    fn bad_body_on_success_is_decode_error() {
        let transport = Canned::respond(200, "not json");
        let err = fetch().send(&transport).unwrap_err();
        assert_eq!(err.status_code(), 200);
        assert!(matches!(err.kind(), ErrorKind::Decode(_)));
    }

    #[test]
    fn transport_failure_skips_decoding() {
        let transport = Canned::fail("connection refused");
        let err = fetch().send(&transport).unwrap_err();
        assert_eq!(err.status_code(), 0);
        assert_eq!(err.message(), "connection refused");
        assert!(matches!(err.kind(), ErrorKind::Transport(_)));
    }

    #[test]
    fn empty_codec_accepts_empty_body() {
        let op = Operation::new(
            HttpRequest::new(HttpMethod::Delete, "http://localhost/v1/blueprints/1"),
            204,
            empty,
        );
        assert!(op.parse(&HttpResponse::new(204, Vec::new())).is_ok());
        assert!(op.parse(&HttpResponse::new(200, Vec::new())).is_err());
    }
}
