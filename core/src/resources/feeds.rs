use serde::Serialize;

use crate::client::M2xClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Feed, Feeds, Location, RequestLog, Stream, Values};

impl<T: Transport> M2xClient<T> {
    /// `GET /feeds`
    pub fn feeds(&self) -> Result<Feeds, ApiError> {
        self.fetch("/feeds")
    }

    /// `GET /feeds/{id}`
    pub fn feed(&self, id: &str) -> Result<Feed, ApiError> {
        self.fetch(&format!("/feeds/{id}"))
    }

    /// `GET /feeds/{id}/location`
    pub fn feed_location(&self, id: &str) -> Result<Location, ApiError> {
        self.fetch(&format!("/feeds/{id}/location"))
    }

    /// `PUT /feeds/{id}/location`
    pub fn update_feed_location<P: Serialize + ?Sized>(
        &self,
        id: &str,
        params: &P,
    ) -> Result<(), ApiError> {
        self.update(&format!("/feeds/{id}/location"), params, 204)
    }

    /// `GET /feeds/{id}/streams/{name}`
    pub fn feed_stream(&self, id: &str, name: &str) -> Result<Stream, ApiError> {
        self.fetch(&format!("/feeds/{id}/streams/{name}"))
    }

    /// `PUT /feeds/{id}/streams/{name}`
    ///
    /// Creates the stream when it does not exist yet; the API answers 201 in
    /// both cases.
    pub fn update_feed_stream<P: Serialize + ?Sized>(
        &self,
        id: &str,
        name: &str,
        params: &P,
    ) -> Result<(), ApiError> {
        self.update(&format!("/feeds/{id}/streams/{name}"), params, 201)
    }

    /// `GET /feeds/{id}/streams/{name}/values`
    pub fn feed_stream_values(&self, id: &str, name: &str) -> Result<Values, ApiError> {
        self.fetch(&format!("/feeds/{id}/streams/{name}/values"))
    }

    /// `POST /feeds/{id}/streams/{name}/values`
    pub fn post_feed_stream_values<P: Serialize + ?Sized>(
        &self,
        id: &str,
        name: &str,
        values: &P,
    ) -> Result<(), ApiError> {
        self.submit(&format!("/feeds/{id}/streams/{name}/values"), Some(values))
    }

    /// `GET /feeds/{id}/log`
    pub fn request_log(&self, id: &str) -> Result<RequestLog, ApiError> {
        self.fetch(&format!("/feeds/{id}/log"))
    }
}
