use serde::Serialize;

use crate::client::M2xClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Trigger, Triggers};

impl<T: Transport> M2xClient<T> {
    /// `GET /feeds/{feed_id}/triggers`
    pub fn triggers(&self, feed_id: &str) -> Result<Triggers, ApiError> {
        self.fetch(&format!("/feeds/{feed_id}/triggers"))
    }

    /// `GET /feeds/{feed_id}/triggers/{id}`
    pub fn trigger(&self, feed_id: &str, id: &str) -> Result<Trigger, ApiError> {
        self.fetch(&format!("/feeds/{feed_id}/triggers/{id}"))
    }

    /// `POST /feeds/{feed_id}/triggers`
    pub fn create_trigger<P: Serialize + ?Sized>(
        &self,
        feed_id: &str,
        params: &P,
    ) -> Result<Trigger, ApiError> {
        self.create(&format!("/feeds/{feed_id}/triggers"), params)
    }

    /// `PUT /feeds/{feed_id}/triggers/{id}`
    pub fn update_trigger<P: Serialize + ?Sized>(
        &self,
        feed_id: &str,
        id: &str,
        params: &P,
    ) -> Result<(), ApiError> {
        self.update(&format!("/feeds/{feed_id}/triggers/{id}"), params, 204)
    }

    /// `DELETE /feeds/{feed_id}/triggers/{id}`
    pub fn delete_trigger(&self, feed_id: &str, id: &str) -> Result<(), ApiError> {
        self.remove(&format!("/feeds/{feed_id}/triggers/{id}"))
    }

    /// `POST /feeds/{feed_id}/triggers/{name}/test`
    ///
    /// Asks the service to fire the trigger's callback once with a sample
    /// event.
    pub fn test_trigger(&self, feed_id: &str, name: &str) -> Result<(), ApiError> {
        self.submit::<()>(&format!("/feeds/{feed_id}/triggers/{name}/test"), None)
    }
}
