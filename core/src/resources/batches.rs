use serde::Serialize;

use crate::client::M2xClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Batch, Batches};

impl<T: Transport> M2xClient<T> {
    /// `GET /batches`
    pub fn batches(&self) -> Result<Batches, ApiError> {
        self.fetch("/batches")
    }

    /// `GET /batches/{id}`
    pub fn batch(&self, id: &str) -> Result<Batch, ApiError> {
        self.fetch(&format!("/batches/{id}"))
    }

    /// `POST /batches`
    pub fn create_batch<P: Serialize + ?Sized>(&self, params: &P) -> Result<Batch, ApiError> {
        self.create("/batches", params)
    }

    /// `PUT /batches/{id}`
    pub fn update_batch<P: Serialize + ?Sized>(&self, id: &str, params: &P) -> Result<(), ApiError> {
        self.update(&format!("/batches/{id}"), params, 204)
    }

    /// `DELETE /batches/{id}`
    pub fn delete_batch(&self, id: &str) -> Result<(), ApiError> {
        self.remove(&format!("/batches/{id}"))
    }
}
