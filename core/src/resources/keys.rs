use serde::Serialize;

use crate::client::M2xClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Key, Keys};

// Keys are addressed by the key string itself, not by `id`.
impl<T: Transport> M2xClient<T> {
    /// `GET /keys`
    pub fn keys(&self) -> Result<Keys, ApiError> {
        self.fetch("/keys")
    }

    /// `GET /keys/{key}`
    pub fn key(&self, key: &str) -> Result<Key, ApiError> {
        self.fetch(&format!("/keys/{key}"))
    }

    /// `POST /keys`
    pub fn create_key<P: Serialize + ?Sized>(&self, params: &P) -> Result<Key, ApiError> {
        self.create("/keys", params)
    }

    /// `PUT /keys/{key}`
    pub fn update_key<P: Serialize + ?Sized>(&self, key: &str, params: &P) -> Result<(), ApiError> {
        self.update(&format!("/keys/{key}"), params, 204)
    }

    /// `DELETE /keys/{key}`
    pub fn delete_key(&self, key: &str) -> Result<(), ApiError> {
        self.remove(&format!("/keys/{key}"))
    }
}
