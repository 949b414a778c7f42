use serde::Serialize;

use crate::client::M2xClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Blueprint, Blueprints};

impl<T: Transport> M2xClient<T> {
    /// `GET /blueprints`
    pub fn blueprints(&self) -> Result<Blueprints, ApiError> {
        self.fetch("/blueprints")
    }

    /// `GET /blueprints/{id}`
    pub fn blueprint(&self, id: &str) -> Result<Blueprint, ApiError> {
        self.fetch(&format!("/blueprints/{id}"))
    }

    /// `POST /blueprints`
    ///
    /// ```no_run
    /// use m2x_core::{DatasourceParams, M2xClient};
    ///
    /// let client = M2xClient::new("<API-KEY>");
    /// let blueprint = client.create_blueprint(&DatasourceParams {
    ///     name: Some("Rust Blueprint".to_string()),
    ///     visibility: Some("private".to_string()),
    ///     ..DatasourceParams::default()
    /// })?;
    /// # Ok::<(), m2x_core::ApiError>(())
    /// ```
    pub fn create_blueprint<P: Serialize + ?Sized>(&self, params: &P) -> Result<Blueprint, ApiError> {
        self.create("/blueprints", params)
    }

    /// `PUT /blueprints/{id}`
    pub fn update_blueprint<P: Serialize + ?Sized>(&self, id: &str, params: &P) -> Result<(), ApiError> {
        self.update(&format!("/blueprints/{id}"), params, 204)
    }

    /// `DELETE /blueprints/{id}`
    pub fn delete_blueprint(&self, id: &str) -> Result<(), ApiError> {
        self.remove(&format!("/blueprints/{id}"))
    }
}
