//! HTTP request handlers for the recipe server

pub mod recipes;

use crate::error::StoreError;
use crate::server::ServerState;
use crate::store::RecipeStore;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// JSON body for errors and plain acknowledgements
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A store failure rendered as an HTTP response
///
/// `write_failure` replaces the message of a failed persist so clients see
/// which operation did not stick.
pub struct ApiError {
    error: StoreError,
    write_failure: &'static str,
}

impl ApiError {
    pub fn new(error: StoreError) -> Self {
        Self {
            error,
            write_failure: "Failed to write recipes",
        }
    }

    pub fn on_write(error: StoreError, write_failure: &'static str) -> Self {
        Self {
            error,
            write_failure,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match &self.error {
            StoreError::NotFound(_) => "Recipe not found".to_string(),
            StoreError::Validation(msg) => msg.clone(),
            StoreError::StorageWrite { .. } => self.write_failure.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.error);
        }
        (status, Json(MessageBody::new(self.message()))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::new(error)
    }
}

/// Run one store operation on the blocking pool.
pub(crate) async fn with_store<T, F>(state: &ServerState, op: F) -> Result<T, StoreError>
where
    F: FnOnce(&RecipeStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
}
