//! API Error Handling
//!
//! Maps registry failures onto HTTP responses with an `{"error": ...}` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::RegistryError;

/// Error returned by API handlers
#[derive(Debug)]
pub struct ApiError(RegistryError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RegistryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to API callers, without the error kind prefix
    pub fn message(&self) -> String {
        match &self.0 {
            RegistryError::NotFound(id) => format!("Job {} not found", id),
            RegistryError::InvalidInput(msg) | RegistryError::Internal(msg) => msg.clone(),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Internal error: {}", self.0);
        }

        (status, Json(serde_json::json!({ "error": self.message() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let id = Uuid::new_v4();
        let not_found = ApiError::from(RegistryError::NotFound(id));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.message(), format!("Job {} not found", id));

        let invalid = ApiError::from(RegistryError::InvalidInput("bad status".into()));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message(), "bad status");

        let internal = ApiError::from(RegistryError::Internal("queue full".into()));
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
