//! HTTP error mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde_json::json;
use stockroom_core::InventoryError;

/// Failure of one HTTP request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    /// Request body or query string could not be decoded.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Inventory(InventoryError::NotFound { .. })
            | Self::Inventory(InventoryError::ProductNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Inventory(InventoryError::Ambiguous { .. })
            | Self::Inventory(InventoryError::InvalidAdjustment { .. }) => StatusCode::BAD_REQUEST,
            Self::Inventory(InventoryError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Rejected { status, .. } => *status,
            Self::Inventory(InventoryError::Repo(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=http_error module=http status=error http_status={} error={}",
                status.as_u16(),
                self
            );
        } else {
            warn!(
                "event=http_error module=http status=rejected http_status={}",
                status.as_u16()
            );
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
