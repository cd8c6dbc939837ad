//! Request-boundary error type and its HTTP mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cuboid_core::{BagServiceError, CuboidServiceError, RepoError};
use log::{error, warn};
use serde_json::json;
use std::fmt::{Display, Formatter};

pub const CAPACITY_EXCEEDED_MESSAGE: &str = "Insufficient capacity in bag";
pub const CONFLICT_MESSAGE: &str = "Concurrent modification, retry the request";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Caller-facing failure of one request.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed body, id or dimensions (400).
    BadRequest(String),
    /// Referenced bag or cuboid does not exist (404).
    NotFound(String),
    /// Write rejected by the bag capacity rule (422).
    CapacityExceeded,
    /// Write lock contended; retryable (409).
    Conflict,
    /// Anything unexpected (500). The detail is logged, never returned.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::CapacityExceeded => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) | Self::NotFound(message) => write!(f, "{message}"),
            Self::CapacityExceeded => write!(f, "{CAPACITY_EXCEEDED_MESSAGE}"),
            Self::Conflict => write!(f, "{CONFLICT_MESSAGE}"),
            Self::Internal(_) => write!(f, "{INTERNAL_MESSAGE}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(detail) => {
                error!("event=http_error module=http status=error error={detail}");
            }
            Self::Conflict => warn!("event=http_error module=http status=conflict"),
            _ => {}
        }
        let body = Json(json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<CuboidServiceError> for ApiError {
    fn from(value: CuboidServiceError) -> Self {
        match value {
            CuboidServiceError::InvalidInput(err) => Self::BadRequest(err.to_string()),
            err @ (CuboidServiceError::BagNotFound(_) | CuboidServiceError::CuboidNotFound(_)) => {
                Self::NotFound(err.to_string())
            }
            CuboidServiceError::CapacityExceeded { .. } => Self::CapacityExceeded,
            CuboidServiceError::Conflict => Self::Conflict,
            CuboidServiceError::Repo(err) => Self::from(err),
        }
    }
}

impl From<BagServiceError> for ApiError {
    fn from(value: BagServiceError) -> Self {
        match value {
            BagServiceError::InvalidInput(err) => Self::BadRequest(err.to_string()),
            BagServiceError::Repo(err) => Self::from(err),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict(_) => Self::Conflict,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}
