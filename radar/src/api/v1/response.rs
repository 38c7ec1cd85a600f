//! # V1 API Response Envelope & Error Contract
//!
//! Every v1 endpoint returns an [`ApiResponse<T>`] envelope with three
//! optional top-level fields:
//!
//! ```json
//! {
//!   "data": { ... },                                      // success only
//!   "meta": { "total": 42 },                              // optional
//!   "error": { "code": "not_found", "message": "..." }    // error only
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::error::RadarError;

/// Machine-readable error code included in every error response.
///
/// Serialized as a snake_case string on the wire (e.g. `"invalid_request"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed parameters, failed validation or an exceeded capacity. HTTP 400.
    InvalidRequest,
    /// Missing or unknown API key. HTTP 401.
    Unauthorized,
    /// The artist, roster or pairing does not exist. HTTP 404.
    NotFound,
    /// The signal source failed. HTTP 502.
    UpstreamUnavailable,
    /// The signal source did not answer in time. HTTP 504.
    UpstreamTimeout,
    /// Anything else. Internal details are never leaked. HTTP 500.
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::NotFound => write!(f, "not_found"),
            Self::UpstreamUnavailable => write!(f, "upstream_unavailable"),
            Self::UpstreamTimeout => write!(f, "upstream_timeout"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    /// Safe to show to end users.
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Canonical v1 API response envelope.
///
/// On success `data` is present and `error` absent; on error the reverse.
/// The HTTP status is derived from the error code, or set by the success
/// constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            meta: None,
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn success_with_meta(data: T, meta: ResponseMeta) -> Self {
        Self {
            data: Some(data),
            meta: Some(meta),
            error: None,
            status: StatusCode::OK,
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        let status = code.status();
        Self {
            data: None,
            meta: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
            status,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        match serde_json::to_value(&self) {
            Ok(body) => (status, Json(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize v1 response");
                let body = serde_json::json!({
                    "error": {
                        "code": "internal_error",
                        "message": "An internal error occurred"
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl<T: Serialize> From<RadarError> for ApiResponse<T> {
    /// Internal error details are never returned to the client; they are
    /// logged instead.
    fn from(err: RadarError) -> Self {
        match err {
            RadarError::NotFound(ref msg) => ApiResponse::error(ErrorCode::NotFound, msg.clone()),

            RadarError::Validation(ref msg) => {
                ApiResponse::error(ErrorCode::InvalidRequest, msg.clone())
            }

            ref capacity @ RadarError::CapacityExceeded { .. } => {
                ApiResponse::error(ErrorCode::InvalidRequest, capacity.to_string())
            }

            RadarError::Json(ref e) => {
                ApiResponse::error(ErrorCode::InvalidRequest, format!("Invalid JSON: {e}"))
            }

            ref timeout @ RadarError::Timeout(_) => {
                tracing::warn!(error = %timeout, "Signal source timed out");
                ApiResponse::error(ErrorCode::UpstreamTimeout, "Signal source timed out")
            }

            ref upstream @ (RadarError::SignalAdapter(_) | RadarError::Http(_)) => {
                tracing::warn!(error = %upstream, "Signal source failed");
                ApiResponse::error(ErrorCode::UpstreamUnavailable, "Signal source unavailable")
            }

            ref internal @ (RadarError::Database(_) | RadarError::Io(_) | RadarError::Internal(_)) => {
                tracing::error!(error = %internal, "Internal error mapped to v1 response");
                ApiResponse::error(ErrorCode::InternalError, "An internal error occurred")
            }
        }
    }
}

/// A bare `RadarError` returned from a handler renders as the same envelope.
impl IntoResponse for RadarError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::from(self).into_response()
    }
}

impl<T: Serialize> From<ValidationErrors> for ApiResponse<T> {
    fn from(errors: ValidationErrors) -> Self {
        ApiResponse::error(ErrorCode::InvalidRequest, format!("Invalid request: {errors}"))
    }
}
