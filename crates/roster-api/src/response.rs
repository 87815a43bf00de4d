//! The response envelope: numeric status, message, optional data payload.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Envelope wrapping every API response.
///
/// The `status` field mirrors the HTTP status line so non-HTTP consumers of
/// the serialized body see the same code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    /// Numeric status, identical to the HTTP status of the response.
    pub status: u16,
    /// Human-readable message.
    pub message: String,
    /// Optional payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    /// 200 with a payload.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status: 200,
            message: message.into(),
            data,
        }
    }

    /// 201 with a payload.
    #[must_use]
    pub fn created(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status: 201,
            message: message.into(),
            data,
        }
    }

    /// Error envelope carrying the error's status and message, no payload.
    #[must_use]
    pub fn error(err: &ApiError) -> Self {
        Self {
            status: err.status_code(),
            message: err.message(),
            data: None,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiResponse::error(&self).into_response()
    }
}
