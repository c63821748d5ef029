//! Domain error to HTTP translation
//!
//! `ApiError` is the single place where `DomainError` variants become
//! status codes and error bodies. Handlers return it via `?` and never
//! pick status codes themselves.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Structured error body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable machine-readable code, e.g. `RESOURCE_NOT_FOUND`
    pub code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Per-field validation messages, present only for `VALIDATION_FAILED`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: Utc::now(),
            errors: None,
        }
    }

    pub fn validation(
        message: impl Into<String>,
        errors: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            errors: Some(errors),
        }
    }
}

/// Wrapper turning a `DomainError` into an HTTP response
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

fn status_and_code(e: &DomainError) -> (StatusCode, &'static str) {
    match e {
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
        DomainError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
        DomainError::DuplicateCalendar { .. } => (StatusCode::CONFLICT, "DUPLICATE_CALENDAR"),
        DomainError::TimeConflict { .. } => (StatusCode::CONFLICT, "TIME_CONFLICT"),
        DomainError::SlotNotAvailable { .. } => (StatusCode::CONFLICT, "SLOT_NOT_AVAILABLE"),
        DomainError::InvalidState(_) => (StatusCode::CONFLICT, "INVALID_STATE"),
        DomainError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = status_and_code(&self.0);

        // Internal details stay in the log, not the response body
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error: {}", self.0);
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = super::ApiResponse::<super::EmptyData>::error(ErrorResponse::new(code, message));
        (status, Json(body)).into_response()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_of(e: DomainError) -> StatusCode {
        ApiError(e).into_response().status()
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::not_found("Calendar", Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn invalid_argument_maps_to_400() {
        assert_eq!(
            status_of(DomainError::InvalidArgument("bad".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn conflicts_map_to_409() {
        assert_eq!(
            status_of(DomainError::DuplicateCalendar {
                user_id: "u1".into(),
                name: "Work".into(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::TimeConflict {
                calendar_id: Uuid::new_v4(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::SlotNotAvailable {
                slot_id: Uuid::new_v4(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::InvalidState("busy".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn database_errors_are_masked_as_500() {
        let resp = ApiError(DomainError::Database("secret dsn".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
