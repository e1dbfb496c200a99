use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::polyline::PolylineError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Routing service error: {0}")]
    RoutingApi(String),

    #[error("Routing service rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Polyline decoding failed: {0}")]
    Polyline(#[from] PolylineError),

    #[error("Route generation failed: {0}")]
    RouteGeneration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.clone()),
            AppError::RoutingApi(ref e) => {
                tracing::error!("Routing service error: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error".to_string())
            }
            AppError::RateLimited(ref e) => {
                tracing::warn!("Routing service rate limited: {}", e);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "Routing service is busy, try again shortly".to_string(),
                )
            }
            AppError::Polyline(ref e) => {
                tracing::error!("Polyline decoding failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Routing service returned malformed geometry".to_string(),
                )
            }
            AppError::RouteGeneration(ref e) => {
                tracing::warn!("Route generation failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.clone())
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::RoutingApi("HTTP 500".into()), StatusCode::BAD_GATEWAY),
            (AppError::RateLimited("HTTP 429".into()), StatusCode::TOO_MANY_REQUESTS),
            (
                AppError::Polyline(PolylineError::Truncated { offset: 3 }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::RouteGeneration("no variants".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_polyline_error_converts() {
        let err: AppError = PolylineError::DanglingLatitude.into();
        assert!(matches!(err, AppError::Polyline(_)));
        assert!(err.to_string().starts_with("Polyline decoding failed"));
    }
}
