//! Custom error types for the marketplace service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Closed set of domain errors, rendered at the boundary as
/// `{"error": message}` with the matching status code
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// Input that parses as JSON but fails format-level expectations
    #[error("{0}")]
    UnprocessableEntity(String),

    /// Missing or invalid bearer credential
    #[error("Unauthorized")]
    Unauthorized,

    /// Login with an unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Duplicate unique key
    #[error("{0}")]
    Conflict(String),

    /// Missing entity or malformed identifier
    #[error("{0}")]
    NotFound(String),

    /// Auction past its end time
    #[error("Auction has ended")]
    Expired,

    /// A concurrent higher bid won the conditional update; the caller may
    /// retry with a fresh read
    #[error("Bid was outpaced by a concurrent higher bid")]
    BidConflict,

    /// Store unreachable or a query failed
    #[error("Database error")]
    Database(#[from] common::error::DatabaseError),

    /// Anything unexpected; details stay out of the response
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Expired => StatusCode::BAD_REQUEST,
            ApiError::BidConflict => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {:?}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.status_code()
    }

    #[test]
    fn errors_map_to_expected_status_codes() {
        assert_eq!(
            status_of(ApiError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::UnprocessableEntity("bad".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ApiError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::Conflict("Email already registered".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::NotFound("Auction not found".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(ApiError::Expired), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ApiError::BidConflict), StatusCode::CONFLICT);
        assert_eq!(
            status_of(ApiError::Internal),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_render_without_internal_detail() {
        assert_eq!(ApiError::Expired.to_string(), "Auction has ended");
        assert_eq!(
            ApiError::Validation("Missing bid amount".into()).to_string(),
            "Missing bid amount"
        );
        assert_eq!(ApiError::Internal.to_string(), "Internal server error");
        assert_eq!(
            ApiError::Database(common::error::DatabaseError::Configuration("uri".into()))
                .to_string(),
            "Database error"
        );
    }
}
