//! Middleware for bearer-token validation on protected routes

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use mongodb::bson::oid::ObjectId;
use tracing::error;

use crate::AppState;
use crate::error::ApiError;

/// Extract and validate the JWT from the Authorization header
///
/// On success the caller's ObjectId is inserted into request extensions
/// for handlers to pick up; any failure is a 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        error!("Failed to validate token: {}", e);
        ApiError::Unauthorized
    })?;

    // The subject must be a well-formed user identifier
    let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| ApiError::Unauthorized)?;

    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}
