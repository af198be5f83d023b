//! Marketplace service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use common::error::DatabaseError;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::auth_middleware,
    models::{Auction, Bid, UserSummary},
    repositories::BidOutcome,
    serialize, validation,
};

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for user login
#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserSummary,
}

/// Create the router for the marketplace service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auctions", post(create_auction))
        .route("/auctions/:id/bid", post(place_bid))
        .route("/users/:id/auctions", get(get_user_auctions))
        .route("/users/:id/bids", get(get_user_bids))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auctions", get(get_auctions))
        .route("/auctions/:id", get(get_auction))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "marketplace"
    }))
}

/// Register a new user
///
/// Duplicate emails are rejected up front and again on the unique index,
/// so concurrent registrations cannot create a second user.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let new_user = validation::validate_user(&payload)?;

    if state
        .user_repository
        .find_by_email(&new_user.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    match state.user_repository.create(new_user).await {
        Ok(user) => {
            info!("Registered user {}", user.email);
            Ok((
                StatusCode::CREATED,
                Json(json!({"message": "User registered successfully"})),
            ))
        }
        Err(DatabaseError::DuplicateKey) => {
            Err(ApiError::Conflict("Email already registered".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Log a user in and issue a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !state.user_repository.verify_password(&user, &payload.password) {
        return Err(ApiError::InvalidCredentials);
    }

    let user_id = user.id.ok_or(ApiError::Internal)?;
    let access_token = state.jwt_service.issue_token(user_id).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::Internal
    })?;

    Ok(Json(LoginResponse {
        access_token,
        user: UserSummary::from(&user),
    }))
}

/// List all auctions
pub async fn get_auctions(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let auctions = state.auction_repository.find_all().await?;
    Ok(Json(serialize::to_wire_list(auctions)))
}

/// Get a single auction by ID
pub async fn get_auction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let auction_id = parse_auction_id(&id)?;

    let auction = state
        .auction_repository
        .find_by_id(auction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    Ok(Json(serialize::to_wire(auction)))
}

/// Create a new auction owned by the authenticated caller
pub async fn create_auction(
    State(state): State<AppState>,
    Extension(user_id): Extension<ObjectId>,
    Json(payload): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let data = validation::validate_auction(&payload)?;

    let auction = Auction::new(data, user_id);
    let stored = state.auction_repository.insert(&auction).await?;

    info!("User {} created auction {:?}", user_id, stored.get("_id"));
    Ok((StatusCode::CREATED, Json(serialize::to_wire(stored))))
}

/// Place a bid on an open auction
///
/// The expiry and amount checks run against a fresh read; acceptance is
/// decided by the conditional update, so a concurrent higher bid can never
/// be overwritten by a lower one.
pub async fn place_bid(
    State(state): State<AppState>,
    Extension(user_id): Extension<ObjectId>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let auction_id = parse_auction_id(&id)?;

    let auction = state
        .auction_repository
        .find_by_id_typed(auction_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Auction not found".to_string()))?;

    if !auction.is_open_at(Utc::now()) {
        return Err(ApiError::Expired);
    }

    let amount = validation::validate_bid(&payload, auction.current_bid)?;
    let bid = Bid::new(user_id, amount);

    match state.auction_repository.append_bid(auction_id, &bid).await? {
        BidOutcome::Accepted => {
            info!("User {} bid {} on auction {}", user_id, amount, auction_id);
            Ok(Json(json!({"message": "Bid placed successfully"})))
        }
        BidOutcome::Outpaced => Err(ApiError::BidConflict),
    }
}

/// List auctions created by the given user
pub async fn get_user_auctions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = parse_user_id(&id)?;
    let auctions = state.auction_repository.find_by_seller(user_id).await?;
    Ok(Json(serialize::to_wire_list(auctions)))
}

/// List auctions the given user has bid on
pub async fn get_user_bids(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user_id = parse_user_id(&id)?;
    let auctions = state.auction_repository.find_with_bidder(user_id).await?;
    Ok(Json(serialize::to_wire_list(auctions)))
}

fn parse_auction_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| ApiError::NotFound("Invalid auction ID".to_string()))
}

fn parse_user_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| ApiError::UnprocessableEntity("Invalid user ID format".to_string()))
}
