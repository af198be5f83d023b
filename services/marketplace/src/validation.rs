//! Input validation for registration, auction creation, and bids
//!
//! Pure functions over raw JSON payloads. Each check fails on the first
//! violation; messages are part of the API surface.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::ApiError;
use crate::models::{NewAuction, NewUser};

/// Validate a registration payload and extract its fields
pub fn validate_user(payload: &Value) -> Result<NewUser, ApiError> {
    let first_name = require_text(payload, "firstName")?;
    let last_name = require_text(payload, "lastName")?;
    let email = require_text(payload, "email")?;
    let phone = require_text(payload, "phone")?;
    let password = require_text(payload, "password")?;

    if password.len() < 6 {
        return Err(ApiError::Validation(
            "Password must be at least 6 characters long".to_string(),
        ));
    }

    if !email.contains('@') || !email.contains('.') {
        return Err(ApiError::Validation("Invalid email format".to_string()));
    }

    Ok(NewUser {
        first_name,
        last_name,
        email,
        phone,
        password,
    })
}

/// Validate an auction creation payload and extract its fields
pub fn validate_auction(payload: &Value) -> Result<NewAuction, ApiError> {
    for field in [
        "title",
        "description",
        "startingPrice",
        "minimumIncrement",
        "endTime",
    ] {
        require_present_non_empty(payload, field)?;
    }

    let starting_price = parse_number(&payload["startingPrice"]).ok_or_else(|| {
        ApiError::UnprocessableEntity("Starting price must be a valid number".to_string())
    })?;
    if starting_price <= 0.0 {
        return Err(ApiError::Validation(
            "Starting price must be greater than 0".to_string(),
        ));
    }

    let minimum_increment = parse_number(&payload["minimumIncrement"]).ok_or_else(|| {
        ApiError::UnprocessableEntity("Minimum increment must be a valid number".to_string())
    })?;
    if minimum_increment <= 0.0 {
        return Err(ApiError::Validation(
            "Minimum increment must be greater than 0".to_string(),
        ));
    }

    let end_time = payload["endTime"]
        .as_str()
        .and_then(parse_end_time)
        .ok_or_else(|| {
            ApiError::UnprocessableEntity("Invalid end time format".to_string())
        })?;
    if end_time <= Utc::now() {
        return Err(ApiError::Validation(
            "End time must be in the future".to_string(),
        ));
    }

    let image_url = payload
        .get("imageUrl")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from);

    Ok(NewAuction {
        title: require_text(payload, "title")?,
        description: require_text(payload, "description")?,
        starting_price,
        minimum_increment,
        end_time,
        image_url,
    })
}

/// Validate a bid payload against the auction's current bid
pub fn validate_bid(payload: &Value, current_bid: f64) -> Result<f64, ApiError> {
    let amount_value = payload
        .get("amount")
        .ok_or_else(|| ApiError::Validation("Missing bid amount".to_string()))?;

    let amount = parse_number(amount_value).ok_or_else(|| {
        ApiError::Validation("Bid amount must be a valid number".to_string())
    })?;

    if amount <= 0.0 {
        return Err(ApiError::Validation(
            "Bid amount must be greater than 0".to_string(),
        ));
    }

    if amount <= current_bid {
        return Err(ApiError::Validation(format!(
            "Bid must be higher than current bid (${})",
            current_bid
        )));
    }

    Ok(amount)
}

/// Parse a JSON number or numeric string; non-finite values are rejected
fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Parse an ISO-8601 end time; naive timestamps are interpreted as UTC
fn parse_end_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn require_present_non_empty(payload: &Value, field: &str) -> Result<(), ApiError> {
    let value = payload
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ApiError::Validation(format!("Missing required field: {}", field)))?;

    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.trim().is_empty() {
        return Err(ApiError::Validation(format!(
            "Field cannot be empty: {}",
            field
        )));
    }

    Ok(())
}

fn require_text(payload: &Value, field: &str) -> Result<String, ApiError> {
    require_present_non_empty(payload, field)?;
    match &payload[field] {
        Value::String(s) => Ok(s.clone()),
        other => Ok(other.to_string()),
    }
}
