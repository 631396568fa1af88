//! Room field rules shared by the create and update flows.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_LOCATION_LENGTH: usize = 200;
pub const MIN_CAPACITY: i32 = 1;
pub const MAX_CAPACITY: i32 = 1000;

// ---------------------------------------------------------------------------
// Field validators
// ---------------------------------------------------------------------------

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(CoreError::Validation("Room name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Room name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Room description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_location(location: &str) -> Result<(), CoreError> {
    if location.chars().count() > MAX_LOCATION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Room location must be at most {MAX_LOCATION_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_capacity(capacity: i32) -> Result<(), CoreError> {
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
        return Err(CoreError::Validation(format!(
            "Room capacity must be between {MIN_CAPACITY} and {MAX_CAPACITY} (got {capacity})"
        )));
    }
    Ok(())
}

pub fn validate_price_per_hour(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::Validation(
            "Room price per hour must be a non-negative number".into(),
        ));
    }
    Ok(())
}

/// Validate whichever room fields are present. Used as-is for updates; the
/// create path passes `Some` for the required name and capacity.
pub fn validate_room_fields(
    name: Option<&str>,
    description: Option<&str>,
    location: Option<&str>,
    capacity: Option<i32>,
    price_per_hour: Option<f64>,
) -> Result<(), CoreError> {
    if let Some(name) = name {
        validate_name(name)?;
    }
    if let Some(description) = description {
        validate_description(description)?;
    }
    if let Some(location) = location {
        validate_location(location)?;
    }
    if let Some(capacity) = capacity {
        validate_capacity(capacity)?;
    }
    if let Some(price) = price_per_hour {
        validate_price_per_hour(price)?;
    }
    Ok(())
}
