//! Validation rules for tracker records
//!
//! Field-level checks (lengths, ranges) live on the backend input types via
//! `validator`; the cross-field and business rules live here so the web UI
//! can apply the same checks before submitting.

use chrono::NaiveDate;
use thiserror::Error;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_LOT_NUMBER_LEN: usize = 100;

/// A rule violation tied to the field that caused it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be greater than 0")]
    NotPositive { field: &'static str },

    #[error("{field} must be 0 or greater")]
    Negative { field: &'static str },

    #[error("Received date cannot be before the shipped date")]
    ReceivedBeforeShipped,

    #[error("From and To sites must be different")]
    SameSite,
}

impl ValidationIssue {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationIssue::Required { field }
            | ValidationIssue::TooLong { field, .. }
            | ValidationIssue::NotPositive { field }
            | ValidationIssue::Negative { field } => *field,
            ValidationIssue::ReceivedBeforeShipped => "received_date",
            ValidationIssue::SameSite => "to_site_id",
        }
    }
}

/// Validate a required display name (site, reagent, lot number)
pub fn validate_name(field: &'static str, value: &str, max: usize) -> Result<(), ValidationIssue> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationIssue::Required { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationIssue::TooLong { field, max });
    }
    Ok(())
}

/// Shipment and transfer quantities must be positive
pub fn validate_positive_quantity(field: &'static str, quantity: i64) -> Result<(), ValidationIssue> {
    if quantity <= 0 {
        return Err(ValidationIssue::NotPositive { field });
    }
    Ok(())
}

/// A stock count may be zero but never negative
pub fn validate_on_hand_quantity(quantity: i64) -> Result<(), ValidationIssue> {
    if quantity < 0 {
        return Err(ValidationIssue::Negative {
            field: "quantity_on_hand",
        });
    }
    Ok(())
}

pub fn validate_shipment_dates(
    shipped: NaiveDate,
    received: Option<NaiveDate>,
) -> Result<(), ValidationIssue> {
    match received {
        Some(received) if received < shipped => Err(ValidationIssue::ReceivedBeforeShipped),
        _ => Ok(()),
    }
}

pub fn validate_transfer_sites(from_site_id: i64, to_site_id: i64) -> Result<(), ValidationIssue> {
    if from_site_id == to_site_id {
        return Err(ValidationIssue::SameSite);
    }
    Ok(())
}

pub fn validate_recorded_by(recorded_by: &str) -> Result<(), ValidationIssue> {
    if recorded_by.trim().is_empty() {
        return Err(ValidationIssue::Required {
            field: "recorded_by",
        });
    }
    Ok(())
}
