//! Escrow-create request validation.

use crate::error::ValidationErrors;
use crate::sanitize::sanitize_input;
use lgst_types::TokenAmount;
use serde::{Deserialize, Serialize};

/// An escrow-create request as submitted by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowCreateRequest {
    pub amount: String,
    pub booking_id: String,
    /// How long the escrow submission stays valid, in seconds.
    pub duration_secs: u64,
}

/// An escrow-create request that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedEscrowCreate {
    pub amount: TokenAmount,
    pub booking_id: String,
    pub duration_secs: u64,
}

/// Validate an escrow-create request: positive fixed-point amount, non-empty
/// booking id (after sanitization), non-zero duration.
pub fn validate_escrow_create(
    req: &EscrowCreateRequest,
) -> Result<ValidatedEscrowCreate, ValidationErrors> {
    let mut errors = Vec::new();

    let amount = match TokenAmount::parse(&req.amount) {
        Ok(a) if a.is_zero() => {
            errors.push("Amount must be greater than 0".to_string());
            None
        }
        Ok(a) => Some(a),
        Err(_) => {
            errors.push("Invalid amount format".to_string());
            None
        }
    };

    let booking_id = sanitize_input(&req.booking_id);
    if booking_id.is_empty() {
        errors.push("Booking id is required".to_string());
    }

    if req.duration_secs == 0 {
        errors.push("Escrow duration must be greater than 0".to_string());
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    Ok(ValidatedEscrowCreate {
        amount: amount.expect("amount present when no errors"),
        booking_id,
        duration_secs: req.duration_secs,
    })
}
