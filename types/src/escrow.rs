//! Escrow entries: funds held at a dedicated identity pending release.

use crate::{Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of an escrow entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscrowStatus {
    Active,
    Released,
    Expired,
    Refunded,
}

/// Attempted an escrow status change outside ACTIVE → {RELEASED, EXPIRED, REFUNDED}.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid escrow transition: {from:?} -> {to:?}")]
pub struct EscrowTransitionError {
    pub from: EscrowStatus,
    pub to: EscrowStatus,
}

/// Funds held in escrow for a booking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowBalance {
    /// Transaction hash of the escrow-create payment.
    pub id: String,
    pub booking_id: String,
    pub amount: TokenAmount,
    pub created_at: Timestamp,
    /// Advisory expiry; the ledger's transaction time bound is authoritative.
    pub expires_at: Timestamp,
    pub status: EscrowStatus,
}

impl EscrowBalance {
    /// Move to `next`, enforcing that only `Active` entries may transition
    /// and only into a terminal state.
    pub fn transition(&mut self, next: EscrowStatus) -> Result<(), EscrowTransitionError> {
        let valid = self.status == EscrowStatus::Active
            && matches!(
                next,
                EscrowStatus::Released | EscrowStatus::Expired | EscrowStatus::Refunded
            );
        if !valid {
            return Err(EscrowTransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_escrow() -> EscrowBalance {
        EscrowBalance {
            id: "esc1".into(),
            booking_id: "booking-42".into(),
            amount: TokenAmount::parse("25").unwrap(),
            created_at: Timestamp::new(1_000),
            expires_at: Timestamp::new(2_000),
            status: EscrowStatus::Active,
        }
    }

    #[test]
    fn active_reaches_each_terminal_state() {
        for next in [
            EscrowStatus::Released,
            EscrowStatus::Expired,
            EscrowStatus::Refunded,
        ] {
            let mut e = active_escrow();
            e.transition(next).unwrap();
            assert_eq!(e.status, next);
        }
    }

    #[test]
    fn terminal_states_are_final() {
        let mut e = active_escrow();
        e.transition(EscrowStatus::Released).unwrap();
        let err = e.transition(EscrowStatus::Refunded).unwrap_err();
        assert_eq!(err.from, EscrowStatus::Released);
        assert_eq!(e.status, EscrowStatus::Released);
    }

    #[test]
    fn active_to_active_rejected() {
        let mut e = active_escrow();
        assert!(e.transition(EscrowStatus::Active).is_err());
    }

    #[test]
    fn wire_fields_are_camel_case() {
        let json = serde_json::to_value(active_escrow()).unwrap();
        assert_eq!(json["bookingId"], "booking-42");
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "ACTIVE");
    }
}
