//! Transfer request validation.

use crate::error::ValidationErrors;
use crate::sanitize::sanitize_input;
use lgst_types::{AccountId, TokenAmount};
use serde::{Deserialize, Serialize};

/// A transfer request as submitted by the caller: raw strings, unchecked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub to: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// A transfer request that passed validation: typed and sanitized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub to: AccountId,
    pub amount: TokenAmount,
    pub memo: Option<String>,
}

/// Validate a transfer request.
///
/// Checks the destination's shape (56 uppercase-alphanumeric characters;
/// checksum verification is the ledger client's job), parses the amount into
/// its fixed-point form, requires it strictly positive, and sanitizes the
/// memo. Failures accumulate; the error list is never empty on `Err`.
pub fn validate_transfer(req: &TransferRequest) -> Result<ValidatedTransfer, ValidationErrors> {
    let mut errors = Vec::new();

    let to = AccountId::new(req.to.clone());
    if req.to.len() != 56 {
        errors.push("Invalid wallet address length".to_string());
    } else if !to.is_wellformed() {
        errors.push("Invalid wallet address format".to_string());
    }

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

    let memo = req.memo.as_deref().map(sanitize_input);

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    Ok(ValidatedTransfer {
        to,
        amount: amount.expect("amount present when no errors"),
        memo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_address() -> String {
        "G".to_string() + &"A7B2".repeat(13) + "XYZ"
    }

    #[test]
    fn wellformed_request_passes() {
        let addr = valid_address();
        assert_eq!(addr.len(), 56);
        let req = TransferRequest {
            to: addr.clone(),
            amount: "10.5".into(),
            memo: Some("rent".into()),
        };
        let validated = validate_transfer(&req).unwrap();
        assert_eq!(validated.to.as_str(), addr);
        assert_eq!(validated.amount, TokenAmount::parse("10.5").unwrap());
        assert_eq!(validated.memo.as_deref(), Some("rent"));
    }

    #[test]
    fn short_address_rejected() {
        let req = TransferRequest {
            to: "GABC".into(),
            amount: "1".into(),
            memo: None,
        };
        let errors = validate_transfer(&req).unwrap_err();
        assert_eq!(errors.messages(), ["Invalid wallet address length"]);
    }

    #[test]
    fn lowercase_address_rejected() {
        let req = TransferRequest {
            to: valid_address().to_lowercase(),
            amount: "1".into(),
            memo: None,
        };
        let errors = validate_transfer(&req).unwrap_err();
        assert_eq!(errors.messages(), ["Invalid wallet address format"]);
    }

    #[test]
    fn negative_amount_rejected() {
        let req = TransferRequest {
            to: valid_address(),
            amount: "-5".into(),
            memo: None,
        };
        let errors = validate_transfer(&req).unwrap_err();
        assert_eq!(errors.messages(), ["Invalid amount format"]);
    }

    #[test]
    fn zero_amount_rejected() {
        let req = TransferRequest {
            to: valid_address(),
            amount: "0".into(),
            memo: None,
        };
        let errors = validate_transfer(&req).unwrap_err();
        assert_eq!(errors.messages(), ["Amount must be greater than 0"]);
    }

    #[test]
    fn eight_decimals_rejected() {
        let req = TransferRequest {
            to: valid_address(),
            amount: "1.00000001".into(),
            memo: None,
        };
        assert!(validate_transfer(&req).is_err());
    }

    #[test]
    fn errors_accumulate() {
        let req = TransferRequest {
            to: "bad".into(),
            amount: "oops".into(),
            memo: None,
        };
        let errors = validate_transfer(&req).unwrap_err();
        assert_eq!(errors.messages().len(), 2);
    }

    #[test]
    fn memo_is_sanitized() {
        let req = TransferRequest {
            to: valid_address(),
            amount: "1".into(),
            memo: Some("  <b>rent</b> & utilities ".into()),
        };
        let validated = validate_transfer(&req).unwrap();
        assert_eq!(validated.memo.as_deref(), Some("brent&#x2F;b &amp; utilities"));
    }

    proptest! {
        /// Any positive in-range amount with a well-shaped address validates.
        #[test]
        fn positive_amounts_pass(whole in 1u64..1_000_000u64, frac in 0u64..10_000_000u64) {
            let req = TransferRequest {
                to: valid_address(),
                amount: format!("{whole}.{frac:07}"),
                memo: None,
            };
            prop_assert!(validate_transfer(&req).is_ok());
        }

        /// Any non-56-char address fails with a non-empty error list.
        #[test]
        fn bad_addresses_fail(to in "[A-Z0-9]{1,55}") {
            let req = TransferRequest { to, amount: "1".into(), memo: None };
            let errors = validate_transfer(&req).unwrap_err();
            prop_assert!(!errors.is_empty());
        }
    }
}
