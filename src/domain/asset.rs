use serde::{Deserialize, Serialize};

use super::{Principal, Record};
use crate::error::LedgerError;

/// A tokenized asset. Its whole supply is minted to the creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub asset_type: String,
    pub total_supply: i64,
}

impl Asset {
    pub fn new(name: impl Into<String>, asset_type: impl Into<String>, total_supply: i64) -> Self {
        Self {
            name: name.into(),
            asset_type: asset_type.into(),
            total_supply,
        }
    }
}

impl Record for Asset {
    const STORE: &'static str = "assets";
    const KIND: &'static str = "asset";
}

/// Balances of both parties after a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
    pub sender_balance: i64,
    pub recipient_balance: i64,
}

/// Checks that do not depend on balances.
pub fn validate_transfer(
    sender: &Principal,
    recipient: &Principal,
    amount: i64,
) -> Result<(), LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::invalid_argument(
            "transfer amount must be positive",
        ));
    }
    if sender == recipient {
        return Err(LedgerError::invalid_argument(
            "cannot transfer to the same owner",
        ));
    }
    Ok(())
}

/// Validate a transfer of `amount` and compute the resulting balances.
/// The sum of the two balances is the same before and after.
pub fn plan_transfer(
    sender: &Principal,
    recipient: &Principal,
    sender_balance: i64,
    recipient_balance: i64,
    amount: i64,
) -> Result<TransferPlan, LedgerError> {
    validate_transfer(sender, recipient, amount)?;
    if sender_balance < amount {
        return Err(LedgerError::InsufficientBalance {
            owner: sender.clone(),
            balance: sender_balance,
            required: amount,
        });
    }

    let recipient_balance = recipient_balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::invalid_argument("recipient balance would overflow"))?;

    Ok(TransferPlan {
        sender_balance: sender_balance - amount,
        recipient_balance,
    })
}

/// Sum balances, returning `None` on overflow.
pub fn total_held<'a>(balances: impl IntoIterator<Item = &'a i64>) -> Option<i64> {
    balances
        .into_iter()
        .try_fold(0i64, |total, amount| total.checked_add(*amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Principal {
        Principal::new("alice")
    }

    fn bob() -> Principal {
        Principal::new("bob")
    }

    #[test]
    fn test_plan_transfer_moves_amount() {
        let plan = plan_transfer(&alice(), &bob(), 1000, 0, 100).unwrap();
        assert_eq!(plan.sender_balance, 900);
        assert_eq!(plan.recipient_balance, 100);
    }

    #[test]
    fn test_plan_transfer_conserves_sum() {
        let plan = plan_transfer(&alice(), &bob(), 700, 300, 250).unwrap();
        assert_eq!(plan.sender_balance + plan.recipient_balance, 1000);
    }

    #[test]
    fn test_plan_transfer_whole_balance() {
        let plan = plan_transfer(&alice(), &bob(), 900, 100, 900).unwrap();
        assert_eq!(plan.sender_balance, 0);
        assert_eq!(plan.recipient_balance, 1000);
    }

    #[test]
    fn test_plan_transfer_insufficient_balance() {
        let err = plan_transfer(&alice(), &bob(), 900, 100, 901).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance {
                balance: 900,
                required: 901,
                ..
            }
        ));
    }

    #[test]
    fn test_plan_transfer_rejects_bad_arguments() {
        assert_eq!(plan_transfer(&alice(), &bob(), 10, 0, 0).unwrap_err().code(), 400);
        assert_eq!(plan_transfer(&alice(), &bob(), 10, 0, -5).unwrap_err().code(), 400);
        assert_eq!(plan_transfer(&alice(), &alice(), 10, 10, 5).unwrap_err().code(), 400);
    }

    #[test]
    fn test_total_held_detects_overflow() {
        assert_eq!(total_held(&[1, 2, 3]), Some(6));
        assert_eq!(total_held(&[i64::MAX, 1]), None);
    }
}
