//! # Account Balances
//!
//! A flat map from address to [`Amount`]. Accounts spring into existence
//! the first time something credits them and are never removed; reading an
//! unknown address yields zero rather than an error.
//!
//! ## State transition
//!
//! A transfer `sender -> recipient` for amount `A`:
//!
//! 1. Verify `balance[sender] >= A`.
//! 2. Verify `balance[recipient] + A` doesn't overflow.
//! 3. `balance[sender] -= A`
//! 4. `balance[recipient] += A`
//!
//! Both checks run before either write, so a failed transfer leaves the
//! sheet exactly as it found it.

use std::collections::HashMap;
use thiserror::Error;

use crate::transaction::Amount;

/// Why a balance mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// Sender can't cover the amount.
    #[error("insufficient balance")]
    Insufficient,
    /// Crediting would push the balance past [`Amount::MAX`].
    #[error("balance would exceed the maximum amount")]
    Overflow,
}

/// Per-account balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSheet {
    balances: HashMap<String, Amount>,
}

impl BalanceSheet {
    /// An empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `address`, zero if never referenced.
    pub fn get(&self, address: &str) -> Amount {
        self.balances.get(address).copied().unwrap_or(Amount::ZERO)
    }

    /// Add `amount` to `address`. Returns the new balance.
    pub fn credit(&mut self, address: &str, amount: Amount) -> Result<Amount, BalanceError> {
        let updated = self
            .get(address)
            .checked_add(amount)
            .ok_or(BalanceError::Overflow)?;
        self.balances.insert(address.to_string(), updated);
        Ok(updated)
    }

    /// Move `amount` from `sender` to `recipient`, all or nothing.
    ///
    /// A self-transfer passes the solvency check and changes nothing.
    pub fn transfer(&mut self, sender: &str, recipient: &str, amount: Amount) -> Result<(), BalanceError> {
        let debited = self
            .get(sender)
            .checked_sub(amount)
            .ok_or(BalanceError::Insufficient)?;
        if sender == recipient {
            return Ok(());
        }
        let credited = self
            .get(recipient)
            .checked_add(amount)
            .ok_or(BalanceError::Overflow)?;

        self.balances.insert(sender.to_string(), debited);
        self.balances.insert(recipient.to_string(), credited);
        Ok(())
    }

    /// Number of accounts that have ever been credited or debited.
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Returns `true` if no account has been touched yet.
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
