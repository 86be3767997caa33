//! Supply conservation invariant checker.
//!
//! Enforced before every commit:
//! ```text
//! ∀ token: Σ(available + locked) == Σ(deposits) - Σ(withdrawals)
//! ```
//!
//! Settlement, locking and cancellation only move value between rows. If
//! custody ever drifts from the deposit/withdraw history, the transaction
//! is rejected.

use std::collections::{BTreeSet, HashMap};

use daoreg_ledger::BalanceLedger;
use daoreg_types::{DaoregError, ExtendedSymbol, Result};
use rust_decimal::Decimal;

/// Per-token deposit and withdrawal totals since genesis (or last reset).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplyConservation {
    deposits: HashMap<ExtendedSymbol, Decimal>,
    withdrawals: HashMap<ExtendedSymbol, Decimal>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns `BalanceOverflow` if the running total leaves the `Decimal`
    /// range.
    pub fn record_deposit(&mut self, token: &ExtendedSymbol, amount: Decimal) -> Result<()> {
        accumulate(&mut self.deposits, token, amount)
    }

    pub fn record_withdrawal(&mut self, token: &ExtendedSymbol, amount: Decimal) -> Result<()> {
        accumulate(&mut self.withdrawals, token, amount)
    }

    #[must_use]
    pub fn total_deposits(&self, token: &ExtendedSymbol) -> Decimal {
        self.deposits.get(token).copied().unwrap_or(Decimal::ZERO)
    }

    #[must_use]
    pub fn total_withdrawals(&self, token: &ExtendedSymbol) -> Decimal {
        self.withdrawals.get(token).copied().unwrap_or(Decimal::ZERO)
    }

    /// Expected custody for a token: deposits - withdrawals.
    #[must_use]
    pub fn expected_supply(&self, token: &ExtendedSymbol) -> Decimal {
        self.total_deposits(token) - self.total_withdrawals(token)
    }

    /// Every token with deposit or withdrawal history.
    #[must_use]
    pub fn tracked_tokens(&self) -> BTreeSet<ExtendedSymbol> {
        self.deposits
            .keys()
            .chain(self.withdrawals.keys())
            .cloned()
            .collect()
    }

    /// Compare one token's actual custody against its history.
    ///
    /// # Errors
    /// Returns [`DaoregError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, token: &ExtendedSymbol, actual_supply: Decimal) -> Result<()> {
        let expected = self.expected_supply(token);
        if actual_supply != expected {
            tracing::error!(%token, %actual_supply, %expected, "Supply invariant violated");
            return Err(DaoregError::SupplyInvariantViolation {
                reason: format!(
                    "Token {token}: actual supply {actual_supply} != expected {expected} \
                     (deposits={}, withdrawals={})",
                    self.total_deposits(token),
                    self.total_withdrawals(token),
                ),
            });
        }
        Ok(())
    }

    /// Verify every token that is either tracked or held in the ledger.
    pub fn verify_ledger(&self, ledger: &BalanceLedger) -> Result<()> {
        let mut tokens = self.tracked_tokens();
        tokens.extend(ledger.tokens());
        for token in &tokens {
            self.verify(token, ledger.total_supply(token)?)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.deposits.clear();
        self.withdrawals.clear();
    }
}

fn accumulate(
    totals: &mut HashMap<ExtendedSymbol, Decimal>,
    token: &ExtendedSymbol,
    amount: Decimal,
) -> Result<()> {
    let total = totals.entry(token.clone()).or_insert(Decimal::ZERO);
    *total = total
        .checked_add(amount)
        .ok_or(DaoregError::BalanceOverflow)?;
    Ok(())
}
