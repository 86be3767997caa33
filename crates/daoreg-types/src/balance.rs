//! Custodial balance rows.
//!
//! Every account holds one row per `(issuer, symbol)` pair with an
//! `available` part (spendable, withdrawable) and a `locked` part
//! (reserved by the account's resting offers).

use serde::{Deserialize, Serialize};

use crate::{AccountName, Asset, BalanceId, DaoId, ExtendedSymbol, Result, Symbol};

/// A single balance row in an account's scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Balance {
    /// Row id, unique within the owning account.
    pub id: BalanceId,
    /// Spendable by new offers and withdrawals.
    pub available: Asset,
    /// Reserved by resting offers awaiting a counter-party.
    pub locked: Asset,
    /// DAO the row was first credited under (`0` for system tokens).
    pub dao_id: DaoId,
    /// Issuer of the token.
    pub token_account: AccountName,
}

impl Balance {
    /// Create an empty row for a token.
    #[must_use]
    pub fn new(id: BalanceId, dao_id: DaoId, token: &ExtendedSymbol) -> Self {
        Self {
            id,
            available: Asset::zero(token.symbol.clone()),
            locked: Asset::zero(token.symbol.clone()),
            dao_id,
            token_account: token.contract.clone(),
        }
    }

    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        self.available.symbol()
    }

    /// The `(issuer, symbol)` pair this row tracks.
    #[must_use]
    pub fn token(&self) -> ExtendedSymbol {
        ExtendedSymbol::new(self.token_account.clone(), self.symbol().clone())
    }

    /// Total balance (available + locked).
    pub fn total(&self) -> Result<Asset> {
        self.available.checked_add(&self.locked)
    }

    /// Whether this row holds nothing at all.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.available.is_zero() && self.locked.is_zero()
    }
}
