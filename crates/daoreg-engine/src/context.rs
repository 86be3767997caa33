//! Authorization context of a call.

use std::collections::BTreeSet;

use daoreg_types::{AccountName, DaoregError, Result};

/// The accounts that signed the current call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signers(BTreeSet<AccountName>);

impl Signers {
    /// Signed by exactly these accounts.
    pub fn of<I, A>(accounts: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AccountName>,
    {
        Self(accounts.into_iter().map(Into::into).collect())
    }

    /// An unsigned call.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has(&self, account: &AccountName) -> bool {
        self.0.contains(account)
    }

    /// # Errors
    /// Returns `MissingAuthority` naming `account` if it did not sign.
    pub fn require(&self, account: &AccountName) -> Result<()> {
        if self.has(account) {
            Ok(())
        } else {
            Err(DaoregError::MissingAuthority(account.clone()))
        }
    }
}
