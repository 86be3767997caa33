//! Balance ledger for custodial funds.
//!
//! Tracks per-account rows with available/locked accounting. Each account
//! scope holds its rows by [`BalanceId`] plus a secondary index on
//! `(issuer, symbol)` so that a token never gets two rows.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use daoreg_types::{
    AccountName, Asset, Balance, BalanceId, DaoId, DaoregError, ExtendedSymbol, OutboundAction,
    Result, constants,
};
use rust_decimal::Decimal;

/// Rows owned by one account.
#[derive(Debug, Clone, Default, PartialEq)]
struct AccountBalances {
    rows: BTreeMap<BalanceId, Balance>,
    by_token: HashMap<ExtendedSymbol, BalanceId>,
}

impl AccountBalances {
    fn find(&self, token: &ExtendedSymbol) -> Option<&Balance> {
        self.by_token.get(token).and_then(|id| self.rows.get(id))
    }

    fn find_mut(&mut self, token: &ExtendedSymbol) -> Option<&mut Balance> {
        let id = self.by_token.get(token)?;
        self.rows.get_mut(id)
    }

    fn next_id(&self) -> BalanceId {
        self.rows
            .keys()
            .next_back()
            .map_or(BalanceId(0), |last| BalanceId(last.0 + 1))
    }

    /// Existing row for `token`, or a fresh zero row tagged with `dao_id`.
    fn upsert(&mut self, dao_id: DaoId, token: &ExtendedSymbol) -> &mut Balance {
        let fresh = self.next_id();
        let id = *self.by_token.entry(token.clone()).or_insert(fresh);
        self.rows
            .entry(id)
            .or_insert_with(|| Balance::new(id, dao_id, token))
    }
}

/// Custodial balances for every account.
///
/// The ledger is the source of truth for all balance state. The engine
/// calls into it to lock funds behind offers and to move them at
/// settlement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceLedger {
    accounts: HashMap<AccountName, AccountBalances>,
}

fn ensure_positive(amount: &Asset) -> Result<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(DaoregError::invalid(format!(
            "amount must be positive, got {amount}"
        )))
    }
}

impl BalanceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit available funds, creating the row if needed (deposit path).
    pub fn credit(
        &mut self,
        account: &AccountName,
        dao_id: DaoId,
        token_account: &AccountName,
        amount: &Asset,
    ) -> Result<()> {
        ensure_positive(amount)?;
        let token = ExtendedSymbol::new(token_account.clone(), amount.symbol().clone());
        let scope = self.accounts.entry(account.clone()).or_default();
        let row = scope.upsert(dao_id, &token);
        row.available = row.available.checked_add(amount)?;
        tracing::debug!(%account, %token, %amount, "Balance credited");
        Ok(())
    }

    /// Debit available funds.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if there is no row or available < amount.
    pub fn debit_available(
        &mut self,
        account: &AccountName,
        token_account: &AccountName,
        amount: &Asset,
    ) -> Result<()> {
        ensure_positive(amount)?;
        let row = self.row_with_available(account, token_account, amount)?;
        row.available = row.available.checked_sub(amount)?;
        Ok(())
    }

    /// Reserve funds behind an offer (available → locked).
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if available < amount.
    pub fn lock(
        &mut self,
        account: &AccountName,
        token_account: &AccountName,
        amount: &Asset,
    ) -> Result<()> {
        ensure_positive(amount)?;
        let row = self.row_with_available(account, token_account, amount)?;
        let available = row.available.checked_sub(amount)?;
        let locked = row.locked.checked_add(amount)?;
        row.available = available;
        row.locked = locked;
        Ok(())
    }

    /// Release a reservation (locked → available). Used on cancellation.
    ///
    /// # Errors
    /// Returns `InsufficientLocked` if locked < amount.
    pub fn unlock(
        &mut self,
        account: &AccountName,
        token_account: &AccountName,
        amount: &Asset,
    ) -> Result<()> {
        ensure_positive(amount)?;
        let row = self.row_with_locked(account, token_account, amount)?;
        let locked = row.locked.checked_sub(amount)?;
        let available = row.available.checked_add(amount)?;
        row.locked = locked;
        row.available = available;
        Ok(())
    }

    /// Settlement primitive: `from.locked -= amount`, `to.available += amount`.
    ///
    /// The receiving row is created under `dao_id` if `to` has none.
    ///
    /// # Errors
    /// Returns `InsufficientLocked` if `from` has not reserved `amount`.
    pub fn unlock_and_transfer(
        &mut self,
        from: &AccountName,
        to: &AccountName,
        dao_id: DaoId,
        token_account: &AccountName,
        amount: &Asset,
    ) -> Result<()> {
        ensure_positive(amount)?;
        // Validate the receiving side before touching the sender.
        let token = ExtendedSymbol::new(token_account.clone(), amount.symbol().clone());
        if let Some(row) = self.balance(to, &token) {
            row.available.checked_add(amount)?;
        }

        let sender = self.row_with_locked(from, token_account, amount)?;
        sender.locked = sender.locked.checked_sub(amount)?;

        let receiver = self.accounts.entry(to.clone()).or_default().upsert(dao_id, &token);
        receiver.available = receiver.available.checked_add(amount)?;
        Ok(())
    }

    /// Debit available funds and produce the outbound transfer that pays
    /// them out. The debit is only final if the caller commits.
    pub fn withdraw(
        &mut self,
        registry: &AccountName,
        account: &AccountName,
        token_account: &AccountName,
        amount: &Asset,
    ) -> Result<OutboundAction> {
        self.debit_available(account, token_account, amount)?;
        Ok(OutboundAction::Transfer {
            contract: token_account.clone(),
            from: registry.clone(),
            to: account.clone(),
            quantity: amount.clone(),
            memo: constants::WITHDRAW_MEMO.to_string(),
        })
    }

    // =================================================================
    // Queries
    // =================================================================

    /// The row for `(account, token)`, if any.
    #[must_use]
    pub fn balance(&self, account: &AccountName, token: &ExtendedSymbol) -> Option<&Balance> {
        self.accounts.get(account).and_then(|scope| scope.find(token))
    }

    /// Available amount, zero if the row does not exist.
    #[must_use]
    pub fn available(&self, account: &AccountName, token: &ExtendedSymbol) -> Asset {
        self.balance(account, token)
            .map_or_else(|| Asset::zero(token.symbol.clone()), |row| row.available.clone())
    }

    /// Locked amount, zero if the row does not exist.
    #[must_use]
    pub fn locked(&self, account: &AccountName, token: &ExtendedSymbol) -> Asset {
        self.balance(account, token)
            .map_or_else(|| Asset::zero(token.symbol.clone()), |row| row.locked.clone())
    }

    /// All rows of one account in id order.
    pub fn balances_of(&self, account: &AccountName) -> impl Iterator<Item = &Balance> {
        self.accounts
            .get(account)
            .into_iter()
            .flat_map(|scope| scope.rows.values())
    }

    /// Every `(account, row)` in the ledger.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountName, &Balance)> {
        self.accounts
            .iter()
            .flat_map(|(account, scope)| scope.rows.values().map(move |row| (account, row)))
    }

    /// Every token that has at least one row.
    #[must_use]
    pub fn tokens(&self) -> BTreeSet<ExtendedSymbol> {
        self.iter().map(|(_, row)| row.token()).collect()
    }

    /// Total supply of a token held in custody (sum of available + locked).
    ///
    /// # Errors
    /// Returns `BalanceOverflow` if the sum leaves the `Decimal` range.
    pub fn total_supply(&self, token: &ExtendedSymbol) -> Result<Decimal> {
        self.iter()
            .filter(|(_, row)| row.token_account == token.contract && row.symbol() == &token.symbol)
            .try_fold(Decimal::ZERO, |total, (_, row)| {
                total
                    .checked_add(row.available.amount())
                    .and_then(|t| t.checked_add(row.locked.amount()))
                    .ok_or(DaoregError::BalanceOverflow)
            })
    }

    /// Number of accounts with at least one row.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Drop every row (registry reset).
    pub fn clear(&mut self) {
        self.accounts.clear();
    }

    // =================================================================
    // Internals
    // =================================================================

    fn row_with_available(
        &mut self,
        account: &AccountName,
        token_account: &AccountName,
        amount: &Asset,
    ) -> Result<&mut Balance> {
        let token = ExtendedSymbol::new(token_account.clone(), amount.symbol().clone());
        let row = self
            .accounts
            .get_mut(account)
            .and_then(|scope| scope.find_mut(&token))
            .ok_or_else(|| DaoregError::InsufficientBalance {
                needed: amount.clone(),
                available: Asset::zero(amount.symbol().clone()),
            })?;
        if !row.available.covers(amount)? {
            return Err(DaoregError::InsufficientBalance {
                needed: amount.clone(),
                available: row.available.clone(),
            });
        }
        Ok(row)
    }

    fn row_with_locked(
        &mut self,
        account: &AccountName,
        token_account: &AccountName,
        amount: &Asset,
    ) -> Result<&mut Balance> {
        let token = ExtendedSymbol::new(token_account.clone(), amount.symbol().clone());
        let row = self
            .accounts
            .get_mut(account)
            .and_then(|scope| scope.find_mut(&token))
            .ok_or_else(|| DaoregError::InsufficientLocked {
                needed: amount.clone(),
                locked: Asset::zero(amount.symbol().clone()),
            })?;
        if !row.locked.covers(amount)? {
            return Err(DaoregError::InsufficientLocked {
                needed: amount.clone(),
                locked: row.locked.clone(),
            });
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use daoreg_types::asset::fixtures::{asset, token};

    use super::*;

    fn acct(name: &str) -> AccountName {
        AccountName::from(name)
    }

    fn funded(amount: &str) -> (BalanceLedger, AccountName, AccountName) {
        let mut ledger = BalanceLedger::new();
        let alice = acct("alice");
        let tok1 = acct("tok1");
        ledger.credit(&alice, DaoId(1), &tok1, &asset(amount)).unwrap();
        (ledger, alice, tok1)
    }

    #[test]
    fn credit_creates_row_then_adds() {
        let (mut ledger, alice, tok1) = funded("100.0000 FOO");
        let foo = token("tok1", "4,FOO");
        let row = ledger.balance(&alice, &foo).unwrap();
        assert_eq!(row.available, asset("100.0000 FOO"));
        assert_eq!(row.locked, asset("0.0000 FOO"));
        assert_eq!(row.dao_id, DaoId(1));
        assert_eq!(row.id, BalanceId(0));

        ledger.credit(&alice, DaoId(2), &tok1, &asset("5.0000 FOO")).unwrap();
        let row = ledger.balance(&alice, &foo).unwrap();
        assert_eq!(row.available, asset("105.0000 FOO"));
        // The row keeps its original DAO back-reference.
        assert_eq!(row.dao_id, DaoId(1));
        assert_eq!(ledger.balances_of(&alice).count(), 1);
    }

    #[test]
    fn same_symbol_from_two_issuers_gets_two_rows() {
        let (mut ledger, alice, _) = funded("1.0000 FOO");
        ledger
            .credit(&alice, DaoId(1), &acct("tok2"), &asset("2.0000 FOO"))
            .unwrap();
        let ids: Vec<BalanceId> = ledger.balances_of(&alice).map(|b| b.id).collect();
        assert_eq!(ids, vec![BalanceId(0), BalanceId(1)]);
        assert_eq!(ledger.tokens().len(), 2);
    }

    #[test]
    fn credit_rejects_non_positive() {
        let mut ledger = BalanceLedger::new();
        let err = ledger
            .credit(&acct("alice"), DaoId(1), &acct("tok1"), &asset("0.0000 FOO"))
            .unwrap_err();
        assert!(matches!(err, DaoregError::InvalidArgument { .. }));
        assert_eq!(ledger.account_count(), 0);
    }

    #[test]
    fn debit_available_insufficient_leaves_row_unchanged() {
        let (mut ledger, alice, tok1) = funded("10.0000 FOO");
        let err = ledger
            .debit_available(&alice, &tok1, &asset("10.0001 FOO"))
            .unwrap_err();
        assert!(matches!(err, DaoregError::InsufficientBalance { .. }));
        assert_eq!(
            ledger.available(&alice, &token("tok1", "4,FOO")),
            asset("10.0000 FOO")
        );
    }

    #[test]
    fn debit_without_row_is_insufficient_balance() {
        let mut ledger = BalanceLedger::new();
        let err = ledger
            .debit_available(&acct("bob"), &acct("tok1"), &asset("1.0000 FOO"))
            .unwrap_err();
        assert!(matches!(err, DaoregError::InsufficientBalance { .. }));
    }

    #[test]
    fn lock_and_unlock() {
        let (mut ledger, alice, tok1) = funded("100.0000 FOO");
        let foo = token("tok1", "4,FOO");
        ledger.lock(&alice, &tok1, &asset("40.0000 FOO")).unwrap();
        assert_eq!(ledger.available(&alice, &foo), asset("60.0000 FOO"));
        assert_eq!(ledger.locked(&alice, &foo), asset("40.0000 FOO"));

        let err = ledger.lock(&alice, &tok1, &asset("60.0001 FOO")).unwrap_err();
        assert!(matches!(err, DaoregError::InsufficientBalance { .. }));

        ledger.unlock(&alice, &tok1, &asset("40.0000 FOO")).unwrap();
        assert_eq!(ledger.available(&alice, &foo), asset("100.0000 FOO"));
        assert_eq!(ledger.locked(&alice, &foo), asset("0.0000 FOO"));

        let err = ledger.unlock(&alice, &tok1, &asset("0.0001 FOO")).unwrap_err();
        assert!(matches!(err, DaoregError::InsufficientLocked { .. }));
    }

    #[test]
    fn symbol_mismatch_is_rejected() {
        let (mut ledger, alice, tok1) = funded("100.0000 FOO");
        // Same code at another precision is a different token: no row.
        let err = ledger.lock(&alice, &tok1, &asset("1.00 FOO")).unwrap_err();
        assert!(matches!(err, DaoregError::InsufficientBalance { .. }));
    }

    #[test]
    fn unlock_and_transfer_moves_locked_to_counterparty() {
        let (mut ledger, alice, tok1) = funded("100.0000 FOO");
        let bob = acct("bob");
        let foo = token("tok1", "4,FOO");
        ledger.lock(&alice, &tok1, &asset("40.0000 FOO")).unwrap();
        ledger
            .unlock_and_transfer(&alice, &bob, DaoId(1), &tok1, &asset("40.0000 FOO"))
            .unwrap();

        assert_eq!(ledger.locked(&alice, &foo), asset("0.0000 FOO"));
        assert_eq!(ledger.available(&alice, &foo), asset("60.0000 FOO"));
        assert_eq!(ledger.available(&bob, &foo), asset("40.0000 FOO"));
        assert_eq!(ledger.balance(&bob, &foo).unwrap().dao_id, DaoId(1));
        assert_eq!(ledger.total_supply(&foo).unwrap(), Decimal::new(100, 0));
    }

    #[test]
    fn unlock_and_transfer_requires_locked_funds() {
        let (mut ledger, alice, tok1) = funded("100.0000 FOO");
        let bob = acct("bob");
        let err = ledger
            .unlock_and_transfer(&alice, &bob, DaoId(1), &tok1, &asset("1.0000 FOO"))
            .unwrap_err();
        assert!(matches!(err, DaoregError::InsufficientLocked { .. }));
        assert!(ledger.balance(&bob, &token("tok1", "4,FOO")).is_none());
    }

    #[test]
    fn withdraw_debits_and_emits_transfer() {
        let (mut ledger, alice, tok1) = funded("10.0000 FOO");
        let action = ledger
            .withdraw(&acct("daoregistry"), &alice, &tok1, &asset("4.0000 FOO"))
            .unwrap();
        assert_eq!(
            ledger.available(&alice, &token("tok1", "4,FOO")),
            asset("6.0000 FOO")
        );
        match action {
            OutboundAction::Transfer {
                contract,
                from,
                to,
                quantity,
                ..
            } => {
                assert_eq!(contract, tok1);
                assert_eq!(from.as_str(), "daoregistry");
                assert_eq!(to, alice);
                assert_eq!(quantity, asset("4.0000 FOO"));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn total_supply_sums_all_accounts() {
        let (mut ledger, alice, tok1) = funded("100.0000 FOO");
        ledger
            .credit(&acct("bob"), DaoId(1), &tok1, &asset("50.0000 FOO"))
            .unwrap();
        ledger.lock(&alice, &tok1, &asset("30.0000 FOO")).unwrap();
        assert_eq!(
            ledger.total_supply(&token("tok1", "4,FOO")).unwrap(),
            Decimal::new(150, 0)
        );
    }

    #[test]
    fn total_supply_overflow_is_an_error() {
        let mut ledger = BalanceLedger::new();
        let big = acct("big.tok");
        let half = asset("50000000000000000000000000000 BIG");
        ledger.credit(&acct("alice"), DaoId(1), &big, &half).unwrap();
        ledger.credit(&acct("bob"), DaoId(1), &big, &half).unwrap();
        let err = ledger.total_supply(&token("big.tok", "0,BIG")).unwrap_err();
        assert!(matches!(err, DaoregError::BalanceOverflow));
    }

    #[test]
    fn nonexistent_balance_is_zero() {
        let ledger = BalanceLedger::new();
        let foo = token("tok1", "4,FOO");
        assert!(ledger.balance(&acct("nobody"), &foo).is_none());
        assert!(ledger.available(&acct("nobody"), &foo).is_zero());
    }
}
