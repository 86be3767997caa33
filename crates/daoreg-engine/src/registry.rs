//! The registry: transactional command surface plus read-only queries.
//!
//! Every command runs as one transaction:
//!
//! ```text
//! clone state ─▶ handler ─▶ supply check ─▶ dispatch outbox ─▶ commit
//!                   │             │                 │
//!                   └─────────────┴────── Err ──────┴─▶ discard copy + outbox
//! ```

use daoreg_book::OfferBook;
use daoreg_types::*;

use crate::clock::{Clock, SystemClock};
use crate::context::Signers;
use crate::exchange::{self, OfferOutcome};
use crate::host::ActionDispatcher;
use crate::organizations;
use crate::settings::Setting;
use crate::state::RegistryState;
use crate::transaction::Transaction;

pub struct Registry<D: ActionDispatcher> {
    config: RegistryConfig,
    state: RegistryState,
    dispatcher: D,
    clock: Box<dyn Clock>,
}

impl<D: ActionDispatcher> Registry<D> {
    /// A fresh registry on the wall clock.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` fails validation.
    pub fn new(config: RegistryConfig, dispatcher: D) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            registry = %config.registry_account,
            system_tokens = config.system_tokens.len(),
            "Registry initialised"
        );
        Ok(Self {
            state: RegistryState::new(&config),
            config,
            dispatcher,
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn transact<T>(
        &mut self,
        command: &'static str,
        signers: &Signers,
        handler: impl FnOnce(&mut Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        // Rollback is dropping the copy; the clone and the supply scan in
        // `verify_ledger` are both linear in the registry's size.
        let mut tx = Transaction::new(self.state.clone(), &self.config, signers, self.clock.now());

        let checked = handler(&mut tx).and_then(|value| {
            tx.state.supply.verify_ledger(&tx.state.ledger)?;
            Ok(value)
        });
        let value = match checked {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(command, error = %err, "Transaction rolled back");
                return Err(err);
            }
        };

        let (staged, outbox) = tx.into_parts();
        if let Err(err) = self.dispatcher.dispatch(&outbox) {
            tracing::warn!(command, error = %err, actions = outbox.len(), "Dispatch failed, transaction rolled back");
            return Err(err);
        }
        self.state = staged;
        tracing::debug!(command, actions = outbox.len(), "Transaction committed");
        Ok(value)
    }

    // =================================================================
    // Organization commands
    // =================================================================

    pub fn create(
        &mut self,
        signers: &Signers,
        name: impl Into<AccountName>,
        creator: impl Into<AccountName>,
        ipfs: &str,
    ) -> Result<DaoId> {
        let (name, creator) = (name.into(), creator.into());
        self.transact("create", signers, |tx| {
            organizations::create(tx, &name, &creator, ipfs)
        })
    }

    pub fn update(&mut self, signers: &Signers, dao_id: DaoId, ipfs: &str) -> Result<()> {
        self.transact("update", signers, |tx| organizations::update(tx, dao_id, ipfs))
    }

    pub fn delorg(&mut self, signers: &Signers, dao_id: DaoId) -> Result<()> {
        self.transact("delorg", signers, |tx| organizations::delorg(tx, dao_id))
    }

    pub fn upsert_attrs(
        &mut self,
        signers: &Signers,
        dao_id: DaoId,
        attributes: Vec<(String, VariantValue)>,
    ) -> Result<()> {
        self.transact("upsertattrs", signers, |tx| {
            organizations::upsert_attrs(tx, dao_id, attributes)
        })
    }

    pub fn del_attrs(&mut self, signers: &Signers, dao_id: DaoId, keys: &[String]) -> Result<()> {
        self.transact("delattrs", signers, |tx| {
            organizations::del_attrs(tx, dao_id, keys)
        })
    }

    pub fn add_token(
        &mut self,
        signers: &Signers,
        dao_id: DaoId,
        token_account: impl Into<AccountName>,
        symbol: &Symbol,
    ) -> Result<TokenId> {
        let token_account = token_account.into();
        self.transact("addtoken", signers, |tx| {
            organizations::add_token(tx, dao_id, &token_account, symbol)
        })
    }

    pub fn set_param(
        &mut self,
        signers: &Signers,
        key: &str,
        value: VariantValue,
        description: &str,
    ) -> Result<()> {
        self.transact("setparam", signers, |tx| {
            organizations::set_param(tx, key, value, description)
        })
    }

    pub fn reset_settings(&mut self, signers: &Signers) -> Result<()> {
        self.transact("resetsttngs", signers, organizations::reset_settings)
    }

    pub fn reset(&mut self, signers: &Signers) -> Result<()> {
        self.transact("reset", signers, organizations::reset)
    }

    // =================================================================
    // Exchange commands
    // =================================================================

    /// Transfer notification from `token_contract`. A failure here fails
    /// the enclosing token transfer.
    pub fn on_transfer(
        &mut self,
        token_contract: impl Into<AccountName>,
        notice: &TransferNotice,
    ) -> Result<()> {
        let token_contract = token_contract.into();
        let signers = Signers::of([token_contract.clone()]);
        self.transact("transfer", &signers, |tx| {
            exchange::deposit(tx, &token_contract, notice)
        })
    }

    pub fn withdraw(
        &mut self,
        signers: &Signers,
        account: impl Into<AccountName>,
        token_account: impl Into<AccountName>,
        quantity: &Asset,
    ) -> Result<()> {
        let (account, token_account) = (account.into(), token_account.into());
        self.transact("withdraw", signers, |tx| {
            exchange::withdraw(tx, &account, &token_account, quantity)
        })
    }

    pub fn create_offer(
        &mut self,
        signers: &Signers,
        dao_id: DaoId,
        creator: impl Into<AccountName>,
        quantity: &Asset,
        price_per_unit: &Asset,
        offer_type: OfferType,
    ) -> Result<OfferOutcome> {
        let creator = creator.into();
        self.transact("createoffer", signers, |tx| {
            exchange::create_offer(tx, dao_id, &creator, quantity, price_per_unit, offer_type)
        })
    }

    pub fn remove_offer(&mut self, signers: &Signers, dao_id: DaoId, offer_id: OfferId) -> Result<()> {
        self.transact("removeoffer", signers, |tx| {
            exchange::remove_offer(tx, dao_id, offer_id)
        })
    }

    pub fn accept_offer(
        &mut self,
        signers: &Signers,
        dao_id: DaoId,
        account: impl Into<AccountName>,
        offer_id: OfferId,
    ) -> Result<Trade> {
        let account = account.into();
        self.transact("acceptoffer", signers, |tx| {
            exchange::accept_offer(tx, dao_id, &account, offer_id)
        })
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The committed state.
    #[must_use]
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    #[must_use]
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    #[must_use]
    pub fn organization(&self, dao_id: DaoId) -> Option<&Organization> {
        self.state.organizations.get(&dao_id)
    }

    #[must_use]
    pub fn organization_by_name(&self, name: &AccountName) -> Option<&Organization> {
        self.state
            .names
            .get(name)
            .and_then(|id| self.state.organizations.get(id))
    }

    #[must_use]
    pub fn book(&self, dao_id: DaoId) -> Option<&OfferBook> {
        self.state.books.get(&dao_id)
    }

    #[must_use]
    pub fn offer(&self, dao_id: DaoId, offer_id: OfferId) -> Option<&Offer> {
        self.book(dao_id).and_then(|book| book.get(offer_id))
    }

    /// All offers of a DAO in id order; empty for unknown DAOs.
    pub fn offers(&self, dao_id: DaoId) -> impl Iterator<Item = &Offer> {
        self.book(dao_id).into_iter().flat_map(|book| book.iter())
    }

    #[must_use]
    pub fn balance(&self, account: &AccountName, token: &ExtendedSymbol) -> Option<&Balance> {
        self.state.ledger.balance(account, token)
    }

    pub fn balances_of(&self, account: &AccountName) -> impl Iterator<Item = &Balance> {
        self.state.ledger.balances_of(account)
    }

    pub fn registrations(&self, dao_id: DaoId) -> impl Iterator<Item = &TokenRegistration> {
        self.state.tokens.registrations(dao_id)
    }

    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&Setting> {
        self.state.settings.setting(key)
    }

    #[must_use]
    pub fn trades(&self) -> &[Trade] {
        &self.state.trades
    }
}
