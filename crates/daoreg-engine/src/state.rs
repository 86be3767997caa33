//! The complete mutable state of a registry.
//!
//! Everything a call can touch lives in one value so that a transaction can
//! stage a copy and either swap it in or drop it.

use std::collections::{BTreeMap, HashMap};

use daoreg_book::OfferBook;
use daoreg_ledger::{BalanceLedger, TokenRegistry};
use daoreg_settlement::SupplyConservation;
use daoreg_types::{
    AccountName, DaoId, DaoregError, Organization, RegistryConfig, Result, Trade, constants,
};

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq)]
pub struct RegistryState {
    pub organizations: BTreeMap<DaoId, Organization>,
    /// Secondary index: organization name → id.
    pub names: HashMap<AccountName, DaoId>,
    pub next_dao_id: DaoId,
    pub tokens: TokenRegistry,
    pub books: BTreeMap<DaoId, OfferBook>,
    pub ledger: BalanceLedger,
    pub supply: SupplyConservation,
    pub settings: Settings,
    /// Settled fills in execution order.
    pub trades: Vec<Trade>,
}

impl RegistryState {
    #[must_use]
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            organizations: BTreeMap::new(),
            names: HashMap::new(),
            next_dao_id: DaoId(constants::FIRST_DAO_ID),
            tokens: TokenRegistry::new(config.system_tokens.clone()),
            books: BTreeMap::new(),
            ledger: BalanceLedger::new(),
            supply: SupplyConservation::new(),
            settings: Settings::new(),
            trades: Vec::new(),
        }
    }

    /// # Errors
    /// Returns `OrganizationNotFound` for unknown ids (including 0).
    pub fn organization(&self, dao_id: DaoId) -> Result<&Organization> {
        self.organizations
            .get(&dao_id)
            .ok_or(DaoregError::OrganizationNotFound(dao_id))
    }

    pub fn organization_mut(&mut self, dao_id: DaoId) -> Result<&mut Organization> {
        self.organizations
            .get_mut(&dao_id)
            .ok_or(DaoregError::OrganizationNotFound(dao_id))
    }

    pub fn book(&self, dao_id: DaoId) -> Result<&OfferBook> {
        self.books
            .get(&dao_id)
            .ok_or(DaoregError::OrganizationNotFound(dao_id))
    }

    /// Drop everything except the settings store.
    pub fn wipe(&mut self) {
        self.organizations.clear();
        self.names.clear();
        self.next_dao_id = DaoId(constants::FIRST_DAO_ID);
        self.tokens.clear();
        self.books.clear();
        self.ledger.clear();
        self.supply.clear();
        self.trades.clear();
    }
}
