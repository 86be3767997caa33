//! Per-DAO token whitelists.
//!
//! Each DAO scope keeps its registrations by [`TokenId`] plus a secondary
//! index on `(issuer, symbol)`. DAO id 0 has no scope of its own: it is
//! served from the system-token whitelist injected at construction.

use std::collections::{BTreeMap, HashMap};

use daoreg_types::{
    AccountName, DaoId, DaoregError, ExtendedSymbol, Result, Symbol, TokenId, TokenRegistration,
    constants,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct DaoTokens {
    rows: BTreeMap<TokenId, TokenRegistration>,
    by_token: HashMap<ExtendedSymbol, TokenId>,
}

impl DaoTokens {
    /// Smallest positive id not in use.
    fn free_id(&self) -> TokenId {
        let mut candidate = constants::FIRST_TOKEN_ID;
        for id in self.rows.keys() {
            if id.0 != candidate {
                break;
            }
            candidate += 1;
        }
        TokenId(candidate)
    }

    fn by_symbol(&self, symbol: &Symbol) -> Option<&TokenRegistration> {
        self.rows.values().find(|row| &row.symbol == symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenRegistry {
    system_tokens: Vec<ExtendedSymbol>,
    scopes: HashMap<DaoId, DaoTokens>,
}

impl TokenRegistry {
    #[must_use]
    pub fn new(system_tokens: Vec<ExtendedSymbol>) -> Self {
        Self {
            system_tokens,
            scopes: HashMap::new(),
        }
    }

    /// The injected quote-token whitelist.
    #[must_use]
    pub fn system_tokens(&self) -> &[ExtendedSymbol] {
        &self.system_tokens
    }

    /// Whether `symbol` is a whitelisted system token.
    #[must_use]
    pub fn is_system_symbol(&self, symbol: &Symbol) -> bool {
        self.system_tokens.iter().any(|t| &t.symbol == symbol)
    }

    /// Register `(token_account, symbol)` in a DAO.
    ///
    /// # Errors
    /// - `InvalidArgument` for the system scope (whitelist is read-only)
    /// - `TokenAlreadyRegistered` if the DAO already has `symbol`, from any
    ///   issuer
    pub fn register(
        &mut self,
        dao_id: DaoId,
        token_account: &AccountName,
        symbol: &Symbol,
    ) -> Result<TokenRegistration> {
        if dao_id.is_system() {
            return Err(DaoregError::invalid(
                "system tokens are configured, not registered",
            ));
        }
        let scope = self.scopes.entry(dao_id).or_default();
        // Offers name their token by symbol alone, so one issuer per symbol.
        if let Some(existing) = scope.by_symbol(symbol) {
            return Err(DaoregError::TokenAlreadyRegistered(existing.token()));
        }
        let token = ExtendedSymbol::new(token_account.clone(), symbol.clone());

        let registration = TokenRegistration {
            token_id: scope.free_id(),
            token_account: token_account.clone(),
            symbol: symbol.clone(),
        };
        scope.by_token.insert(token, registration.token_id);
        scope
            .rows
            .insert(registration.token_id, registration.clone());

        tracing::debug!(%dao_id, token_id = %registration.token_id, %symbol, %token_account, "Token registered");
        Ok(registration)
    }

    /// Issuing account for `symbol` in a DAO, falling back to the system
    /// whitelist for DAO id 0.
    ///
    /// # Errors
    /// Returns `UnsupportedToken` if the symbol is known to neither.
    pub fn resolve(&self, dao_id: DaoId, symbol: &Symbol) -> Result<AccountName> {
        let found = if dao_id.is_system() {
            self.system_tokens
                .iter()
                .find(|t| &t.symbol == symbol)
                .map(|t| t.contract.clone())
        } else {
            self.scopes
                .get(&dao_id)
                .and_then(|scope| scope.by_symbol(symbol))
                .map(|row| row.token_account.clone())
        };
        found.ok_or_else(|| DaoregError::UnsupportedToken(format!("{symbol} in {dao_id}")))
    }

    /// Exact `(issuer, symbol)` membership check.
    #[must_use]
    pub fn exists(&self, dao_id: DaoId, token: &ExtendedSymbol) -> bool {
        if dao_id.is_system() {
            self.system_tokens.contains(token)
        } else {
            self.scopes
                .get(&dao_id)
                .is_some_and(|scope| scope.by_token.contains_key(token))
        }
    }

    /// Registration id of `symbol` in a DAO.
    ///
    /// # Errors
    /// Returns `TokenNotFound` if the DAO has not registered the symbol.
    pub fn token_index(&self, dao_id: DaoId, symbol: &Symbol) -> Result<TokenId> {
        self.scopes
            .get(&dao_id)
            .and_then(|scope| scope.by_symbol(symbol))
            .map(|row| row.token_id)
            .ok_or_else(|| DaoregError::TokenNotFound {
                dao_id,
                symbol: symbol.clone(),
            })
    }

    #[must_use]
    pub fn registration(&self, dao_id: DaoId, token_id: TokenId) -> Option<&TokenRegistration> {
        self.scopes.get(&dao_id).and_then(|scope| scope.rows.get(&token_id))
    }

    /// A DAO's registrations in id order.
    pub fn registrations(&self, dao_id: DaoId) -> impl Iterator<Item = &TokenRegistration> {
        self.scopes
            .get(&dao_id)
            .into_iter()
            .flat_map(|scope| scope.rows.values())
    }

    /// Drop a DAO's whole scope (organization deleted).
    pub fn remove_scope(&mut self, dao_id: DaoId) {
        self.scopes.remove(&dao_id);
    }

    /// Drop every DAO scope. The system whitelist is kept.
    pub fn clear(&mut self) {
        self.scopes.clear();
    }
}
