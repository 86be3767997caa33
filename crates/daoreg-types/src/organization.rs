//! Organization records and token registrations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AccountName, Asset, DaoId, ExtendedSymbol, Symbol, TokenId};

/// A typed scalar stored in organization attributes and registry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum VariantValue {
    None,
    U64(u64),
    I64(i64),
    F64(f64),
    Name(AccountName),
    Asset(Asset),
    String(String),
}

impl VariantValue {
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            Self::I64(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_asset(&self) -> Option<&Asset> {
        match self {
            Self::Asset(a) => Some(a),
            _ => None,
        }
    }
}

/// A registered organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub dao_id: DaoId,
    /// Unique registry-wide; also the organization's own account.
    pub name: AccountName,
    pub creator: AccountName,
    /// Opaque metadata pointer.
    pub ipfs: String,
    pub attributes: BTreeMap<String, VariantValue>,
    /// Registered tokens in registration order.
    pub tokens: Vec<ExtendedSymbol>,
}

impl Organization {
    #[must_use]
    pub fn new(dao_id: DaoId, name: AccountName, creator: AccountName, ipfs: String) -> Self {
        Self {
            dao_id,
            name,
            creator,
            ipfs,
            attributes: BTreeMap::new(),
            tokens: Vec::new(),
        }
    }
}

/// A token registered in a DAO's scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRegistration {
    pub token_id: TokenId,
    pub token_account: AccountName,
    pub symbol: Symbol,
}

impl TokenRegistration {
    #[must_use]
    pub fn token(&self) -> ExtendedSymbol {
        ExtendedSymbol::new(self.token_account.clone(), self.symbol.clone())
    }
}
