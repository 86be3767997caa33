//! Registry configuration.
//!
//! The system-token whitelist is injected here rather than compiled in: it
//! is fixed for the lifetime of a registry instance and replaceable only by
//! constructing a new one.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{AccountName, DaoregError, ExtendedSymbol, Result, Symbol, constants};

/// Static configuration of one registry instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// The account the registry runs as. Receives deposits, sends
    /// withdrawals, and is the owner for administrative commands.
    pub registry_account: AccountName,
    /// Tokens usable at the synthetic DAO id 0 (quote tokens).
    pub system_tokens: Vec<ExtendedSymbol>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let symbol: Symbol = constants::DEFAULT_SYSTEM_TOKEN_SYMBOL
            .parse()
            .unwrap_or_else(|_| unreachable!("default system symbol is well formed"));
        Self {
            registry_account: AccountName::from(constants::DEFAULT_REGISTRY_ACCOUNT),
            system_tokens: vec![ExtendedSymbol::new(
                constants::DEFAULT_SYSTEM_TOKEN_CONTRACT,
                symbol,
            )],
        }
    }
}

impl RegistryConfig {
    /// Config with a custom registry account and system tokens.
    #[must_use]
    pub fn new(registry_account: impl Into<AccountName>, system_tokens: Vec<ExtendedSymbol>) -> Self {
        Self {
            registry_account: registry_account.into(),
            system_tokens,
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the registry cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.registry_account.is_empty() {
            return Err(DaoregError::Configuration(
                "registry_account must not be empty".to_string(),
            ));
        }
        if self.system_tokens.is_empty() {
            return Err(DaoregError::Configuration(
                "at least one system token is required".to_string(),
            ));
        }
        let mut codes = HashSet::new();
        for token in &self.system_tokens {
            if !codes.insert(token.symbol.code()) {
                return Err(DaoregError::Configuration(format!(
                    "system token code {} listed twice",
                    token.symbol.code()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::fixtures::token;

    #[test]
    fn default_config_is_valid() {
        let cfg = RegistryConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.registry_account.as_str(), "daoregistry");
        assert_eq!(cfg.system_tokens, vec![token("eosio.token", "4,TLOS")]);
    }

    #[test]
    fn from_json_str_parses_tokens() {
        let json = r#"{
            "registry_account": "registry",
            "system_tokens": [
                { "contract": "quote.tok", "symbol": "4,QUOTE" }
            ]
        }"#;
        let cfg = RegistryConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.registry_account.as_str(), "registry");
        assert_eq!(cfg.system_tokens, vec![token("quote.tok", "4,QUOTE")]);
    }

    #[test]
    fn duplicate_system_codes_rejected() {
        let cfg = RegistryConfig::new(
            "registry",
            vec![token("a.tok", "4,QUOTE"), token("b.tok", "2,QUOTE")],
        );
        assert!(matches!(cfg.validate(), Err(DaoregError::Configuration(_))));
    }

    #[test]
    fn empty_whitelist_rejected() {
        let json = r#"{ "registry_account": "registry", "system_tokens": [] }"#;
        assert!(RegistryConfig::from_json_str(json).is_err());
    }

    #[test]
    fn malformed_symbol_is_serialization_error() {
        let json = r#"{
            "registry_account": "registry",
            "system_tokens": [ { "contract": "q", "symbol": "QUOTE" } ]
        }"#;
        let err = RegistryConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, DaoregError::Serialization(_)));
    }
}
