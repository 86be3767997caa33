//! Error types for the daoreg registry and exchange.
//!
//! All errors use the `DR_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Organization / authorization errors
//! - 2xx: Token registry errors
//! - 3xx: Balance ledger errors
//! - 4xx: Offer errors
//! - 5xx: Settlement errors
//! - 6xx: Host / dispatch errors
//! - 9xx: General / internal errors
//!
//! Every error aborts the whole call it was raised in; the registry rolls
//! back the transaction and nothing is retried.

use thiserror::Error;

use crate::{AccountName, Asset, DaoId, ExtendedSymbol, OfferId, Symbol};

/// Coarse classification of a [`DaoregError`], stable across codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    AlreadyExists,
    InsufficientBalance,
    UnsupportedToken,
    InvalidArgument,
    InvariantViolation,
    Dispatch,
    Internal,
}

/// Central error enum for all daoreg operations.
#[derive(Debug, Error)]
pub enum DaoregError {
    // =================================================================
    // Organization Errors (1xx)
    // =================================================================
    /// No organization with this id.
    #[error("DR_ERR_100: Organization not found: {0}")]
    OrganizationNotFound(DaoId),

    /// Organization names are unique registry-wide.
    #[error("DR_ERR_101: DAO with the same name already exists: {0}")]
    DuplicateOrganization(AccountName),

    /// The call was not signed by an account it needs.
    #[error("DR_ERR_102: Missing authority of {0}")]
    MissingAuthority(AccountName),

    /// A command argument failed validation.
    #[error("DR_ERR_103: Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // =================================================================
    // Token Registry Errors (2xx)
    // =================================================================
    /// The symbol is already registered in this DAO.
    #[error("DR_ERR_200: This token symbol is already added: {0}")]
    TokenAlreadyRegistered(ExtendedSymbol),

    /// The DAO has no registration for this symbol.
    #[error("DR_ERR_201: Token {symbol} not found in {dao_id}")]
    TokenNotFound { dao_id: DaoId, symbol: Symbol },

    /// The token is neither registered in the DAO nor a system token.
    #[error("DR_ERR_202: Unsupported token: {0}")]
    UnsupportedToken(String),

    // =================================================================
    // Balance Errors (3xx)
    // =================================================================
    /// Not enough available balance to perform the operation.
    #[error("DR_ERR_300: Insufficient available balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Asset, available: Asset },

    /// Not enough locked balance to unlock or settle.
    #[error("DR_ERR_301: Insufficient locked balance: need {needed}, have {locked}")]
    InsufficientLocked { needed: Asset, locked: Asset },

    /// Arithmetic between assets of different symbols.
    #[error("DR_ERR_302: Symbol mismatch: expected {expected}, got {actual}")]
    SymbolMismatch { expected: Symbol, actual: Symbol },

    /// A balance operation would overflow the amount type.
    #[error("DR_ERR_303: Balance overflow")]
    BalanceOverflow,

    // =================================================================
    // Offer Errors (4xx)
    // =================================================================
    /// The requested offer was not found in the DAO's book.
    #[error("DR_ERR_400: Offer {offer_id} not found in {dao_id}")]
    OfferNotFound { dao_id: DaoId, offer_id: OfferId },

    /// The offer is closed and can no longer be accepted or cancelled.
    #[error("DR_ERR_401: Offer is not active: {0}")]
    OfferNotActive(OfferId),

    /// An offer with this id already exists in the book.
    #[error("DR_ERR_402: Offer already exists: {0}")]
    DuplicateOffer(OfferId),

    /// An account tried to trade against its own offer.
    #[error("DR_ERR_403: Self-trade prevented: {account} owns {offer_id}")]
    SelfTrade {
        account: AccountName,
        offer_id: OfferId,
    },

    // =================================================================
    // Settlement Errors (5xx)
    // =================================================================
    /// Settlement of a fill failed.
    #[error("DR_ERR_500: Settlement failed: {reason}")]
    SettlementFailed { reason: String },

    /// Supply conservation invariant violated.
    #[error("DR_ERR_501: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Host Errors (6xx)
    // =================================================================
    /// An outbound action was rejected by the host.
    #[error("DR_ERR_600: Outbound action rejected: {reason}")]
    DispatchRejected { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("DR_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("DR_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("DR_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl DaoregError {
    /// Shorthand for [`DaoregError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// The coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OrganizationNotFound(_) | Self::OfferNotFound { .. } => ErrorKind::NotFound,
            Self::MissingAuthority(_) => ErrorKind::Unauthorized,
            Self::DuplicateOrganization(_)
            | Self::TokenAlreadyRegistered(_)
            | Self::DuplicateOffer(_) => ErrorKind::AlreadyExists,
            Self::InsufficientBalance { .. } | Self::InsufficientLocked { .. } => {
                ErrorKind::InsufficientBalance
            }
            Self::TokenNotFound { .. } | Self::UnsupportedToken(_) => ErrorKind::UnsupportedToken,
            Self::InvalidArgument { .. }
            | Self::SymbolMismatch { .. }
            | Self::BalanceOverflow
            | Self::OfferNotActive(_)
            | Self::SelfTrade { .. } => ErrorKind::InvalidArgument,
            Self::SupplyInvariantViolation { .. } => ErrorKind::InvariantViolation,
            Self::DispatchRejected { .. } => ErrorKind::Dispatch,
            Self::SettlementFailed { .. }
            | Self::Internal(_)
            | Self::Serialization(_)
            | Self::Configuration(_) => ErrorKind::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, DaoregError>;

impl From<serde_json::Error> for DaoregError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = DaoregError::OrganizationNotFound(DaoId(7));
        let msg = format!("{err}");
        assert!(msg.starts_with("DR_ERR_100"), "Got: {msg}");
        assert!(msg.contains("dao:7"));
    }

    #[test]
    fn insufficient_balance_display() {
        let err = DaoregError::InsufficientBalance {
            needed: "40.0000 FOO".parse().unwrap(),
            available: "10.0000 FOO".parse().unwrap(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("DR_ERR_300"));
        assert!(msg.contains("40.0000 FOO"));
        assert!(msg.contains("10.0000 FOO"));
    }

    #[test]
    fn missing_authority_names_account() {
        let err = DaoregError::MissingAuthority(AccountName::from("alice"));
        assert_eq!(format!("{err}"), "DR_ERR_102: Missing authority of alice");
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn kinds_group_related_errors() {
        assert_eq!(
            DaoregError::TokenNotFound {
                dao_id: DaoId(1),
                symbol: "4,FOO".parse().unwrap(),
            }
            .kind(),
            ErrorKind::UnsupportedToken
        );
        assert_eq!(DaoregError::invalid("qty").kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            DaoregError::OfferNotActive(OfferId(1)).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            DaoregError::DuplicateOrganization("alpha".into()).kind(),
            ErrorKind::AlreadyExists
        );
    }

    #[test]
    fn all_errors_have_dr_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(DaoregError::BalanceOverflow),
            Box::new(DaoregError::OfferNotActive(OfferId(3))),
            Box::new(DaoregError::Internal("test".into())),
            Box::new(DaoregError::DispatchRejected {
                reason: "nope".into(),
            }),
            Box::new(DaoregError::SupplyInvariantViolation {
                reason: "drift".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("DR_ERR_"),
                "Error missing DR_ERR_ prefix: {msg}"
            );
        }
    }
}
