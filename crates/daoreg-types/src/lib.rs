//! # daoreg-types
//!
//! Shared types, errors, and configuration for the **daoreg** registry and
//! its per-DAO exchange.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`DaoId`], [`OfferId`], [`TokenId`], [`BalanceId`], [`AccountName`], [`TradeId`]
//! - **Assets**: [`Symbol`], [`Asset`], [`ExtendedSymbol`]
//! - **Organization model**: [`Organization`], [`TokenRegistration`], [`VariantValue`]
//! - **Ledger model**: [`Balance`]
//! - **Offer model**: [`Offer`], [`OfferType`], [`OfferStatus`]
//! - **Trade model**: [`Trade`]
//! - **Outbound actions**: [`OutboundAction`], [`TransferNotice`]
//! - **Configuration**: [`RegistryConfig`]
//! - **Errors**: [`DaoregError`] with `DR_ERR_` prefix codes and [`ErrorKind`]
//! - **Constants**: system-wide identifiers and setting keys

pub mod action;
pub mod asset;
pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod offer;
pub mod organization;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use daoreg_types::{Asset, Offer, OfferType, DaoregError, ...};

pub use action::*;
pub use asset::*;
pub use balance::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use offer::*;
pub use organization::*;
pub use trade::*;

// Constants are accessed via `daoreg_types::constants::FOO`
// (not re-exported to avoid name collisions).
