//! # daoreg-ledger
//!
//! **Custody plane**: who holds what, and which tokens each DAO trades.
//!
//! ## Architecture
//!
//! 1. **BalanceLedger**: per-account rows of available/locked funds, one row
//!    per `(issuer, symbol)`
//! 2. **TokenRegistry**: per-DAO token whitelists plus the injected
//!    system-token whitelist served at DAO id 0
//!
//! ## Fund Flow
//!
//! ```text
//! deposit → credit() → available
//! offer   → lock()   → available → locked
//! fill    → unlock_and_transfer() → locked → counter-party available
//! cancel  → unlock() → locked → available
//! exit    → withdraw() → available → outbound transfer
//! ```
//!
//! Every mutation validates before it writes: an `Err` leaves the ledger
//! exactly as it was.

pub mod balance_ledger;
pub mod token_registry;

pub use balance_ledger::BalanceLedger;
pub use token_registry::TokenRegistry;
