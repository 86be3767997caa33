//! # daoreg-engine
//!
//! Command surface of the **daoreg** multi-tenant DAO registry.
//!
//! - [`Registry`]: runs every command as an all-or-nothing transaction
//! - [`exchange`]: deposits, withdrawals, offer creation/matching/cancel/accept
//! - [`organizations`]: DAO lifecycle, attributes, tokens, settings, reset
//! - [`ActionDispatcher`]: where outbound transfers and provisioning go
//! - [`Clock`]: time source for offers and trades
//!
//! ## Example
//!
//! ```
//! use daoreg_engine::{RecordingDispatcher, Registry, Signers};
//! use daoreg_types::RegistryConfig;
//!
//! let mut registry = Registry::new(RegistryConfig::default(), RecordingDispatcher::new()).unwrap();
//! let dao = registry
//!     .create(&Signers::of(["alice"]), "alpha", "alice", "Qm...")
//!     .unwrap();
//! assert_eq!(registry.organization(dao).unwrap().name.as_str(), "alpha");
//! ```

pub mod clock;
pub mod context;
pub mod exchange;
pub mod host;
pub mod organizations;
pub mod registry;
pub mod settings;
pub mod state;
pub mod transaction;

pub use clock::{Clock, FixedClock, SystemClock};
pub use context::Signers;
pub use exchange::OfferOutcome;
pub use host::{ActionDispatcher, RecordingDispatcher};
pub use registry::Registry;
pub use settings::{Setting, Settings};
pub use state::RegistryState;
pub use transaction::Transaction;
