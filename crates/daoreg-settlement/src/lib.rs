//! # daoreg-settlement
//!
//! **Finality plane**: moves reserved value between counter-parties and
//! proves that nothing was created or destroyed on the way.
//!
//! ## Architecture
//!
//! The engine hands a [`Fill`] to the [`Settler`] once a match is found:
//! 1. Checks that both legs are reserved
//! 2. Moves the base leg seller → buyer
//! 3. Moves the quote leg buyer → seller
//! 4. Returns the [`Trade`](daoreg_types::Trade) record
//!
//! [`SupplyConservation`] is then checked against the whole ledger before
//! the enclosing transaction commits.

pub mod settler;
pub mod supply_conservation;

pub use settler::{Fill, Settler};
pub use supply_conservation::SupplyConservation;
