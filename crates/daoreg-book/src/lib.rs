//! # daoreg-book
//!
//! Per-DAO offer books ordered by a composite match key.
//!
//! Each DAO owns one [`OfferBook`]. Lookups for a counter-offer are a single
//! range scan over the exact `(side, status, token, price)` bucket, oldest
//! offer first; neighbouring prices are never considered.

pub mod match_key;
pub mod offer_book;

pub use match_key::{MatchKey, TimePriority};
pub use offer_book::OfferBook;
