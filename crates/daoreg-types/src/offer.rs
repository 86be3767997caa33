//! Offer types for the per-DAO exchange.
//!
//! An offer sells or buys a DAO-registered token for a system (quote) token
//! at a fixed price per unit. Offers are filled whole or not at all:
//!
//! ```text
//!   ┌────────┐  matched / accepted   ┌────────┐
//!   │ ACTIVE ├──────────────────────▶│ CLOSED │
//!   └───┬────┘                       └────────┘
//!       │ cancelled
//!       ▼
//!   (row erased)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountName, Asset, OfferId, Result, TokenId};

/// Which side of the book an offer is on.
///
/// The declaration order is part of the match index ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OfferType {
    Sell,
    Buy,
}

impl OfferType {
    /// The side a counter-offer must be on.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Sell => Self::Buy,
            Self::Buy => Self::Sell,
        }
    }
}

impl std::fmt::Display for OfferType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sell => write!(f, "SELL"),
            Self::Buy => write!(f, "BUY"),
        }
    }
}

/// Lifecycle status of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OfferStatus {
    Closed,
    Active,
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "CLOSED"),
            Self::Active => write!(f, "ACTIVE"),
        }
    }
}

/// An offer in a DAO's book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub offer_id: OfferId,
    pub creator: AccountName,
    /// Equal to `total_quantity` while active, zero once closed.
    pub available_quantity: Asset,
    pub total_quantity: Asset,
    /// Denominated in a system token.
    pub price_per_unit: Asset,
    pub status: OfferStatus,
    pub creation_timestamp: DateTime<Utc>,
    pub offer_type: OfferType,
    /// Registration index of the traded token within the DAO.
    pub token_idx: TokenId,
}

impl Offer {
    /// A fresh, untouched offer.
    #[must_use]
    pub fn new_active(
        offer_id: OfferId,
        creator: AccountName,
        quantity: Asset,
        price_per_unit: Asset,
        offer_type: OfferType,
        token_idx: TokenId,
        creation_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            offer_id,
            creator,
            available_quantity: quantity.clone(),
            total_quantity: quantity,
            price_per_unit,
            status: OfferStatus::Active,
            creation_timestamp,
            offer_type,
            token_idx,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == OfferStatus::Active
    }

    /// Quote-token cost of the whole offer.
    pub fn cost(&self) -> Result<Asset> {
        Asset::cost(&self.total_quantity, &self.price_per_unit)
    }

    /// Transition to CLOSED with nothing left.
    pub fn close(&mut self) {
        self.status = OfferStatus::Closed;
        self.available_quantity = Asset::zero(self.total_quantity.symbol().clone());
    }

    /// Full-fill invariant: active offers are untouched, closed ones empty.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match self.status {
            OfferStatus::Active => self.available_quantity == self.total_quantity,
            OfferStatus::Closed => self.available_quantity.is_zero(),
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Offer {
    pub fn dummy(offer_id: u64, offer_type: OfferType, quantity: &str, price: &str) -> Self {
        use crate::asset::fixtures::asset;
        Self::new_active(
            OfferId(offer_id),
            AccountName::from("maker"),
            asset(quantity),
            asset(price),
            offer_type,
            TokenId(1),
            Utc::now(),
        )
    }

    pub fn dummy_for(
        creator: &str,
        offer_id: u64,
        offer_type: OfferType,
        quantity: &str,
        price: &str,
    ) -> Self {
        let mut offer = Self::dummy(offer_id, offer_type, quantity, price);
        offer.creator = AccountName::from(creator);
        offer
    }
}
