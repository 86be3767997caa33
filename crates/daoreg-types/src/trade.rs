//! Trade records produced by settlement.
//!
//! A [`Trade`] is the immutable record of one full fill: the whole resting
//! offer against either an incoming offer (`taker_offer_id = Some`) or a
//! direct acceptance (`taker_offer_id = None`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountName, Asset, DaoId, OfferId, TokenId, TradeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Deterministic from `(dao_id, maker_offer_id, taker_offer_id)`.
    pub id: TradeId,
    pub dao_id: DaoId,
    /// The resting offer that was consumed.
    pub maker_offer_id: OfferId,
    /// The incoming offer, if the fill happened at offer creation.
    pub taker_offer_id: Option<OfferId>,
    pub buyer: AccountName,
    pub seller: AccountName,
    pub token_idx: TokenId,
    /// Base quantity moved seller → buyer.
    pub quantity: Asset,
    pub price_per_unit: Asset,
    /// Quote amount moved buyer → seller.
    pub cost: Asset,
    pub executed_at: DateTime<Utc>,
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[{}] {} {} -> {} {} @ {} = {}",
            self.id.short(),
            self.dao_id,
            self.seller,
            self.buyer,
            self.quantity,
            self.price_per_unit,
            self.cost,
        )
    }
}
