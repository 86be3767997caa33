//! Two-leg settlement of a full fill.
//!
//! Both counter-parties have already reserved their leg when settlement
//! runs:
//! 1. Check the seller's locked base and the buyer's locked quote
//! 2. Move base: seller.locked → buyer.available (row tagged with the DAO)
//! 3. Move quote: buyer.locked → seller.available (row tagged with DAO 0)
//! 4. Emit the trade record
//!
//! Both checks run before either leg moves, so a failed settlement leaves
//! the ledger untouched.

use chrono::{DateTime, Utc};
use daoreg_ledger::BalanceLedger;
use daoreg_types::{
    AccountName, Asset, DaoId, DaoregError, ExtendedSymbol, OfferId, Result, TokenId, Trade,
    TradeId,
};

/// Everything settlement needs to know about one matched pair.
#[derive(Debug, Clone)]
pub struct Fill {
    pub dao_id: DaoId,
    /// The offer that was resting in the book.
    pub maker_offer_id: OfferId,
    /// The incoming offer, `None` for a direct acceptance.
    pub taker_offer_id: Option<OfferId>,
    pub buyer: AccountName,
    pub seller: AccountName,
    pub token_idx: TokenId,
    /// Issuer of the traded (base) token.
    pub base_contract: AccountName,
    /// Issuer of the quote token.
    pub quote_contract: AccountName,
    pub quantity: Asset,
    pub price_per_unit: Asset,
}

impl Fill {
    /// Quote amount the buyer pays.
    pub fn cost(&self) -> Result<Asset> {
        Asset::cost(&self.quantity, &self.price_per_unit)
    }

    #[must_use]
    pub fn base_token(&self) -> ExtendedSymbol {
        ExtendedSymbol::new(self.base_contract.clone(), self.quantity.symbol().clone())
    }

    #[must_use]
    pub fn quote_token(&self) -> ExtendedSymbol {
        ExtendedSymbol::new(
            self.quote_contract.clone(),
            self.price_per_unit.symbol().clone(),
        )
    }
}

/// Executes fills against a [`BalanceLedger`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Settler;

impl Settler {
    /// Settle one fill.
    ///
    /// # Errors
    /// - `SettlementFailed` if buyer and seller are the same account or the
    ///   cost rounds to zero
    /// - `InsufficientLocked` if either side has not reserved its leg
    pub fn settle(
        ledger: &mut BalanceLedger,
        fill: &Fill,
        executed_at: DateTime<Utc>,
    ) -> Result<Trade> {
        if fill.buyer == fill.seller {
            return Err(DaoregError::SettlementFailed {
                reason: format!("{} cannot trade with itself", fill.buyer),
            });
        }
        let cost = fill.cost()?;
        if !cost.is_positive() {
            return Err(DaoregError::SettlementFailed {
                reason: format!(
                    "cost of {} at {} rounds to zero",
                    fill.quantity, fill.price_per_unit
                ),
            });
        }

        // 1. Pre-check both legs
        let seller_locked = ledger.locked(&fill.seller, &fill.base_token());
        if !seller_locked.covers(&fill.quantity)? {
            return Err(DaoregError::InsufficientLocked {
                needed: fill.quantity.clone(),
                locked: seller_locked,
            });
        }
        let buyer_locked = ledger.locked(&fill.buyer, &fill.quote_token());
        if !buyer_locked.covers(&cost)? {
            return Err(DaoregError::InsufficientLocked {
                needed: cost,
                locked: buyer_locked,
            });
        }

        // 2. Base leg
        ledger.unlock_and_transfer(
            &fill.seller,
            &fill.buyer,
            fill.dao_id,
            &fill.base_contract,
            &fill.quantity,
        )?;

        // 3. Quote leg
        ledger.unlock_and_transfer(
            &fill.buyer,
            &fill.seller,
            DaoId::SYSTEM,
            &fill.quote_contract,
            &cost,
        )?;

        let trade = Trade {
            id: TradeId::deterministic(fill.dao_id, fill.maker_offer_id, fill.taker_offer_id),
            dao_id: fill.dao_id,
            maker_offer_id: fill.maker_offer_id,
            taker_offer_id: fill.taker_offer_id,
            buyer: fill.buyer.clone(),
            seller: fill.seller.clone(),
            token_idx: fill.token_idx,
            quantity: fill.quantity.clone(),
            price_per_unit: fill.price_per_unit.clone(),
            cost,
            executed_at,
        };

        tracing::info!(
            trade_id = %trade.id.short(),
            dao_id = %trade.dao_id,
            maker = %trade.maker_offer_id,
            buyer = %trade.buyer,
            seller = %trade.seller,
            quantity = %trade.quantity,
            cost = %trade.cost,
            "Fill settled"
        );
        Ok(trade)
    }
}
