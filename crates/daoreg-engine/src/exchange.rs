//! Deposits, withdrawals and the offer lifecycle.
//!
//! ```text
//! createoffer ─┬─ no match ─▶ ACTIVE ─┬─ removeoffer ─▶ (erased, funds unlocked)
//!              │                      └─ acceptoffer / later match ─▶ CLOSED
//!              └─ match ─▶ CLOSED (both offers)
//! ```

use daoreg_settlement::{Fill, Settler};
use daoreg_types::*;
use serde::Serialize;

use crate::state::RegistryState;
use crate::transaction::Transaction;

/// Result of [`create_offer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferOutcome {
    pub offer_id: OfferId,
    /// `Active` if the offer rests in the book, `Closed` if it filled.
    pub status: OfferStatus,
    pub trade: Option<Trade>,
}

// =====================================================================
// Deposit / withdraw
// =====================================================================

/// Handle a transfer notification from `token_contract`.
///
/// Only transfers *into* the registry are deposits; everything else is
/// ignored. The memo names the DAO to credit under.
pub fn deposit(
    tx: &mut Transaction<'_>,
    token_contract: &AccountName,
    notice: &TransferNotice,
) -> Result<()> {
    let registry = tx.registry_account();
    if &notice.to != registry || &notice.from == registry {
        tracing::debug!(from = %notice.from, to = %notice.to, "Transfer not addressed to registry, ignored");
        return Ok(());
    }

    let memo = notice.memo.trim();
    let dao_id = memo
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then(|| memo.parse::<u64>().ok())
        .flatten()
        .map(DaoId)
        .ok_or_else(|| {
            DaoregError::invalid(format!("memo {:?} is not a DAO id", notice.memo))
        })?;
    if !notice.quantity.is_positive() {
        return Err(DaoregError::invalid(format!(
            "deposit quantity must be positive, got {}",
            notice.quantity
        )));
    }

    let token = ExtendedSymbol::new(token_contract.clone(), notice.quantity.symbol().clone());
    if !dao_id.is_system() {
        tx.state.organization(dao_id)?;
    }
    if !tx.state.tokens.exists(dao_id, &token) {
        return Err(DaoregError::UnsupportedToken(format!("{token} in {dao_id}")));
    }

    tx.state
        .ledger
        .credit(&notice.from, dao_id, token_contract, &notice.quantity)?;
    tx.state
        .supply
        .record_deposit(&token, notice.quantity.amount())?;

    tracing::info!(%dao_id, account = %notice.from, amount = %notice.quantity, %token, "Deposit credited");
    Ok(())
}

/// Pay out available funds to their owner.
pub fn withdraw(
    tx: &mut Transaction<'_>,
    account: &AccountName,
    token_account: &AccountName,
    quantity: &Asset,
) -> Result<()> {
    tx.require_auth(account)?;
    let registry = tx.registry_account().clone();
    let action = tx
        .state
        .ledger
        .withdraw(&registry, account, token_account, quantity)?;
    let token = ExtendedSymbol::new(token_account.clone(), quantity.symbol().clone());
    tx.state
        .supply
        .record_withdrawal(&token, quantity.amount())?;
    tx.send(action);

    tracing::info!(%account, amount = %quantity, %token, "Withdrawal queued");
    Ok(())
}

// =====================================================================
// Offers
// =====================================================================

/// Issuers of the base and quote tokens of an offer.
struct Legs {
    base_contract: AccountName,
    quote_contract: AccountName,
}

fn legs_for(
    state: &RegistryState,
    dao_id: DaoId,
    token_idx: TokenId,
    price: &Asset,
) -> Result<Legs> {
    let base_contract = state
        .tokens
        .registration(dao_id, token_idx)
        .map(|r| r.token_account.clone())
        .ok_or_else(|| {
            DaoregError::Internal(format!("{token_idx} missing from {dao_id} registry"))
        })?;
    let quote_contract = state.tokens.resolve(DaoId::SYSTEM, price.symbol())?;
    Ok(Legs {
        base_contract,
        quote_contract,
    })
}

/// `(issuer, amount)` an offer's creator has locked behind it: the base
/// quantity for a sell, the quote cost for a buy.
fn reserved_leg(state: &RegistryState, dao_id: DaoId, offer: &Offer) -> Result<(AccountName, Asset)> {
    let legs = legs_for(state, dao_id, offer.token_idx, &offer.price_per_unit)?;
    Ok(match offer.offer_type {
        OfferType::Sell => (legs.base_contract, offer.total_quantity.clone()),
        OfferType::Buy => (legs.quote_contract, offer.cost()?),
    })
}

/// Return an active offer's reservation to its creator. The offer row is
/// left alone.
pub(crate) fn release_offer(state: &mut RegistryState, dao_id: DaoId, offer: &Offer) -> Result<()> {
    let (contract, amount) = reserved_leg(state, dao_id, offer)?;
    state.ledger.unlock(&offer.creator, &contract, &amount)
}

/// Post an offer, settling it immediately against the oldest exact match.
pub fn create_offer(
    tx: &mut Transaction<'_>,
    dao_id: DaoId,
    creator: &AccountName,
    quantity: &Asset,
    price_per_unit: &Asset,
    offer_type: OfferType,
) -> Result<OfferOutcome> {
    tx.require_auth(creator)?;
    tx.state.organization(dao_id)?;
    if !quantity.is_positive() {
        return Err(DaoregError::invalid(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if !price_per_unit.is_positive() {
        return Err(DaoregError::invalid(format!(
            "price must be positive, got {price_per_unit}"
        )));
    }
    if !tx.state.tokens.is_system_symbol(price_per_unit.symbol()) {
        return Err(DaoregError::UnsupportedToken(format!(
            "price must be in a system token, got {}",
            price_per_unit.symbol()
        )));
    }
    let token_idx = tx.state.tokens.token_index(dao_id, quantity.symbol())?;
    let legs = legs_for(&tx.state, dao_id, token_idx, price_per_unit)?;
    let cost = Asset::cost(quantity, price_per_unit)?;
    if !cost.is_positive() {
        return Err(DaoregError::invalid(format!(
            "cost of {quantity} at {price_per_unit} rounds to zero"
        )));
    }

    // Reserve the creator's leg.
    match offer_type {
        OfferType::Sell => tx.state.ledger.lock(creator, &legs.base_contract, quantity)?,
        OfferType::Buy => tx.state.ledger.lock(creator, &legs.quote_contract, &cost)?,
    }

    let now = tx.now;
    let state = &mut tx.state;
    let book = state
        .books
        .get_mut(&dao_id)
        .ok_or(DaoregError::OrganizationNotFound(dao_id))?;
    let offer_id = book.allocate_id();
    let mut offer = Offer::new_active(
        offer_id,
        creator.clone(),
        quantity.clone(),
        price_per_unit.clone(),
        offer_type,
        token_idx,
        now,
    );

    let counter = book
        .find_match(offer_type.opposite(), token_idx, price_per_unit, quantity, creator)
        .map(|o| (o.offer_id, o.creator.clone()));

    let Some((maker_id, maker)) = counter else {
        book.insert(offer)?;
        tracing::debug!(%dao_id, %offer_id, side = %offer_type, %quantity, price = %price_per_unit, "Offer resting");
        return Ok(OfferOutcome {
            offer_id,
            status: OfferStatus::Active,
            trade: None,
        });
    };

    offer.close();
    book.insert(offer)?;
    book.close(maker_id)?;

    let (buyer, seller) = match offer_type {
        OfferType::Buy => (creator.clone(), maker),
        OfferType::Sell => (maker, creator.clone()),
    };
    let fill = Fill {
        dao_id,
        maker_offer_id: maker_id,
        taker_offer_id: Some(offer_id),
        buyer,
        seller,
        token_idx,
        base_contract: legs.base_contract,
        quote_contract: legs.quote_contract,
        quantity: quantity.clone(),
        price_per_unit: price_per_unit.clone(),
    };
    let trade = Settler::settle(&mut state.ledger, &fill, now)?;
    state.trades.push(trade.clone());

    tracing::info!(%dao_id, taker = %offer_id, maker = %maker_id, trade_id = %trade.id.short(), "Offer matched");
    Ok(OfferOutcome {
        offer_id,
        status: OfferStatus::Closed,
        trade: Some(trade),
    })
}

/// Cancel a resting offer and unlock its reservation. Creator or owner.
pub fn remove_offer(tx: &mut Transaction<'_>, dao_id: DaoId, offer_id: OfferId) -> Result<()> {
    tx.state.organization(dao_id)?;
    let offer = tx.state.book(dao_id)?.require(offer_id)?.clone();
    if !tx.signers.has(&offer.creator) && !tx.signers.has(tx.registry_account()) {
        return Err(DaoregError::MissingAuthority(offer.creator));
    }
    if !offer.is_active() {
        return Err(DaoregError::OfferNotActive(offer_id));
    }

    release_offer(&mut tx.state, dao_id, &offer)?;
    tx.state
        .books
        .get_mut(&dao_id)
        .ok_or(DaoregError::OrganizationNotFound(dao_id))?
        .remove(offer_id)?;

    tracing::info!(%dao_id, %offer_id, creator = %offer.creator, "Offer removed");
    Ok(())
}

/// Take a resting offer as its counter-party.
pub fn accept_offer(
    tx: &mut Transaction<'_>,
    dao_id: DaoId,
    account: &AccountName,
    offer_id: OfferId,
) -> Result<Trade> {
    tx.require_auth(account)?;
    tx.state.organization(dao_id)?;
    let offer = tx.state.book(dao_id)?.require(offer_id)?.clone();
    if !offer.is_active() {
        return Err(DaoregError::OfferNotActive(offer_id));
    }
    if &offer.creator == account {
        return Err(DaoregError::SelfTrade {
            account: account.clone(),
            offer_id,
        });
    }

    let legs = legs_for(&tx.state, dao_id, offer.token_idx, &offer.price_per_unit)?;
    let (buyer, seller) = match offer.offer_type {
        OfferType::Sell => {
            tx.state
                .ledger
                .lock(account, &legs.quote_contract, &offer.cost()?)?;
            (account.clone(), offer.creator.clone())
        }
        OfferType::Buy => {
            tx.state
                .ledger
                .lock(account, &legs.base_contract, &offer.total_quantity)?;
            (offer.creator.clone(), account.clone())
        }
    };

    tx.state
        .books
        .get_mut(&dao_id)
        .ok_or(DaoregError::OrganizationNotFound(dao_id))?
        .close(offer_id)?;

    let fill = Fill {
        dao_id,
        maker_offer_id: offer_id,
        taker_offer_id: None,
        buyer,
        seller,
        token_idx: offer.token_idx,
        base_contract: legs.base_contract,
        quote_contract: legs.quote_contract,
        quantity: offer.total_quantity.clone(),
        price_per_unit: offer.price_per_unit.clone(),
    };
    let trade = Settler::settle(&mut tx.state.ledger, &fill, tx.now)?;
    tx.state.trades.push(trade.clone());

    tracing::info!(%dao_id, %offer_id, %account, trade_id = %trade.id.short(), "Offer accepted");
    Ok(trade)
}
