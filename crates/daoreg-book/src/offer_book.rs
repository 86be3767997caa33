//! The offer book for a single DAO.
//!
//! Offers are stored by id in a `BTreeMap`; a second `BTreeMap<MatchKey,
//! OfferId>` keeps them in match order. Every mutation keeps the two maps
//! in step: an offer's key is removed before its status changes and
//! re-inserted afterwards.

use std::collections::BTreeMap;

use daoreg_types::*;

use crate::match_key::MatchKey;

#[derive(Debug, Clone, PartialEq)]
pub struct OfferBook {
    /// The DAO this book serves.
    pub dao_id: DaoId,
    offers: BTreeMap<OfferId, Offer>,
    index: BTreeMap<MatchKey, OfferId>,
    next_offer_id: OfferId,
}

impl OfferBook {
    #[must_use]
    pub fn new(dao_id: DaoId) -> Self {
        Self {
            dao_id,
            offers: BTreeMap::new(),
            index: BTreeMap::new(),
            next_offer_id: OfferId(constants::FIRST_OFFER_ID),
        }
    }

    /// Reserve the next offer id. Ids are never reused within a book.
    pub fn allocate_id(&mut self) -> OfferId {
        let id = self.next_offer_id;
        self.next_offer_id = id.next();
        id
    }

    /// The id the next [`allocate_id`](Self::allocate_id) call returns.
    #[must_use]
    pub fn peek_next_id(&self) -> OfferId {
        self.next_offer_id
    }

    // =================================================================
    // Insertion
    // =================================================================

    /// Insert an offer in whatever state it is in.
    ///
    /// # Errors
    /// - `DuplicateOffer` if the id is taken
    /// - `InvalidArgument` if the offer breaks the full-fill invariant
    pub fn insert(&mut self, offer: Offer) -> Result<()> {
        if self.offers.contains_key(&offer.offer_id) {
            return Err(DaoregError::DuplicateOffer(offer.offer_id));
        }
        if !offer.is_consistent() {
            return Err(DaoregError::invalid(format!(
                "{} has available {} but total {} while {}",
                offer.offer_id, offer.available_quantity, offer.total_quantity, offer.status
            )));
        }
        if offer.offer_id >= self.next_offer_id {
            self.next_offer_id = offer.offer_id.next();
        }
        self.index.insert(MatchKey::for_offer(&offer), offer.offer_id);
        self.offers.insert(offer.offer_id, offer);
        Ok(())
    }

    // =================================================================
    // Matching
    // =================================================================

    /// Oldest active offer on `side` for `token_idx` at exactly `price`
    /// with exactly `quantity` available, skipping offers created by
    /// `exclude`.
    ///
    /// The scan starts at the bucket floor and stops at the first key
    /// outside the bucket, so neighbouring prices are never visited.
    #[must_use]
    pub fn find_match(
        &self,
        side: OfferType,
        token_idx: TokenId,
        price: &Asset,
        quantity: &Asset,
        exclude: &AccountName,
    ) -> Option<&Offer> {
        let floor = MatchKey::bucket_floor(side, token_idx, price.amount());
        self.index
            .range(floor..)
            .take_while(|(key, _)| key.same_bucket(&floor))
            .filter_map(|(_, id)| self.offers.get(id))
            .find(|offer| {
                offer.price_per_unit == *price
                    && offer.available_quantity == *quantity
                    && offer.creator != *exclude
            })
    }

    // =================================================================
    // Lifecycle
    // =================================================================

    /// Transition an active offer to CLOSED and re-key it.
    ///
    /// # Errors
    /// - `OfferNotFound` if the id is unknown
    /// - `OfferNotActive` if the offer is already closed
    pub fn close(&mut self, offer_id: OfferId) -> Result<&Offer> {
        let dao_id = self.dao_id;
        let offer = self
            .offers
            .get_mut(&offer_id)
            .ok_or(DaoregError::OfferNotFound { dao_id, offer_id })?;
        if !offer.is_active() {
            return Err(DaoregError::OfferNotActive(offer_id));
        }
        self.index.remove(&MatchKey::for_offer(offer));
        offer.close();
        self.index.insert(MatchKey::for_offer(offer), offer_id);
        tracing::debug!(%dao_id, %offer_id, "Offer closed");
        Ok(offer)
    }

    /// Erase an offer row and its index entry.
    ///
    /// # Errors
    /// Returns `OfferNotFound` if the id is unknown.
    pub fn remove(&mut self, offer_id: OfferId) -> Result<Offer> {
        let offer = self
            .offers
            .remove(&offer_id)
            .ok_or(DaoregError::OfferNotFound {
                dao_id: self.dao_id,
                offer_id,
            })?;
        self.index.remove(&MatchKey::for_offer(&offer));
        Ok(offer)
    }

    /// Remove every offer, returning them in id order.
    pub fn drain(&mut self) -> Vec<Offer> {
        self.index.clear();
        std::mem::take(&mut self.offers).into_values().collect()
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn get(&self, offer_id: OfferId) -> Option<&Offer> {
        self.offers.get(&offer_id)
    }

    /// Offer by id or `OfferNotFound`.
    pub fn require(&self, offer_id: OfferId) -> Result<&Offer> {
        self.get(offer_id).ok_or(DaoregError::OfferNotFound {
            dao_id: self.dao_id,
            offer_id,
        })
    }

    /// All offers in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Offer> {
        self.offers.values()
    }

    /// Active offers in match-key order.
    pub fn active(&self) -> impl Iterator<Item = &Offer> {
        self.index
            .iter()
            .filter(|(key, _)| key.status == OfferStatus::Active)
            .filter_map(|(_, id)| self.offers.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}
