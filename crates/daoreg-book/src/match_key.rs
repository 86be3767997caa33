//! Composite match key.
//!
//! Offers are indexed by a tuple compared field by field:
//!
//! ```text
//! (offer_type, status, token_idx, price, (created_secs, offer_id))
//! ```
//!
//! All offers that could ever match a given request share the first four
//! fields and therefore sit in one contiguous range of the index. Inside
//! that bucket the time priority puts the oldest offer first.

use daoreg_types::{Offer, OfferId, OfferStatus, OfferType, TokenId};
use rust_decimal::Decimal;

/// Creation order inside an exact-price bucket. Ties on the second are
/// broken by the (monotonic) offer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimePriority {
    pub created_secs: i64,
    pub offer_id: OfferId,
}

impl TimePriority {
    /// Sorts before every real offer.
    pub const MIN: Self = Self {
        created_secs: i64::MIN,
        offer_id: OfferId::MIN,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    pub offer_type: OfferType,
    pub status: OfferStatus,
    pub token_idx: TokenId,
    pub price: Decimal,
    pub time: TimePriority,
}

impl MatchKey {
    /// Key of an offer in its current state.
    #[must_use]
    pub fn for_offer(offer: &Offer) -> Self {
        Self {
            offer_type: offer.offer_type,
            status: offer.status,
            token_idx: offer.token_idx,
            price: offer.price_per_unit.amount(),
            time: TimePriority {
                created_secs: offer.creation_timestamp.timestamp(),
                offer_id: offer.offer_id,
            },
        }
    }

    /// Lower bound of the active bucket `(offer_type, token_idx, price)`.
    #[must_use]
    pub fn bucket_floor(offer_type: OfferType, token_idx: TokenId, price: Decimal) -> Self {
        Self {
            offer_type,
            status: OfferStatus::Active,
            token_idx,
            price,
            time: TimePriority::MIN,
        }
    }

    /// Whether two keys differ only in time priority.
    #[must_use]
    pub fn same_bucket(&self, other: &Self) -> bool {
        self.offer_type == other.offer_type
            && self.status == other.status
            && self.token_idx == other.token_idx
            && self.price == other.price
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn key(offer_type: OfferType, price: i64, secs: i64, id: u64) -> MatchKey {
        MatchKey {
            offer_type,
            status: OfferStatus::Active,
            token_idx: TokenId(1),
            price: Decimal::new(price, 4),
            time: TimePriority {
                created_secs: secs,
                offer_id: OfferId(id),
            },
        }
    }

    #[test]
    fn older_offer_sorts_first_in_bucket() {
        let old = key(OfferType::Sell, 20_000, 100, 9);
        let new = key(OfferType::Sell, 20_000, 200, 3);
        assert!(old < new);
        assert!(old.same_bucket(&new));
    }

    #[test]
    fn same_second_breaks_tie_on_id() {
        assert!(key(OfferType::Buy, 1, 5, 1) < key(OfferType::Buy, 1, 5, 2));
    }

    #[test]
    fn floor_precedes_bucket_and_follows_lower_price() {
        let floor = MatchKey::bucket_floor(OfferType::Sell, TokenId(1), Decimal::new(20_000, 4));
        assert!(floor < key(OfferType::Sell, 20_000, i64::MIN + 1, 0));
        assert!(key(OfferType::Sell, 19_999, i64::MAX, u64::MAX) < floor);
        assert!(!floor.same_bucket(&key(OfferType::Sell, 20_001, 0, 0)));
    }

    #[test]
    fn closed_offers_leave_the_active_bucket() {
        let mut offer = Offer::dummy(1, OfferType::Sell, "40.0000 FOO", "2.0000 QUOTE");
        offer.creation_timestamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let active = MatchKey::for_offer(&offer);
        offer.close();
        let closed = MatchKey::for_offer(&offer);
        assert!(closed < active);
        assert!(!closed.same_bucket(&active));
        assert_eq!(active.time.created_secs, 1_700_000_000);
    }
}
