//! Token symbols and symbol-typed amounts.
//!
//! A [`Symbol`] is a short upper-case code with a fixed decimal precision,
//! written `"4,FOO"`. An [`Asset`] is an amount carried at exactly that
//! precision, written `"40.0000 FOO"`. An [`ExtendedSymbol`] pins a symbol to
//! the account that issues it: two issuers may both mint `FOO`, and the
//! ledger keeps them apart.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::{AccountName, DaoregError, Result, constants};

// ---------------------------------------------------------------------------
// Symbol
// ---------------------------------------------------------------------------

/// Token symbol: code plus decimal precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol {
    code: String,
    precision: u8,
}

impl Symbol {
    /// Build a symbol, validating the code and precision.
    pub fn new(code: impl Into<String>, precision: u8) -> Result<Self> {
        let code = code.into();
        if code.is_empty() || code.len() > constants::MAX_SYMBOL_CODE_LEN {
            return Err(DaoregError::invalid(format!(
                "symbol code must be 1..={} characters, got {code:?}",
                constants::MAX_SYMBOL_CODE_LEN
            )));
        }
        if !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(DaoregError::invalid(format!(
                "symbol code must be upper-case A-Z, got {code:?}"
            )));
        }
        if precision > constants::MAX_SYMBOL_PRECISION {
            return Err(DaoregError::invalid(format!(
                "symbol precision {precision} exceeds {}",
                constants::MAX_SYMBOL_PRECISION
            )));
        }
        Ok(Self { code, precision })
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn precision(&self) -> u8 {
        self.precision
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl FromStr for Symbol {
    type Err = DaoregError;

    /// Parses `"<precision>,<CODE>"`.
    fn from_str(s: &str) -> Result<Self> {
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| DaoregError::invalid(format!("malformed symbol {s:?}")))?;
        let precision = precision
            .trim()
            .parse::<u8>()
            .map_err(|_| DaoregError::invalid(format!("malformed symbol precision in {s:?}")))?;
        Self::new(code.trim(), precision)
    }
}

impl TryFrom<String> for Symbol {
    type Error = DaoregError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

// ---------------------------------------------------------------------------
// Asset
// ---------------------------------------------------------------------------

/// A symbol-typed amount, always held at the symbol's precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asset {
    amount: Decimal,
    symbol: Symbol,
}

impl Asset {
    /// Build an asset. Fails if `amount` carries more fractional digits
    /// than the symbol allows.
    pub fn new(mut amount: Decimal, symbol: Symbol) -> Result<Self> {
        let precision = u32::from(symbol.precision);
        if amount.round_dp(precision) != amount {
            return Err(DaoregError::invalid(format!(
                "amount {amount} exceeds precision of {symbol}"
            )));
        }
        amount.rescale(precision);
        Ok(Self { amount, symbol })
    }

    /// Zero of the given symbol.
    #[must_use]
    pub fn zero(symbol: Symbol) -> Self {
        let mut amount = Decimal::ZERO;
        amount.rescale(u32::from(symbol.precision));
        Self { amount, symbol }
    }

    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        !self.amount.is_zero() && self.amount.is_sign_positive()
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        !self.amount.is_zero() && self.amount.is_sign_negative()
    }

    fn ensure_same_symbol(&self, other: &Self) -> Result<()> {
        if self.symbol == other.symbol {
            Ok(())
        } else {
            Err(DaoregError::SymbolMismatch {
                expected: self.symbol.clone(),
                actual: other.symbol.clone(),
            })
        }
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.ensure_same_symbol(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(DaoregError::BalanceOverflow)?;
        Self::new(amount, self.symbol.clone())
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.ensure_same_symbol(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(DaoregError::BalanceOverflow)?;
        Self::new(amount, self.symbol.clone())
    }

    /// `self >= other`, both of the same symbol.
    pub fn covers(&self, other: &Self) -> Result<bool> {
        self.ensure_same_symbol(other)?;
        Ok(self.amount >= other.amount)
    }

    /// Cost of `quantity` units at `price_per_unit`, in the price's symbol.
    ///
    /// The raw product carries `quantity.precision + price.precision`
    /// fractional digits; it is truncated back to the price precision.
    pub fn cost(quantity: &Self, price_per_unit: &Self) -> Result<Self> {
        let raw = quantity
            .amount
            .checked_mul(price_per_unit.amount)
            .ok_or(DaoregError::BalanceOverflow)?;
        let amount = raw.round_dp_with_strategy(
            u32::from(price_per_unit.symbol.precision),
            RoundingStrategy::ToZero,
        );
        Self::new(amount, price_per_unit.symbol.clone())
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.symbol.code)
    }
}

impl FromStr for Asset {
    type Err = DaoregError;

    /// Parses `"<amount> <CODE>"`; the precision is the number of
    /// fractional digits written.
    fn from_str(s: &str) -> Result<Self> {
        let (amount, code) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| DaoregError::invalid(format!("malformed asset {s:?}")))?;
        let amount = amount
            .parse::<Decimal>()
            .map_err(|e| DaoregError::invalid(format!("malformed amount in {s:?}: {e}")))?;
        let precision = u8::try_from(amount.scale())
            .map_err(|_| DaoregError::invalid(format!("precision too large in {s:?}")))?;
        Self::new(amount, Symbol::new(code.trim(), precision)?)
    }
}

impl TryFrom<String> for Asset {
    type Error = DaoregError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.to_string()
    }
}

// ---------------------------------------------------------------------------
// ExtendedSymbol
// ---------------------------------------------------------------------------

/// A symbol together with its issuing account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ExtendedSymbol {
    pub contract: AccountName,
    pub symbol: Symbol,
}

impl ExtendedSymbol {
    #[must_use]
    pub fn new(contract: impl Into<AccountName>, symbol: Symbol) -> Self {
        Self {
            contract: contract.into(),
            symbol,
        }
    }
}

impl fmt::Display for ExtendedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol, self.contract)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures {
    use super::{Asset, ExtendedSymbol, Symbol};

    /// Parse an asset literal, panicking on bad input.
    #[must_use]
    pub fn asset(s: &str) -> Asset {
        s.parse().expect("valid asset literal")
    }

    /// Parse a symbol literal, panicking on bad input.
    #[must_use]
    pub fn symbol(s: &str) -> Symbol {
        s.parse().expect("valid symbol literal")
    }

    /// `(contract, symbol)` pair from literals.
    #[must_use]
    pub fn token(contract: &str, symbol_literal: &str) -> ExtendedSymbol {
        ExtendedSymbol::new(contract, symbol(symbol_literal))
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{asset, symbol};
    use super::*;

    #[test]
    fn symbol_parse_and_display() {
        let s = symbol("4,FOO");
        assert_eq!(s.code(), "FOO");
        assert_eq!(s.precision(), 4);
        assert_eq!(s.to_string(), "4,FOO");
    }

    #[test]
    fn symbol_rejects_bad_input() {
        assert!("FOO".parse::<Symbol>().is_err());
        assert!("4,foo".parse::<Symbol>().is_err());
        assert!("4,TOOLONGX".parse::<Symbol>().is_err());
        assert!("19,FOO".parse::<Symbol>().is_err());
    }

    #[test]
    fn asset_parse_keeps_precision() {
        let a = asset("40.0000 FOO");
        assert_eq!(a.symbol(), &symbol("4,FOO"));
        assert_eq!(a.amount(), Decimal::new(400_000, 4));
        assert_eq!(a.to_string(), "40.0000 FOO");
    }

    #[test]
    fn asset_new_rescales_and_rejects_excess_digits() {
        let a = Asset::new(Decimal::new(2, 0), symbol("4,QUOTE")).unwrap();
        assert_eq!(a.to_string(), "2.0000 QUOTE");
        assert!(Asset::new(Decimal::new(12_345, 5), symbol("4,QUOTE")).is_err());
    }

    #[test]
    fn zero_displays_at_precision() {
        assert_eq!(Asset::zero(symbol("4,FOO")).to_string(), "0.0000 FOO");
    }

    #[test]
    fn arithmetic_requires_matching_symbol() {
        let a = asset("1.0000 FOO");
        let b = asset("1.0000 BAR");
        let err = a.checked_add(&b).unwrap_err();
        assert!(matches!(err, DaoregError::SymbolMismatch { .. }));
        // Same code, different precision is a different symbol.
        assert!(a.checked_sub(&asset("1.00 FOO")).is_err());
    }

    #[test]
    fn add_sub_and_covers() {
        let a = asset("100.0000 FOO");
        let b = asset("40.0000 FOO");
        assert_eq!(a.checked_sub(&b).unwrap(), asset("60.0000 FOO"));
        assert_eq!(a.checked_add(&b).unwrap(), asset("140.0000 FOO"));
        assert!(a.covers(&b).unwrap());
        assert!(!b.covers(&a).unwrap());
        assert!(b.checked_sub(&a).unwrap().is_negative());
    }

    #[test]
    fn cost_truncates_to_price_precision() {
        let qty = asset("40.0000 FOO");
        let price = asset("2.0000 QUOTE");
        assert_eq!(Asset::cost(&qty, &price).unwrap(), asset("80.0000 QUOTE"));

        let qty = asset("0.0003 FOO");
        let price = asset("0.0003 QUOTE");
        // 0.00000009 truncates to zero at four decimals.
        assert!(Asset::cost(&qty, &price).unwrap().is_zero());
    }

    #[test]
    fn asset_serde_as_string() {
        let a = asset("12.5000 FOO");
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"12.5000 FOO\"");
        let back: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn extended_symbol_display() {
        let t = ExtendedSymbol::new("tok1", symbol("4,FOO"));
        assert_eq!(t.to_string(), "4,FOO@tok1");
    }
}
