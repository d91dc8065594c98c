//! # Money Module
//!
//! Provides the `Money` type for prices, line totals and order totals.
//!
//! ## Integer Cents Inside, Decimals on the Wire
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  API JSON                     Client                     Display        │
//! │                                                                         │
//! │  "price": 12.5   ──as_major──►  Money(1250)  ──Display──►  "$12.50"     │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                       Cart::total() = Σ price × qty                     │
//! │                       (integer math, no drift)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The REST API sends prices as decimal numbers. They are converted to cents
//! exactly once, by the [`as_major`] serde adapter, and everything after that
//! is integer arithmetic.
//!
//! ## Usage
//! ```rust
//! use farmstand_core::money::Money;
//!
//! let price = Money::from_cents(1099);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 3297);
//! assert_eq!(line.to_string(), "$32.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// Largest absolute major-unit amount accepted from the wire.
///
/// Keeps `price × MAX_ITEM_QUANTITY × MAX_CART_LINES` well inside `i64` cents.
pub const MAX_WIRE_AMOUNT: f64 = 10_000_000_000.0;

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that refunds and adjustments returned by the server can be
/// represented without a second type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal major-unit amount (as sent by the API) to cents.
    ///
    /// Rounds half away from zero, so `12.345` becomes 1235 cents.
    ///
    /// ## Example
    /// ```rust
    /// use farmstand_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(12.5).cents(), 1250);
    /// assert_eq!(Money::from_major(0.1 + 0.2).cents(), 30);
    /// ```
    pub fn from_major(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Like [`Money::from_major`], but refuses non-finite amounts and
    /// anything beyond [`MAX_WIRE_AMOUNT`] instead of saturating.
    ///
    /// ```rust
    /// use farmstand_core::money::Money;
    ///
    /// assert_eq!(Money::try_from_major(4.99).map(|m| m.cents()), Some(499));
    /// assert!(Money::try_from_major(f64::NAN).is_none());
    /// assert!(Money::try_from_major(1.0e17).is_none());
    /// ```
    pub fn try_from_major(amount: f64) -> Option<Self> {
        if amount.is_finite() && amount.abs() <= MAX_WIRE_AMOUNT {
            Some(Money::from_major(amount))
        } else {
            None
        }
    }

    /// Returns the amount as a decimal in major units, for the wire.
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a line quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Tomatoes $10.00 / kg
    /// Quantity: 2
    ///      │
    ///      ▼
    /// multiply_quantity(2) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: $20.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Checked line total; `None` on overflow.
    #[inline]
    pub const fn checked_mul(&self, qty: u32) -> Option<Self> {
        match self.0.checked_mul(qty as i64) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-grade formatting; a real storefront shell localizes on its own.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Wire Adapters
// =============================================================================

/// Serde adapter for API fields carrying a decimal major-unit amount.
///
/// ```rust
/// use farmstand_core::money::{self, Money};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Line {
///     #[serde(with = "money::as_major")]
///     price: Money,
/// }
///
/// let line: Line = serde_json::from_str(r#"{"price": 4.99}"#).unwrap();
/// assert_eq!(line.price.cents(), 499);
/// ```
pub mod as_major {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_major())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        parse::<D::Error>(amount)
    }

    pub(super) fn parse<E: serde::de::Error>(amount: f64) -> Result<Money, E> {
        Money::try_from_major(amount).ok_or_else(|| {
            E::custom(format!(
                "amount {amount} is not a finite value within ±{}",
                super::MAX_WIRE_AMOUNT
            ))
        })
    }
}

/// Same as [`as_major`] for optional fields.
pub mod as_major_opt {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Money>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(money) => serializer.serialize_some(&money.to_major()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Money>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(super::as_major::parse::<D::Error>)
            .transpose()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_from_cents_and_parts() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_from_major_rounds_float_noise() {
        assert_eq!(Money::from_major(10.0).cents(), 1000);
        assert_eq!(Money::from_major(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_major(19.999).cents(), 2000);
    }

    #[test]
    fn test_sum_of_lines() {
        let total: Money = [Money::from_cents(2000), Money::from_cents(500)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 2500);
    }

    #[test]
    fn test_as_major_serde() {
        #[derive(Serialize, Deserialize)]
        struct Priced {
            #[serde(with = "as_major")]
            price: Money,
            #[serde(with = "as_major_opt", default)]
            compare_at: Option<Money>,
        }

        let parsed: Priced = serde_json::from_str(r#"{"price": 12.5}"#).unwrap();
        assert_eq!(parsed.price.cents(), 1250);
        assert!(parsed.compare_at.is_none());

        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["price"], serde_json::json!(12.5));
    }

    #[test]
    fn test_as_major_rejects_out_of_range_amounts() {
        #[derive(Debug, Deserialize)]
        struct Priced {
            #[serde(with = "as_major")]
            #[allow(dead_code)]
            price: Money,
            #[serde(with = "as_major_opt", default)]
            #[allow(dead_code)]
            compare_at: Option<Money>,
        }

        assert!(serde_json::from_str::<Priced>(r#"{"price": 1.0e17}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": -1.0e17}"#).is_err());
        assert!(
            serde_json::from_str::<Priced>(r#"{"price": 1.0, "compare_at": 1.0e17}"#).is_err()
        );
        assert!(serde_json::from_str::<Priced>(r#"{"price": 10000000000.0}"#).is_ok());
    }

    #[test]
    fn test_try_from_major_bounds() {
        assert!(Money::try_from_major(f64::NAN).is_none());
        assert!(Money::try_from_major(f64::INFINITY).is_none());
        assert!(Money::try_from_major(MAX_WIRE_AMOUNT + 1.0).is_none());
        assert_eq!(
            Money::try_from_major(MAX_WIRE_AMOUNT).map(|m| m.cents()),
            Some(1_000_000_000_000)
        );
    }

    #[test]
    fn test_checked_arithmetic() {
        let big = Money::from_cents(i64::MAX / 2 + 1);
        assert!(big.checked_mul(2).is_none());
        assert!(big.checked_add(big).is_none());
        assert_eq!(
            Money::from_cents(250).checked_mul(4),
            Some(Money::from_cents(1000))
        );
    }
}
