//! # Money Module
//!
//! Provides the `Money` and `DiscountRate` types for handling monetary values
//! safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A receipt form that sums floats can print $85.00 on screen and        │
//! │  $84.99 on paper.                                                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every amount is an i64 count of cents. Percentages are basis        │
//! │    points. Rounding happens in exactly one place per operation.        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The browser speaks decimal currency units (`"price": 12.5`). `Money`
//! serializes to that shape and deserializes leniently from numbers, numeric
//! strings, `null` or garbage. Anything unparseable becomes zero.
//!
//! ## Usage
//! ```rust
//! use optic_core::money::{DiscountRate, Money};
//!
//! let price = Money::from_cents(1099); // $10.99
//! let line = price * 2;               // $21.98
//! assert_eq!(line.cents(), 2198);
//!
//! let off = Money::from_cents(10000).percentage(DiscountRate::from_bps(1250));
//! assert_eq!(off.cents(), 1250); // 12.5% of $100.00
//!
//! assert_eq!(Money::parse_decimal("12.50"), Some(Money::from_cents(1250)));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::sanitize;

/// Basis points in 100%.
const FULL_BPS: u32 = 10_000;

/// Divides with rounding half away from zero.
fn div_round(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.price ──► LineItem.price × quantity ──► LineItem total        │
/// │                                                                         │
/// │  Σ line totals ──► subtotal ──► − discounts ──► total ──► balance due  │
/// │                                                                         │
/// │  Printed as "$10.99" on the receipt document                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use optic_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// Saturates instead of overflowing.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units.saturating_mul(100))
    }

    /// Converts a float amount of currency units, rounding to the nearest
    /// cent. Returns `None` for NaN, infinities and values out of range.
    ///
    /// ```rust
    /// use optic_core::money::Money;
    ///
    /// assert_eq!(Money::from_f64(12.345), Some(Money::from_cents(1235)));
    /// assert_eq!(Money::from_f64(f64::NAN), None);
    /// ```
    pub fn from_f64(units: f64) -> Option<Self> {
        if !units.is_finite() {
            return None;
        }
        // Route through the shortest decimal representation so that 0.125
        // rounds like the literal the user typed, not like its binary value.
        Self::parse_exact(&units.to_string()).or_else(|| {
            let cents = (units * 100.0).round();
            if cents.abs() < i64::MAX as f64 {
                Some(Money(cents as i64))
            } else {
                None
            }
        })
    }

    /// Parses a decimal string of currency units.
    ///
    /// Plain decimals (`"12"`, `"-3.5"`, `" 7.005 "`) are parsed exactly and
    /// rounded half away from zero to the cent. Other float syntax (`"1e3"`)
    /// falls back to [`Money::from_f64`].
    ///
    /// ```rust
    /// use optic_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("12.50"), Some(Money::from_cents(1250)));
    /// assert_eq!(Money::parse_decimal("0.125"), Some(Money::from_cents(13)));
    /// assert_eq!(Money::parse_decimal("abc"), None);
    /// ```
    pub fn parse_decimal(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        Self::parse_exact(trimmed).or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Self::from_f64)
        })
    }

    fn parse_exact(input: &str) -> Option<Self> {
        let (negative, unsigned) = match input.as_bytes().first()? {
            b'-' => (true, &input[1..]),
            b'+' => (false, &input[1..]),
            _ => (false, input),
        };
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return None;
        }

        let whole: i128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let digits = fraction.as_bytes();
        let digit = |i: usize| digits.get(i).map_or(0, |b| (b - b'0') as i128);
        let mut cents = whole.checked_mul(100)? + digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            cents += 1;
        }
        if cents > i64::MAX as i128 {
            return None;
        }
        let cents = cents as i64;
        Some(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the amount in currency units as a float, for the wire only.
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the value, or zero if it is negative.
    ///
    /// ```rust
    /// use optic_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-500).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(500).clamp_non_negative().cents(), 500);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies money by a quantity, saturating on overflow.
    ///
    /// ```rust
    /// use optic_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `rate` of this amount, rounded half away from zero.
    ///
    /// This is the discount (or tax) amount, not the adjusted price.
    ///
    /// ```rust
    /// use optic_core::money::{DiscountRate, Money};
    ///
    /// let subtotal = Money::from_cents(999);
    /// // 999 × 10% = 99.9 → 100 cents
    /// assert_eq!(subtotal.percentage(DiscountRate::from_bps(1000)).cents(), 100);
    /// ```
    pub fn percentage(&self, rate: DiscountRate) -> Money {
        Money(saturate(div_round(
            self.0 as i128 * rate.bps() as i128,
            FULL_BPS as i128,
        )))
    }

    /// Formats the amount without a currency symbol, always two decimals.
    ///
    /// ```rust
    /// use optic_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(8500).format_amount(), "85.00");
    /// assert_eq!(Money::from_cents(-5).format_amount(), "-0.05");
    /// ```
    pub fn format_amount(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, (self.0 / 100).unsigned_abs(), self.cents_part())
    }

    /// Formats the amount behind a currency symbol: `$85.00`, `-$0.05`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            (self.0 / 100).unsigned_abs(),
            self.cents_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("$"))
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Serialized as a decimal number of currency units.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

/// Lenient: numbers, numeric strings, null and garbage all produce a value.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(sanitize::money_from_value(&value))
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// A percentage held in basis points, always within 0%..=100%.
///
/// 1 basis point = 0.01%, so 1250 bps = 12.5%. Used for the receipt
/// discount and for [`crate::ASSURANCE_TAX_RATE`].
///
/// On the wire it is the percentage as a number (`"discount": 12.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a rate from basis points, clamping to 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > FULL_BPS {
            DiscountRate(FULL_BPS)
        } else {
            DiscountRate(bps)
        }
    }

    /// Creates a rate from a percentage, clamping into `[0, 100]`.
    ///
    /// NaN becomes zero.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() {
            return if pct == f64::INFINITY {
                DiscountRate(FULL_BPS)
            } else {
                DiscountRate(0)
            };
        }
        let bps = (pct * 100.0).round().clamp(0.0, FULL_BPS as f64);
        DiscountRate(bps as u32)
    }

    /// Creates a rate from a stored basis-point column.
    pub fn from_stored(bps: i64) -> Self {
        DiscountRate(bps.clamp(0, FULL_BPS as i64) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (wire and display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The percentage without trailing zeros: `10`, `12.5`, `0.25`.
    pub fn format_percentage(&self) -> String {
        let whole = self.0 / 100;
        let fraction = self.0 % 100;
        if fraction == 0 {
            whole.to_string()
        } else if fraction % 10 == 0 {
            format!("{}.{}", whole, fraction / 10)
        } else {
            format!("{}.{:02}", whole, fraction)
        }
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.format_percentage())
    }
}

impl Serialize for DiscountRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.percentage())
    }
}

impl<'de> Deserialize<'de> for DiscountRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(sanitize::rate_from_value(&value))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(Money::from_cents(1234).format_with("€"), "€12.34");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::from_cents(i64::MAX);
        assert_eq!((big + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!(big.multiply_quantity(2).cents(), i64::MAX);
    }

    #[test]
    fn test_parse_decimal_exact() {
        assert_eq!(Money::parse_decimal("12"), Some(Money::from_cents(1200)));
        assert_eq!(Money::parse_decimal("12.5"), Some(Money::from_cents(1250)));
        assert_eq!(Money::parse_decimal(" 7.05 "), Some(Money::from_cents(705)));
        assert_eq!(Money::parse_decimal(".5"), Some(Money::from_cents(50)));
        assert_eq!(Money::parse_decimal("3."), Some(Money::from_cents(300)));
        assert_eq!(Money::parse_decimal("-3.5"), Some(Money::from_cents(-350)));
        assert_eq!(Money::parse_decimal("+1.01"), Some(Money::from_cents(101)));
    }

    #[test]
    fn test_parse_decimal_rounds_half_away_from_zero() {
        assert_eq!(Money::parse_decimal("0.125"), Some(Money::from_cents(13)));
        assert_eq!(Money::parse_decimal("0.1249"), Some(Money::from_cents(12)));
        assert_eq!(Money::parse_decimal("-0.125"), Some(Money::from_cents(-13)));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert_eq!(Money::parse_decimal(""), None);
        assert_eq!(Money::parse_decimal("   "), None);
        assert_eq!(Money::parse_decimal("abc"), None);
        assert_eq!(Money::parse_decimal("1.2.3"), None);
        assert_eq!(Money::parse_decimal("NaN"), None);
        assert_eq!(Money::parse_decimal("inf"), None);
        assert_eq!(Money::parse_decimal("."), None);
    }

    #[test]
    fn test_parse_decimal_float_syntax() {
        assert_eq!(Money::parse_decimal("1e3"), Some(Money::from_cents(100_000)));
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Money::from_f64(100.0), Some(Money::from_cents(10000)));
        assert_eq!(Money::from_f64(0.1 + 0.2), Some(Money::from_cents(30)));
        assert_eq!(Money::from_f64(12.345), Some(Money::from_cents(1235)));
        assert_eq!(Money::from_f64(f64::INFINITY), None);
        assert_eq!(Money::from_f64(1e300), None);
    }

    #[test]
    fn test_percentage() {
        let subtotal = Money::from_cents(10000);
        assert_eq!(subtotal.percentage(DiscountRate::from_bps(1000)).cents(), 1000);
        assert_eq!(subtotal.percentage(DiscountRate::from_bps(10000)).cents(), 10000);
        assert_eq!(subtotal.percentage(DiscountRate::zero()).cents(), 0);

        // 333 × 12.5% = 41.625 → 42
        assert_eq!(
            Money::from_cents(333).percentage(DiscountRate::from_bps(1250)).cents(),
            42
        );
    }

    #[test]
    fn test_assurance_tax_rate() {
        // 10% of $123.45 = $12.345 → $12.35
        let base = Money::from_cents(12345);
        assert_eq!(base.percentage(crate::ASSURANCE_TAX_RATE).cents(), 1235);
        assert_eq!(Money::from_cents(1000).percentage(DiscountRate::from_bps(825)).cents(), 83);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert!(Money::from_cents(-1).clamp_non_negative().is_zero());
        assert_eq!(Money::from_cents(1).clamp_non_negative().cents(), 1);
    }

    #[test]
    fn test_serialize_as_decimal_units() {
        let json = serde_json::to_string(&Money::from_cents(1250)).unwrap();
        assert_eq!(json, "12.5");
        let json = serde_json::to_string(&Money::from_cents(8500)).unwrap();
        assert_eq!(json, "85.0");
    }

    #[test]
    fn test_deserialize_lenient() {
        let parse = |s: &str| serde_json::from_str::<Money>(s).unwrap();
        assert_eq!(parse("12.5"), Money::from_cents(1250));
        assert_eq!(parse("12"), Money::from_cents(1200));
        assert_eq!(parse("\"7.25\""), Money::from_cents(725));
        assert_eq!(parse("null"), Money::zero());
        assert_eq!(parse("\"abc\""), Money::zero());
        assert_eq!(parse("true"), Money::zero());
        assert_eq!(parse("{\"a\":1}"), Money::zero());
    }

    #[test]
    fn test_discount_rate_clamps() {
        assert_eq!(DiscountRate::from_bps(20000).bps(), 10000);
        assert_eq!(DiscountRate::from_percentage(150.0).bps(), 10000);
        assert_eq!(DiscountRate::from_percentage(-5.0).bps(), 0);
        assert_eq!(DiscountRate::from_percentage(f64::NAN).bps(), 0);
        assert_eq!(DiscountRate::from_percentage(12.5).bps(), 1250);
        assert_eq!(DiscountRate::from_stored(-3).bps(), 0);
    }

    #[test]
    fn test_discount_rate_display() {
        assert_eq!(DiscountRate::from_bps(1000).to_string(), "10%");
        assert_eq!(DiscountRate::from_bps(1250).to_string(), "12.5%");
        assert_eq!(DiscountRate::from_bps(25).to_string(), "0.25%");
        assert_eq!(DiscountRate::from_bps(1205).to_string(), "12.05%");
    }

    #[test]
    fn test_discount_rate_serde() {
        let rate: DiscountRate = serde_json::from_str("\"15\"").unwrap();
        assert_eq!(rate.bps(), 1500);
        let rate: DiscountRate = serde_json::from_str("null").unwrap();
        assert!(rate.is_zero());
        assert_eq!(serde_json::to_string(&DiscountRate::from_bps(1250)).unwrap(), "12.5");
    }
}
