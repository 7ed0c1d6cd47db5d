//! # Sanitize Module
//!
//! "Parse or default" rules for values typed into the receipt form.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Form value              Money      Quantity    DiscountRate   Text     │
//! │  ─────────────────────   ────────   ─────────   ────────────   ──────   │
//! │  12.5                    $12.50     12          12.5%          "12.5"   │
//! │  "12.50"                 $12.50     12          12.5%          "12.50"  │
//! │  "" / null / missing     $0.00      1           0%             ""       │
//! │  "abc" / true / {...}    $0.00      1           0%             ""       │
//! │  -3                      -$3.00     1           0%             "-3"     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in here returns an error. Malformed input is absorbed at the
//! boundary so that no invalid number ever reaches a stored or printed total.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::money::{DiscountRate, Money};

/// Naive timestamp layouts accepted for receipt dates, interpreted as UTC.
const NAIVE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// =============================================================================
// Numbers
// =============================================================================

/// Reads a money amount in currency units. Unparseable input is zero.
pub fn money_from_value(value: &Value) -> Money {
    parse_money(value).unwrap_or_default()
}

/// Like [`money_from_value`] but tells "absent or garbage" apart from zero.
pub fn parse_money(value: &Value) -> Option<Money> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(units) => units.checked_mul(100).map(Money::from_cents),
            None => n.as_f64().and_then(Money::from_f64),
        },
        Value::String(s) => Money::parse_decimal(s),
        _ => None,
    }
}

/// Reads a percentage discount. Unparseable input is 0%, range is clamped.
pub fn rate_from_value(value: &Value) -> DiscountRate {
    parse_float(value)
        .map(DiscountRate::from_percentage)
        .unwrap_or_default()
}

/// Reads a line item quantity.
///
/// Fractions are truncated. Anything missing, unparseable or below one
/// becomes one.
pub fn quantity_from_value(value: &Value) -> i64 {
    let quantity = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    };
    match quantity {
        Some(q) if q >= 1 => q,
        _ => 1,
    }
}

fn parse_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn truncate(f: f64) -> Option<i64> {
    if f.is_finite() && f.abs() < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

// =============================================================================
// Text
// =============================================================================

/// Reads free text, trimmed. Numbers keep their JSON spelling so that a
/// prescription value sent as `-1.25` stays `"-1.25"`.
///
/// Typographic minus and dash characters (U+2012 to U+2015, U+2212) become
/// an ASCII hyphen-minus, so `"\u{2212}1.25"` reads as `"-1.25"`.
pub fn text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => normalize_dashes(s.trim()),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn normalize_dashes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{2012}'..='\u{2015}' | '\u{2212}' => '-',
            other => other,
        })
        .collect()
}

/// Returns `value`, or `placeholder` when it is blank.
///
/// ```rust
/// use optic_core::sanitize::or_placeholder;
///
/// assert_eq!(or_placeholder("  ", "N/A"), "N/A");
/// assert_eq!(or_placeholder("-1.25", "N/A"), "-1.25");
/// ```
pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

// =============================================================================
// Dates
// =============================================================================

/// Reads a receipt timestamp, falling back to `fallback`.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` and a bare
/// `YYYY-MM-DD` (midnight). Naive forms are taken as UTC.
pub fn date_from_value(value: &Value, fallback: DateTime<Utc>) -> DateTime<Utc> {
    match value {
        Value::String(s) => parse_date(s).unwrap_or(fallback),
        _ => fallback,
    }
}

/// Parses one of the accepted timestamp layouts.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// =============================================================================
// Unit Tests
// =============================================================================
