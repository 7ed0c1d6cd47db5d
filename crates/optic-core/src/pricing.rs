//! # Pricing Module
//!
//! The receipt totals calculator. The form preview, receipt creation and
//! the printed document all call [`calculate`], so the figures the operator
//! sees are the figures that get stored and printed.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal            = Σ line_total(item)                               │
//! │  percentage_discount = round(subtotal × discount%)                      │
//! │  total               = max(subtotal − percentage_discount               │
//! │                                     − numerical_discount, 0)            │
//! │  balance_due         = max(total − advance_payment, 0)                  │
//! │  credit              = max(advance_payment − total, 0)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both `total` and `balance_due` are never negative. An advance larger
//! than the total shows up as `credit` instead of a negative balance.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{DiscountRate, Money};
use crate::types::LineItem;

/// Discount settings and payment already collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustments {
    /// Percentage of the subtotal taken off first.
    pub discount: DiscountRate,
    /// Flat amount taken off after the percentage.
    pub numerical_discount: Money,
    /// Amount collected at order time.
    pub advance_payment: Money,
}

/// The computed figures of a receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub percentage_discount: Money,
    #[ts(type = "number")]
    pub numerical_discount: Money,
    #[ts(type = "number")]
    pub total: Money,
    #[ts(type = "number")]
    pub advance_payment: Money,
    #[ts(type = "number")]
    pub balance_due: Money,
    #[ts(type = "number")]
    pub credit: Money,
}

/// Computes the totals of a list of line items.
///
/// Pure and deterministic. Negative flat discounts and advances are treated
/// as zero.
///
/// ```rust
/// use optic_core::money::{DiscountRate, Money};
/// use optic_core::pricing::{calculate, Adjustments};
/// use optic_core::types::LineItem;
///
/// let totals = calculate(
///     &[LineItem::new("Frame", Money::from_cents(10000), 1)],
///     &Adjustments {
///         discount: DiscountRate::from_bps(1000),
///         numerical_discount: Money::from_cents(500),
///         advance_payment: Money::from_cents(2000),
///     },
/// );
/// assert_eq!(totals.subtotal.cents(), 10000);
/// assert_eq!(totals.total.cents(), 8500);
/// assert_eq!(totals.balance_due.cents(), 6500);
/// ```
pub fn calculate(items: &[LineItem], adjustments: &Adjustments) -> Totals {
    let subtotal: Money = items.iter().map(LineItem::line_total).sum();
    let percentage_discount = subtotal.percentage(adjustments.discount);
    let numerical_discount = adjustments.numerical_discount.clamp_non_negative();
    let advance_payment = adjustments.advance_payment.clamp_non_negative();

    let total = (subtotal - percentage_discount - numerical_discount).clamp_non_negative();

    Totals {
        subtotal,
        percentage_discount,
        numerical_discount,
        total,
        advance_payment,
        balance_due: (total - advance_payment).clamp_non_negative(),
        credit: (advance_payment - total).clamp_non_negative(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
