//! # Domain Types
//!
//! Core domain types used throughout Lens Optic.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌──────────────────────────────────────┐   │
//! │  │    Product      │        │              Receipt                 │   │
//! │  │  ─────────────  │  copy  │  ──────────────────────────────────  │   │
//! │  │  id (UUID)      │ ─────► │  id, date, client_name/phone         │   │
//! │  │  name (unique)  │ fields │  right_eye, left_eye : Prescription  │   │
//! │  │  price          │        │  products : [LineItem]  (snapshot)   │   │
//! │  └─────────────────┘        │  discount, numerical_discount        │   │
//! │                             │  advance_payment, total, balance_due │   │
//! │                             └──────────────────────────────────────┘   │
//! │                                                                         │
//! │  ReceiptDraft = Receipt + assurance_tax_base  (form state, never stored)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A product has:
//! - `id`: UUID v4, immutable, used for updates and deletes
//! - `name`: unique and human-readable, freely renamable
//!
//! A receipt never references a product by key. Line items are copies.
//!
//! ## Lenient Input
//! `Prescription`, `LineItem`, `Receipt` and `ReceiptDraft` deserialize
//! through [`crate::sanitize`]: wrong types and missing fields are defaulted,
//! never rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use ts_rs::TS;

use crate::money::{DiscountRate, Money};
use crate::pricing::{self, Adjustments, Totals};
use crate::sanitize;
use crate::{
    ASSURANCE_TAX_NAME, ASSURANCE_TAX_RATE, DEFAULT_CLIENT_NAME, NOT_AVAILABLE,
};

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across the catalog.
    pub name: String,

    /// Unit price in currency units on the wire.
    #[ts(type = "number")]
    pub price: Money,

    /// Position in the catalog listing, lowest first.
    #[serde(default)]
    #[ts(type = "number")]
    pub sort_order: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Copies this product into a receipt line.
    pub fn to_line_item(&self, quantity: i64) -> LineItem {
        LineItem::new(&self.name, self.price, quantity)
    }
}

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    #[ts(type = "number")]
    pub price: Money,
}

/// Which neighbour a product swaps places with in the catalog listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MoveDirection {
    /// Towards the top of the list.
    Up,
    /// Towards the bottom of the list.
    Down,
}

impl MoveDirection {
    /// Index of the neighbour of `index` in a list of `len` entries, if any.
    pub fn neighbour(self, index: usize, len: usize) -> Option<usize> {
        match self {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&next| next < len),
        }
    }
}

// =============================================================================
// Prescription
// =============================================================================

/// Refraction values for one eye. Free text, blank when not measured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Prescription {
    /// Sphere.
    pub sph: String,
    /// Cylinder.
    pub cyl: String,
    /// Axis.
    pub axe: String,
}

impl Prescription {
    /// Reads a prescription from any JSON value. Non-objects are blank.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .map(sanitize::text_from_value)
                .unwrap_or_default()
        };
        if !value.is_object() {
            return Prescription::default();
        }
        Prescription {
            sph: field("sph"),
            cyl: field("cyl"),
            axe: field("axe"),
        }
    }

    /// The three values for printing, blanks replaced by `N/A`.
    pub fn display_values(&self) -> [&str; 3] {
        [
            sanitize::or_placeholder(&self.sph, NOT_AVAILABLE),
            sanitize::or_placeholder(&self.cyl, NOT_AVAILABLE),
            sanitize::or_placeholder(&self.axe, NOT_AVAILABLE),
        ]
    }
}

impl<'de> Deserialize<'de> for Prescription {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Prescription::from_value(&value))
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One entry on a receipt: a frozen copy of a product at the time of sale.
///
/// `total` is `price × quantity` unless an explicit figure was supplied,
/// as for the synthesized assurance tax line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub price: Money,
    /// Always at least 1.
    pub quantity: i64,
    /// Explicit total overriding `price × quantity`.
    pub total: Option<Money>,
}

impl LineItem {
    /// Creates a line whose total follows `price × quantity`.
    ///
    /// Quantities below one are raised to one.
    pub fn new(name: impl Into<String>, price: Money, quantity: i64) -> Self {
        LineItem {
            name: name.into(),
            price,
            quantity: quantity.max(1),
            total: None,
        }
    }

    /// Synthesizes the "Assurance Tax" line: 10% of `base`, quantity 1.
    ///
    /// ```rust
    /// use optic_core::money::Money;
    /// use optic_core::types::LineItem;
    ///
    /// let line = LineItem::assurance_tax(Money::from_cents(20000));
    /// assert_eq!(line.name, "Assurance Tax");
    /// assert_eq!(line.price.cents(), 2000);
    /// assert_eq!(line.line_total().cents(), 2000);
    /// ```
    pub fn assurance_tax(base: Money) -> Self {
        let tax = base.percentage(ASSURANCE_TAX_RATE);
        LineItem {
            name: ASSURANCE_TAX_NAME.to_string(),
            price: tax,
            quantity: 1,
            total: Some(tax),
        }
    }

    /// The line's contribution to the subtotal.
    pub fn line_total(&self) -> Money {
        self.total
            .unwrap_or_else(|| self.price.multiply_quantity(self.quantity))
    }

    /// Reads a line from any JSON value.
    ///
    /// Returns `None` for non-objects. `product` is accepted in place of
    /// `name`. A zero or unparseable `total` counts as not supplied.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let field = |key: &str| value.get(key).unwrap_or(&Value::Null);

        let mut name = sanitize::text_from_value(field("name"));
        if name.is_empty() {
            name = sanitize::text_from_value(field("product"));
        }

        Some(LineItem {
            name,
            price: sanitize::money_from_value(field("price")),
            quantity: sanitize::quantity_from_value(field("quantity")),
            total: sanitize::parse_money(field("total")).filter(|total| !total.is_zero()),
        })
    }
}

/// Wire shape: the effective total is always written out.
#[derive(Serialize)]
struct LineItemOut<'a> {
    name: &'a str,
    price: Money,
    quantity: i64,
    total: Money,
}

impl Serialize for LineItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        LineItemOut {
            name: &self.name,
            price: self.price,
            quantity: self.quantity,
            total: self.line_total(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LineItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(LineItem::from_value(&value)
            .unwrap_or_else(|| LineItem::new(String::new(), Money::zero(), 1)))
    }
}

/// Reads a product list, skipping entries that are not objects.
pub fn line_items_from_value(value: &Value) -> Vec<LineItem> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(LineItem::from_value).collect())
        .unwrap_or_default()
}

// =============================================================================
// Receipt
// =============================================================================

/// A sales receipt.
///
/// The same shape serves the live form, the quote response, the stored
/// record and the document renderer. `id` and `created_at` are only set
/// once the store has accepted the receipt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub date: DateTime<Utc>,
    pub client_name: String,
    pub client_phone: String,
    pub right_eye: Prescription,
    pub left_eye: Prescription,
    pub products: Vec<LineItem>,

    /// Percentage discount on the subtotal.
    pub discount: DiscountRate,

    /// Flat discount after the percentage discount.
    pub numerical_discount: Money,

    pub advance_payment: Money,
    pub total: Money,
    pub balance_due: Money,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Receipt {
    /// Reads a receipt from any JSON value, defaulting every malformed or
    /// missing field. A missing date becomes `now`.
    pub fn from_value(value: &Value, now: DateTime<Utc>) -> Self {
        let field = |key: &str| value.get(key).unwrap_or(&Value::Null);
        let id = sanitize::text_from_value(field("id"));
        let created_at = match field("created_at") {
            Value::String(s) => sanitize::parse_date(s),
            _ => None,
        };

        Receipt {
            id: (!id.is_empty()).then_some(id),
            date: sanitize::date_from_value(field("date"), now),
            client_name: sanitize::text_from_value(field("client_name")),
            client_phone: sanitize::text_from_value(field("client_phone")),
            right_eye: Prescription::from_value(field("right_eye")),
            left_eye: Prescription::from_value(field("left_eye")),
            products: line_items_from_value(field("products")),
            discount: sanitize::rate_from_value(field("discount")),
            numerical_discount: sanitize::money_from_value(field("numerical_discount"))
                .clamp_non_negative(),
            advance_payment: sanitize::money_from_value(field("advance_payment"))
                .clamp_non_negative(),
            total: sanitize::money_from_value(field("total")),
            balance_due: sanitize::money_from_value(field("balance_due")),
            created_at,
        }
    }

    /// The discount settings carried by this receipt.
    pub fn adjustments(&self) -> Adjustments {
        Adjustments {
            discount: self.discount,
            numerical_discount: self.numerical_discount,
            advance_payment: self.advance_payment,
        }
    }

    /// Recomputes the totals from the line items. Stored `total` and
    /// `balance_due` are never consulted.
    pub fn totals(&self) -> Totals {
        pricing::calculate(&self.products, &self.adjustments())
    }

    /// Client name for display.
    pub fn client_name_or_default(&self) -> &str {
        sanitize::or_placeholder(&self.client_name, DEFAULT_CLIENT_NAME)
    }

    /// Client phone for display.
    pub fn client_phone_or_default(&self) -> &str {
        sanitize::or_placeholder(&self.client_phone, NOT_AVAILABLE)
    }
}

impl<'de> Deserialize<'de> for Receipt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Receipt::from_value(&value, Utc::now()))
    }
}

// =============================================================================
// Receipt Draft
// =============================================================================

/// The receipt form as the operator is editing it.
///
/// Adds the assurance tax base, which only exists until the receipt is
/// finalized into an ordinary line item.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptDraft {
    pub receipt: Receipt,

    /// Base amount for the assurance tax line. Zero means no line.
    pub assurance_tax_base: Money,
}

impl ReceiptDraft {
    /// Reads a draft from any JSON value.
    pub fn from_value(value: &Value, now: DateTime<Utc>) -> Self {
        ReceiptDraft {
            receipt: Receipt::from_value(value, now),
            assurance_tax_base: value
                .get("assurance_tax_base")
                .map(sanitize::money_from_value)
                .unwrap_or_default(),
        }
    }

    /// Turns the form state into a complete receipt.
    ///
    /// ```text
    /// draft ──► + Assurance Tax line (base > 0)
    ///       ──► blank client fields get placeholders
    ///       ──► total / balance_due recomputed
    /// ```
    pub fn finalize(self) -> Receipt {
        let mut receipt = self.receipt;

        if self.assurance_tax_base.is_positive() {
            receipt
                .products
                .push(LineItem::assurance_tax(self.assurance_tax_base));
        }

        receipt.client_name = receipt.client_name_or_default().to_string();
        receipt.client_phone = receipt.client_phone_or_default().to_string();

        let totals = receipt.totals();
        receipt.total = totals.total;
        receipt.balance_due = totals.balance_due;
        receipt
    }
}

impl<'de> Deserialize<'de> for ReceiptDraft {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(ReceiptDraft::from_value(&value, Utc::now()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
