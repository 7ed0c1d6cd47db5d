//! # optic-core: Pure Business Logic for Lens Optic
//!
//! This crate is the **heart** of Lens Optic. It holds the catalog and
//! receipt types, the pricing calculator and the rules that turn loose form
//! input into well-formed records. Nothing in here touches a disk or a socket.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lens Optic Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend                                 │   │
//! │  │    Catalog UI ──► Receipt Form ──► History ──► PDF download     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    optic-server (axum)                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ optic-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ sanitize  │  │   │
//! │  │   │  Product  │  │   Money   │  │ calculate │  │ parse or  │  │   │
//! │  │   │  Receipt  │  │ Discount  │  │  Totals   │  │   zero    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                  │                                  │                   │
//! │  ┌───────────────▼──────────────┐  ┌────────────────▼───────────────┐  │
//! │  │   optic-db (SQLite stores)   │  │   optic-print (PDF renderer)   │  │
//! │  └──────────────────────────────┘  └────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LineItem, Receipt, Prescription)
//! - [`money`] - Money and DiscountRate with integer arithmetic
//! - [`pricing`] - The receipt totals calculator
//! - [`sanitize`] - "Parse or default" rules for form input
//! - [`error`] - Domain error types
//! - [`validation`] - Catalog input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use optic_core::money::{DiscountRate, Money};
//! use optic_core::pricing::{calculate, Adjustments};
//! use optic_core::types::LineItem;
//!
//! let items = vec![LineItem::new("Frame", Money::from_cents(10000), 1)];
//! let adjustments = Adjustments {
//!     discount: DiscountRate::from_bps(1000),
//!     numerical_discount: Money::from_cents(500),
//!     advance_payment: Money::from_cents(2000),
//! };
//!
//! let totals = calculate(&items, &adjustments);
//! assert_eq!(totals.total.cents(), 8500);
//! assert_eq!(totals.balance_due.cents(), 6500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod sanitize;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::{DiscountRate, Money};
pub use pricing::{calculate, Adjustments, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name of the synthesized insurance line item.
pub const ASSURANCE_TAX_NAME: &str = "Assurance Tax";

/// Assurance tax rate: 10% of the operator-supplied base amount.
pub const ASSURANCE_TAX_RATE: DiscountRate = DiscountRate::from_bps(1000);

/// Client name shown when the form left it blank.
pub const DEFAULT_CLIENT_NAME: &str = "Walk-in Customer";

/// Placeholder for any blank phone number or prescription value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Line item name shown when the record has none.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// Maximum length of a catalog product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;
