//! # optic-print: Receipt Document Renderer
//!
//! Produces a printable A4 PDF from a [`Receipt`], either a stored record
//! or the live form state.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Receipt ──► layout::receipt_lines ──► layout::paginate ──► render      │
//! │              (text, pure)              (wrap + page        (printpdf,   │
//! │               totals via                breaks, pure)       Helvetica)  │
//! │               optic_core::pricing)                              │       │
//! │                                                                 ▼       │
//! │                                                      Vec<u8> or         │
//! │                                                      RenderError        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let bytes = optic_print::render_receipt(&receipt, &RenderOptions::default())?;
//! let filename = optic_print::suggested_filename(&receipt);
//! ```

pub mod error;
pub mod layout;
pub mod metrics;
pub mod render;

pub use error::{RenderError, RenderResult};
pub use layout::{receipt_lines, Line, Style};
pub use render::render_receipt;

use optic_core::Receipt;

/// MIME type of rendered documents.
pub const CONTENT_TYPE: &str = "application/pdf";

/// Presentation settings for a rendered receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Centered title line.
    pub title: String,
    /// Prefix for every amount.
    pub currency_symbol: String,
    /// Centered closing line.
    pub footer: String,
    /// Offset from UTC for the printed date.
    pub utc_offset_minutes: i32,
}

impl RenderOptions {
    /// Options for a named shop: the title becomes `"<shop> Receipt"`.
    pub fn for_shop(shop_name: &str) -> Self {
        RenderOptions {
            title: format!("{} Receipt", shop_name.trim()),
            ..RenderOptions::default()
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            title: "Lens Optic Receipt".to_string(),
            currency_symbol: "$".to_string(),
            footer: "Thank you for your business!".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

/// Download name for a receipt: `receipt-YYYYMMDD-HHMMSS.pdf` (UTC).
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use optic_core::Receipt;
///
/// let receipt = Receipt::from_value(&serde_json::json!({}), Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap());
/// assert_eq!(optic_print::suggested_filename(&receipt), "receipt-20240309-140507.pdf");
/// ```
pub fn suggested_filename(receipt: &Receipt) -> String {
    format!("receipt-{}.pdf", receipt.date.format("%Y%m%d-%H%M%S"))
}
