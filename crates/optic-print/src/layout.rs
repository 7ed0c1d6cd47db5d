//! # Receipt Layout
//!
//! Composes the text of a receipt and places it on A4 pages. Everything
//! here is pure, so the printed wording can be tested without opening a
//! PDF.
//!
//! ## Document Structure
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              Lens Optic Receipt              │  Title, centered
//! │                                              │
//! │  Date: October 19, 2026 14:05                │
//! │  Client: Walk-in Customer                    │
//! │  Phone: N/A                                  │
//! │                                              │
//! │  Prescription                                │  Heading
//! │  Right Eye:                                  │
//! │  SPH: -1.25 CYL: N/A AXE: 90                 │
//! │  Left Eye:                                   │
//! │  SPH: N/A CYL: N/A AXE: N/A                  │
//! │                                              │
//! │  Products                                    │  Heading
//! │  Frame x1 @ $100.00 = $100.00                │
//! │                                              │
//! │  Subtotal: $100.00                           │
//! │  Discount: 10%                 (only if > 0) │
//! │  Additional Discount: $5.00    (only if > 0) │
//! │  Total: $85.00                               │
//! │  Advance Payment: $20.00                     │
//! │  Balance Due: $65.00                         │
//! │  Credit: $x.xx                 (only if > 0) │
//! │  Note: Balance payment is due ... (if owed)  │
//! │                                              │
//! │         Thank you for your business!         │  Footer, centered
//! └──────────────────────────────────────────────┘
//! ```

use chrono::{FixedOffset, Offset, Utc};
use optic_core::{Receipt, UNKNOWN_PRODUCT_NAME};

use crate::metrics;
use crate::RenderOptions;

// =============================================================================
// Page Geometry (points)
// =============================================================================

/// A4 width.
pub const PAGE_WIDTH: f32 = 595.28;
/// A4 height.
pub const PAGE_HEIGHT: f32 = 841.89;
/// Margin on all four sides.
pub const MARGIN: f32 = 50.0;
/// Line height as a multiple of the font size.
const LEADING: f32 = 1.2;

const DATE_FORMAT: &str = "%B %-d, %Y %H:%M";
const BALANCE_NOTE: &str = "Note: Balance payment is due upon delivery of the product.";

/// Usable text width between the side margins.
pub fn content_width() -> f32 {
    PAGE_WIDTH - 2.0 * MARGIN
}

// =============================================================================
// Lines
// =============================================================================

/// Typographic role of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Title,
    Heading,
    Body,
    Note,
    Footer,
}

impl Style {
    /// Font size in points.
    pub fn size(self) -> f32 {
        match self {
            Style::Title => 20.0,
            Style::Heading => 14.0,
            Style::Body => 12.0,
            Style::Note | Style::Footer => 10.0,
        }
    }

    pub fn centered(self) -> bool {
        matches!(self, Style::Title | Style::Footer)
    }
}

/// One logical line of the receipt. An empty text is vertical space.
///
/// The text only holds characters the builtin font can encode.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub style: Style,
}

impl Line {
    fn new(style: Style, text: impl AsRef<str>) -> Self {
        Line {
            text: metrics::printable(text.as_ref()),
            style,
        }
    }

    fn body(text: impl AsRef<str>) -> Self {
        Line::new(Style::Body, text)
    }

    fn blank() -> Self {
        Line::new(Style::Body, "")
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Composes the receipt text, top to bottom.
///
/// Totals are recomputed from the line items. The record's own `total`
/// and `balance_due` are ignored, so a stale record still prints the right
/// figures.
pub fn receipt_lines(receipt: &Receipt, options: &RenderOptions) -> Vec<Line> {
    let money = |m: optic_core::Money| m.format_with(&options.currency_symbol);
    let totals = receipt.totals();
    let mut lines = Vec::new();

    lines.push(Line::new(Style::Title, options.title.clone()));
    lines.push(Line::blank());

    lines.push(Line::body(format!("Date: {}", format_date(receipt, options))));
    lines.push(Line::body(format!("Client: {}", receipt.client_name_or_default())));
    lines.push(Line::body(format!("Phone: {}", receipt.client_phone_or_default())));
    lines.push(Line::blank());

    lines.push(Line::new(Style::Heading, "Prescription"));
    for (label, eye) in [("Right Eye:", &receipt.right_eye), ("Left Eye:", &receipt.left_eye)] {
        let [sph, cyl, axe] = eye.display_values();
        lines.push(Line::body(label));
        lines.push(Line::body(format!("SPH: {sph} CYL: {cyl} AXE: {axe}")));
    }
    lines.push(Line::blank());

    lines.push(Line::new(Style::Heading, "Products"));
    for item in &receipt.products {
        let name = if item.name.trim().is_empty() {
            UNKNOWN_PRODUCT_NAME
        } else {
            item.name.as_str()
        };
        lines.push(Line::body(format!(
            "{} x{} @ {} = {}",
            name,
            item.quantity,
            money(item.price),
            money(item.line_total())
        )));
    }
    lines.push(Line::blank());

    lines.push(Line::body(format!("Subtotal: {}", money(totals.subtotal))));
    if !receipt.discount.is_zero() {
        lines.push(Line::body(format!("Discount: {}", receipt.discount)));
    }
    if totals.numerical_discount.is_positive() {
        lines.push(Line::body(format!(
            "Additional Discount: {}",
            money(totals.numerical_discount)
        )));
    }
    lines.push(Line::body(format!("Total: {}", money(totals.total))));
    lines.push(Line::body(format!(
        "Advance Payment: {}",
        money(totals.advance_payment)
    )));
    lines.push(Line::body(format!("Balance Due: {}", money(totals.balance_due))));
    if totals.credit.is_positive() {
        lines.push(Line::body(format!("Credit: {}", money(totals.credit))));
    }
    if totals.balance_due.is_positive() {
        lines.push(Line::new(Style::Note, BALANCE_NOTE));
    }

    lines.push(Line::blank());
    lines.push(Line::new(Style::Footer, options.footer.clone()));

    lines
}

fn format_date(receipt: &Receipt, options: &RenderOptions) -> String {
    let offset = FixedOffset::east_opt(options.utc_offset_minutes.saturating_mul(60))
        .unwrap_or_else(|| Utc.fix());
    receipt
        .date
        .with_timezone(&offset)
        .format(DATE_FORMAT)
        .to_string()
}

// =============================================================================
// Pagination
// =============================================================================

/// A piece of text at an absolute position, in points from the bottom-left
/// corner of its page.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub text: String,
    pub size: f32,
    pub x: f32,
    /// Baseline.
    pub y: f32,
}

/// Wraps and positions lines, starting a new page whenever the next line
/// would cross the bottom margin.
///
/// Always returns at least one page.
pub fn paginate(lines: &[Line]) -> Vec<Vec<Placed>> {
    let top = PAGE_HEIGHT - MARGIN;
    let width = content_width();

    let mut pages: Vec<Vec<Placed>> = vec![Vec::new()];
    let mut cursor = top;

    for line in lines {
        let size = line.style.size();
        let height = size * LEADING;

        if line.is_blank() {
            // Vertical space at the top of a page is dropped.
            if cursor < top {
                cursor -= height;
            }
            continue;
        }

        for segment in metrics::wrap(&line.text, size, width) {
            if cursor - height < MARGIN {
                pages.push(Vec::new());
                cursor = top;
            }

            let x = if line.style.centered() {
                MARGIN + ((width - metrics::text_width(&segment, size)) / 2.0).max(0.0)
            } else {
                MARGIN
            };

            if let Some(page) = pages.last_mut() {
                page.push(Placed {
                    text: segment,
                    size,
                    x,
                    y: cursor - size,
                });
            }
            cursor -= height;
        }
    }

    pages
}

// =============================================================================
// Unit Tests
// =============================================================================
