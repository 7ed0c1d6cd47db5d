//! # Error Types
//!
//! Domain-specific error types for optic-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  optic-core errors (this file)                                         │
//! │  └── ValidationError  - Catalog input rejected                         │
//! │                                                                         │
//! │  optic-db errors       └── DbError      - Store failures               │
//! │  optic-print errors    └── RenderError  - Content vs stream failures   │
//! │  optic-server          └── ApiError     - What the browser sees        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed numbers on a receipt never reach this module: they are
//! defaulted by [`crate::sanitize`] instead of rejected.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Only the catalog is strict; receipts are sanitized leniently.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
