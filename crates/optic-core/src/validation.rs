//! # Validation Module
//!
//! Input validation for the product catalog.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Catalog (strict)                   Receipts (lenient)                  │
//! │  ────────────────                   ──────────────────                  │
//! │  THIS MODULE rejects a blank        crate::sanitize defaults every      │
//! │  name, an overlong name or a        malformed field and never fails     │
//! │  negative price                                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  SQLite: UNIQUE(name), NOT NULL, CHECK(price_cents >= 0)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::ProductInput;
use crate::MAX_PRODUCT_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a product name.
///
/// ```rust
/// use optic_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Ray-Ban Aviator").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates product input and returns it with the name trimmed.
///
/// ```rust
/// use optic_core::money::Money;
/// use optic_core::types::ProductInput;
/// use optic_core::validation::validate_product_input;
///
/// let input = ProductInput { name: "  Hard Case ".into(), price: Money::from_cents(900) };
/// assert_eq!(validate_product_input(input).unwrap().name, "Hard Case");
/// ```
pub fn validate_product_input(input: ProductInput) -> ValidationResult<ProductInput> {
    validate_product_name(&input.name)?;

    if input.price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(ProductInput {
        name: input.name.trim().to_string(),
        price: input.price,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
