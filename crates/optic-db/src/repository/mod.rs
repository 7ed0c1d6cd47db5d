//! # Repository Module
//!
//! Database repository implementations for Lens Optic.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Independent Record Sets                          │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list()        db.receipts().insert(&receipt)    │
//! │       ▼                                                                 │
//! │  ProductRepository                   ReceiptRepository                 │
//! │  ├── list()                          ├── list()      (newest first)    │
//! │  ├── get_by_id(id)                   ├── get_by_id(id)                 │
//! │  ├── insert(input)                   ├── insert(receipt)               │
//! │  ├── update(id, input)               └── delete(id)                    │
//! │  ├── move_product(id, direction)                                        │
//! │  └── delete(id)                                                         │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  products table                      receipts table (JSON columns)     │
//! │                                                                         │
//! │  No query filtering or pagination. Last write wins.                    │
//! │  Product insert and move_product each run in one transaction.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod product;
pub mod receipt;

use uuid::Uuid;

/// Generates a new record ID (UUID v4).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
