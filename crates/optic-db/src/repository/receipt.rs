//! # Receipt Repository
//!
//! Database operations for receipts.
//!
//! ## Receipt Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Receipt Lifecycle                                 │
//! │                                                                         │
//! │  1. INSERT                                                             │
//! │     └── insert(receipt) → id + created_at assigned,                    │
//! │                           total / balance_due recomputed               │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── list() newest first, get_by_id(id)                             │
//! │                                                                         │
//! │  3. DELETE                                                             │
//! │     └── delete(id)                                                     │
//! │                                                                         │
//! │  Receipts are never updated in place.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage Format
//! `right_eye`, `left_eye` and `products` are JSON text columns. Reading
//! them goes through the same lenient parsing as HTTP input, so a damaged
//! column yields blanks instead of an error.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use optic_core::{line_items_from_value, DiscountRate, Money, Prescription, Receipt};

/// Row shape of the `receipts` table.
#[derive(Debug, sqlx::FromRow)]
struct ReceiptRow {
    id: String,
    date: DateTime<Utc>,
    client_name: String,
    client_phone: String,
    right_eye: String,
    left_eye: String,
    products: String,
    discount_bps: i64,
    numerical_discount_cents: i64,
    advance_payment_cents: i64,
    total_cents: i64,
    balance_due_cents: i64,
    created_at: DateTime<Utc>,
}

impl From<ReceiptRow> for Receipt {
    fn from(row: ReceiptRow) -> Self {
        let right_eye = parse_column(&row.id, "right_eye", &row.right_eye);
        let left_eye = parse_column(&row.id, "left_eye", &row.left_eye);
        let products = parse_column(&row.id, "products", &row.products);

        Receipt {
            date: row.date,
            client_name: row.client_name,
            client_phone: row.client_phone,
            right_eye: Prescription::from_value(&right_eye),
            left_eye: Prescription::from_value(&left_eye),
            products: line_items_from_value(&products),
            discount: DiscountRate::from_stored(row.discount_bps),
            numerical_discount: Money::from_cents(row.numerical_discount_cents),
            advance_payment: Money::from_cents(row.advance_payment_cents),
            total: Money::from_cents(row.total_cents),
            balance_due: Money::from_cents(row.balance_due_cents),
            created_at: Some(row.created_at),
            id: Some(row.id),
        }
    }
}

fn parse_column(id: &str, column: &str, text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|e| {
        warn!(receipt_id = %id, column, error = %e, "Unreadable JSON column, using defaults");
        Value::Null
    })
}

const SELECT_RECEIPT: &str = r#"
    SELECT
        id, date, client_name, client_phone,
        right_eye, left_eye, products,
        discount_bps, numerical_discount_cents, advance_payment_cents,
        total_cents, balance_due_cents, created_at
    FROM receipts
"#;

/// Repository for receipt database operations.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    /// Creates a new ReceiptRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Lists every receipt, newest `date` first.
    pub async fn list(&self) -> DbResult<Vec<Receipt>> {
        let rows = sqlx::query_as::<_, ReceiptRow>(&format!(
            "{SELECT_RECEIPT} ORDER BY date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed receipts");
        Ok(rows.into_iter().map(Receipt::from).collect())
    }

    /// Gets a receipt by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Receipt>> {
        let row = sqlx::query_as::<_, ReceiptRow>(&format!("{SELECT_RECEIPT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Receipt::from))
    }

    /// Stores a receipt and returns the stored record.
    ///
    /// A fresh ID and `created_at` are assigned, any ID on the input is
    /// ignored. `total` and `balance_due` are recomputed from the line items.
    pub async fn insert(&self, receipt: &Receipt) -> DbResult<Receipt> {
        let mut stored = receipt.clone();
        let totals = stored.totals();
        stored.id = Some(generate_id());
        stored.created_at = Some(Utc::now());
        stored.total = totals.total;
        stored.balance_due = totals.balance_due;

        let right_eye = serde_json::to_string(&stored.right_eye)?;
        let left_eye = serde_json::to_string(&stored.left_eye)?;
        let products = serde_json::to_string(&stored.products)?;

        debug!(items = stored.products.len(), "Inserting receipt");

        sqlx::query(
            r#"
            INSERT INTO receipts (
                id, date, client_name, client_phone,
                right_eye, left_eye, products,
                discount_bps, numerical_discount_cents, advance_payment_cents,
                total_cents, balance_due_cents, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9, ?10,
                ?11, ?12, ?13
            )
            "#,
        )
        .bind(&stored.id)
        .bind(stored.date)
        .bind(&stored.client_name)
        .bind(&stored.client_phone)
        .bind(right_eye)
        .bind(left_eye)
        .bind(products)
        .bind(stored.discount.bps() as i64)
        .bind(stored.numerical_discount.cents())
        .bind(stored.advance_payment.cents())
        .bind(stored.total.cents())
        .bind(stored.balance_due.cents())
        .bind(stored.created_at)
        .execute(&self.pool)
        .await?;

        info!(
            receipt_id = stored.id.as_deref().unwrap_or_default(),
            total_cents = stored.total.cents(),
            balance_due_cents = stored.balance_due.cents(),
            "Receipt created"
        );

        Ok(stored)
    }

    /// Deletes a receipt.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting receipt");

        let result = sqlx::query("DELETE FROM receipts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Receipt", id));
        }

        info!(receipt_id = %id, "Receipt deleted");
        Ok(())
    }

    /// Counts receipts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
