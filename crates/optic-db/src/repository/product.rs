//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! Products are addressed by their surrogate `id`. The `name` is unique but
//! freely editable, so renaming never changes which row an update hits.
//!
//! The listing follows `sort_order` (ties broken by name). New products go
//! to the end and [`ProductRepository::move_product`] swaps neighbours.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use optic_core::{MoveDirection, Money, Product, ProductInput};

/// Row shape of the `products` table.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price_cents: i64,
    sort_order: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price: Money::from_cents(row.price_cents),
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_PRODUCT: &str = r#"
    SELECT id, name, price_cents, sort_order, created_at, updated_at
    FROM products
"#;

const CATALOG_ORDER: &str = "ORDER BY sort_order, name";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let created = repo.insert(&ProductInput { name: "Hard Case".into(), price }).await?;
/// let all = repo.list().await?;
/// repo.delete(&created.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product in catalog order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} {CATALOG_ORDER}"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Gets a product by its exact name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE name = ?1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Inserts a new product with a generated ID, last in catalog order.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The stored product
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn insert(&self, input: &ProductInput) -> DbResult<Product> {
        let mut tx = self.pool.begin().await?;

        let sort_order: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(sort_order) + 1, 0) FROM products")
                .fetch_one(&mut *tx)
                .await?;

        let now = Utc::now();
        let product = Product {
            id: generate_id(),
            name: input.name.clone(),
            price: input.price,
            sort_order,
            created_at: now,
            updated_at: now,
        };

        debug!(name = %product.name, sort_order, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, sort_order, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(product.sort_order)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| with_name(e.into(), &product.name))?;

        tx.commit().await?;

        info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Replaces the name and price of an existing product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The updated product
    /// * `Err(DbError::NotFound)` - No product with this ID
    /// * `Err(DbError::UniqueViolation)` - New name already taken
    pub async fn update(&self, id: &str, input: &ProductInput) -> DbResult<Product> {
        debug!(id = %id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price_cents = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.price.cents())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| with_name(e.into(), &input.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(product_id = %id, name = %input.name, "Product updated");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product. Receipts that sold it keep their copies.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Swaps a product with its neighbour in catalog order and returns the
    /// reordered catalog.
    ///
    /// Moving the first product up or the last one down changes nothing.
    /// Positions are renumbered `0..n` on every move.
    ///
    /// ## Returns
    /// * `Ok(Vec<Product>)` - The whole catalog in its new order
    /// * `Err(DbError::NotFound)` - No product with this ID
    pub async fn move_product(&self, id: &str, direction: MoveDirection) -> DbResult<Vec<Product>> {
        let mut tx = self.pool.begin().await?;

        let mut ids: Vec<String> =
            sqlx::query_scalar(&format!("SELECT id FROM products {CATALOG_ORDER}"))
                .fetch_all(&mut *tx)
                .await?;

        let index = ids
            .iter()
            .position(|existing| existing == id)
            .ok_or_else(|| DbError::not_found("Product", id))?;

        match direction.neighbour(index, ids.len()) {
            Some(neighbour) => {
                ids.swap(index, neighbour);
                for (position, product_id) in ids.iter().enumerate() {
                    sqlx::query("UPDATE products SET sort_order = ?2 WHERE id = ?1")
                        .bind(product_id)
                        .bind(position as i64)
                        .execute(&mut *tx)
                        .await?;
                }
                info!(product_id = %id, ?direction, position = neighbour, "Product moved");
            }
            None => {
                debug!(product_id = %id, ?direction, "Product already at the edge");
            }
        }
        tx.commit().await?;

        self.list().await
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Fills in the offending name on a unique violation.
fn with_name(err: DbError, name: &str) -> DbError {
    match err {
        DbError::UniqueViolation { .. } => DbError::duplicate("name", name),
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use optic_core::{Money, MoveDirection, ProductInput};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn input(name: &str, cents: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price: Money::from_cents(cents),
        }
    }

    #[tokio::test]
    async fn test_create_then_list_then_delete() {
        let db = setup().await;
        let repo = db.products();

        let created = repo.insert(&input("Titanium Frame", 12999)).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Titanium Frame");
        assert_eq!(listed[0].price.cents(), 12999);
        assert_eq!(listed[0].id, created.id);

        repo.delete(&created.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    async fn names(db: &Database) -> Vec<String> {
        db.products()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let db = setup().await;
        let repo = db.products();

        let first = repo.insert(&input("Microfiber Cloth", 300)).await.unwrap();
        repo.insert(&input("Anti-glare Coating", 2500)).await.unwrap();
        let last = repo.insert(&input("Hard Case", 900)).await.unwrap();

        assert_eq!(first.sort_order, 0);
        assert_eq!(last.sort_order, 2);
        assert_eq!(
            names(&db).await,
            ["Microfiber Cloth", "Anti-glare Coating", "Hard Case"]
        );
    }

    #[tokio::test]
    async fn test_move_product_swaps_neighbours() {
        let db = setup().await;
        let repo = db.products();

        repo.insert(&input("Frame", 10000)).await.unwrap();
        repo.insert(&input("Lens", 4000)).await.unwrap();
        let case = repo.insert(&input("Case", 900)).await.unwrap();

        let moved = repo.move_product(&case.id, MoveDirection::Up).await.unwrap();
        let order: Vec<&str> = moved.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(order, ["Frame", "Case", "Lens"]);
        assert_eq!(
            moved.iter().map(|p| p.sort_order).collect::<Vec<_>>(),
            [0, 1, 2]
        );

        repo.move_product(&case.id, MoveDirection::Up).await.unwrap();
        assert_eq!(names(&db).await, ["Case", "Frame", "Lens"]);

        repo.move_product(&case.id, MoveDirection::Down).await.unwrap();
        assert_eq!(names(&db).await, ["Frame", "Case", "Lens"]);
    }

    #[tokio::test]
    async fn test_move_at_edges_is_a_no_op() {
        let db = setup().await;
        let repo = db.products();

        let top = repo.insert(&input("Frame", 10000)).await.unwrap();
        let bottom = repo.insert(&input("Lens", 4000)).await.unwrap();

        repo.move_product(&top.id, MoveDirection::Up).await.unwrap();
        repo.move_product(&bottom.id, MoveDirection::Down).await.unwrap();

        assert_eq!(names(&db).await, ["Frame", "Lens"]);
    }

    #[tokio::test]
    async fn test_move_missing_product() {
        let db = setup().await;

        let err = db
            .products()
            .move_product("nope", MoveDirection::Down)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_new_product_goes_last_after_moves() {
        let db = setup().await;
        let repo = db.products();

        repo.insert(&input("Frame", 10000)).await.unwrap();
        let lens = repo.insert(&input("Lens", 4000)).await.unwrap();
        repo.move_product(&lens.id, MoveDirection::Up).await.unwrap();

        let case = repo.insert(&input("Case", 900)).await.unwrap();

        assert_eq!(case.sort_order, 2);
        assert_eq!(names(&db).await, ["Lens", "Frame", "Case"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let db = setup().await;
        let repo = db.products();

        repo.insert(&input("Hard Case", 900)).await.unwrap();
        let err = repo.insert(&input("Hard Case", 1200)).await.unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "name");
                assert_eq!(value, "Hard Case");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_renames_by_id() {
        let db = setup().await;
        let repo = db.products();

        let created = repo.insert(&input("Single Vision Lens", 4000)).await.unwrap();
        let updated = repo
            .update(&created.id, &input("Single Vision Lens 1.67", 5500))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Single Vision Lens 1.67");
        assert_eq!(updated.price.cents(), 5500);
        assert!(repo.get_by_name("Single Vision Lens").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = setup().await;

        let err = db
            .products()
            .update("00000000-0000-0000-0000-000000000000", &input("Ghost", 1))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let db = setup().await;

        let err = db.products().delete("nope").await.unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
