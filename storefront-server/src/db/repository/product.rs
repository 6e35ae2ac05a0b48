//! Product Repository
//!
//! Catalog writes keep the product, its primary media row and its inventory
//! row in one transaction, and append to the inventory event log.

use super::{RepoError, RepoResult, is_foreign_key_violation, is_unique_violation_on};
use serde_json::json;
use shared::error::ErrorCode;
use shared::models::{
    InventoryLevels, LowStockEntry, ProductInput, ProductRecord, ProductStatus, RestockOutcome,
};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

/// Inventory event types written by the catalog and the order engine
pub mod inventory_event {
    pub const INITIAL_STOCK: &str = "INITIAL_STOCK";
    pub const PRODUCT_REGISTERED: &str = "PRODUCT_REGISTERED";
    pub const INVENTORY_ADJUSTED: &str = "INVENTORY_ADJUSTED";
    pub const RESTOCK: &str = "RESTOCK";
    pub const ORDER_ALLOCATED: &str = "ORDER_ALLOCATED";
}

pub const DEFAULT_RECENT_LIMIT: i64 = 12;

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.name, p.sku, p.price, p.currency, p.status, p.description,
           p.product_details, p.product_story, p.material_info,
           p.care_instructions, p.features,
           p.image_primary_path AS image_path, p.image_primary_alt AS image_alt,
           p.colorways AS colors, p.size_scale AS sizes, p.category,
           c.label AS category_label, c.nav_label AS category_nav_label,
           c.description AS category_description, c.sort_order AS category_sort_order,
           p.created_at, p.updated_at,
           i.on_hand, i.reserved, i.safety_stock, i.reorder_point
    FROM products p
    LEFT JOIN product_categories c ON c.id = p.category
    LEFT JOIN inventory_items i ON i.product_id = p.id
"#;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    sku: String,
    price: f64,
    currency: String,
    status: ProductStatus,
    description: Option<String>,
    product_details: Json<Vec<String>>,
    product_story: Option<String>,
    material_info: Option<String>,
    care_instructions: Json<Vec<String>>,
    features: Json<Vec<String>>,
    image_path: Option<String>,
    image_alt: Option<String>,
    colors: Json<Vec<String>>,
    sizes: Json<Vec<String>>,
    category: Option<String>,
    category_label: Option<String>,
    category_nav_label: Option<String>,
    category_description: Option<String>,
    category_sort_order: Option<i64>,
    created_at: i64,
    updated_at: i64,
    on_hand: Option<i64>,
    reserved: Option<i64>,
    safety_stock: Option<i64>,
    reorder_point: Option<i64>,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        let inventory = match (row.on_hand, row.reserved, row.safety_stock, row.reorder_point) {
            (Some(on_hand), Some(reserved), Some(safety_stock), Some(reorder_point)) => {
                Some(InventoryLevels {
                    on_hand,
                    reserved,
                    safety_stock,
                    reorder_point,
                })
            }
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            sku: row.sku,
            price: row.price,
            currency: row.currency,
            status: row.status,
            description: row.description,
            product_details: row.product_details.0,
            product_story: row.product_story,
            material_info: row.material_info,
            care_instructions: row.care_instructions.0,
            features: row.features.0,
            image_path: row.image_path,
            image_alt: row.image_alt,
            colors: row.colors.0,
            sizes: row.sizes.0,
            category: row.category,
            category_label: row.category_label,
            category_nav_label: row.category_nav_label,
            category_description: row.category_description,
            category_sort_order: row.category_sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
            inventory,
        }
    }
}

// ── Read ──

/// Catalog listing, newest first, optionally limited to one category
pub async fn list_products(
    pool: &SqlitePool,
    category: Option<&str>,
) -> RepoResult<Vec<ProductRecord>> {
    let rows = match category {
        Some(category) => {
            sqlx::query_as::<_, ProductRow>(&format!(
                "{PRODUCT_SELECT} WHERE p.category = ? ORDER BY p.created_at DESC, p.rowid DESC"
            ))
            .bind(category)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ProductRow>(&format!(
                "{PRODUCT_SELECT} ORDER BY p.created_at DESC, p.rowid DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };
    Ok(rows.into_iter().map(ProductRecord::from).collect())
}

/// Most recently created products
pub async fn list_recent_products(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<ProductRecord>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "{PRODUCT_SELECT} ORDER BY p.created_at DESC, p.rowid DESC LIMIT ?"
    ))
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(ProductRecord::from).collect())
}

pub async fn get_product_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<ProductRecord>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_SELECT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(ProductRecord::from))
}

/// Products whose on-hand stock is at or below their reorder point
pub async fn list_low_stock(pool: &SqlitePool) -> RepoResult<Vec<LowStockEntry>> {
    let entries = sqlx::query_as::<_, LowStockEntry>(
        r#"
        SELECT p.id AS product_id, p.sku, p.name, i.on_hand, i.reserved, i.reorder_point
        FROM inventory_items i
        JOIN products p ON p.id = i.product_id
        WHERE i.on_hand <= i.reorder_point
        ORDER BY i.on_hand - i.reorder_point, p.name
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

// ── Write ──

/// Create a product with its inventory row (and primary image when given)
pub async fn create_product(
    pool: &SqlitePool,
    default_currency: &str,
    input: ProductInput,
) -> RepoResult<ProductRecord> {
    let now = shared::util::now_millis();
    let product_id = shared::util::new_id();
    let currency = input.currency.as_deref().unwrap_or(default_currency);
    let status = input.status.unwrap_or_default();
    let levels = input.inventory.resolve();

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO products (
            id, sku, name, description, product_details, product_story,
            material_info, care_instructions, features, price, currency, status,
            image_primary_path, image_primary_alt, colorways, size_scale, category,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&product_id)
    .bind(&input.sku)
    .bind(&input.name)
    .bind(&input.description)
    .bind(Json(&input.product_details))
    .bind(&input.product_story)
    .bind(&input.material_info)
    .bind(Json(&input.care_instructions))
    .bind(Json(&input.features))
    .bind(input.price)
    .bind(currency)
    .bind(status)
    .bind(&input.image_path)
    .bind(&input.image_alt)
    .bind(Json(&input.colors))
    .bind(Json(&input.sizes))
    .bind(&input.category)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| product_write_error(e, &input))?;

    if let Some(image_path) = &input.image_path {
        sqlx::query(
            r#"
            INSERT INTO product_media (id, product_id, media_type, file_path, alt_text, is_primary, created_at)
            VALUES (?, ?, 'image', ?, ?, 1, ?)
            "#,
        )
        .bind(shared::util::new_id())
        .bind(&product_id)
        .bind(image_path)
        .bind(&input.image_alt)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    upsert_inventory(&mut tx, &product_id, &levels, now).await?;

    let event_type = if levels.on_hand == 0 {
        inventory_event::PRODUCT_REGISTERED
    } else {
        inventory_event::INITIAL_STOCK
    };
    insert_inventory_event(
        &mut tx,
        InventoryEvent {
            product_id: &product_id,
            order_id: None,
            event_type,
            delta: levels.on_hand,
            source: "product.create",
            metadata: json!({
                "sku": input.sku,
                "onHand": levels.on_hand,
                "reserved": levels.reserved,
            }),
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(product_id = %product_id, sku = %input.sku, on_hand = levels.on_hand, "Product created");

    get_product_by_id(pool, &product_id).await?.ok_or_else(|| {
        RepoError::not_found(
            ErrorCode::ProductNotFound,
            format!("Product {product_id} not found"),
        )
    })
}

/// Replace every mutable field of a product and its inventory counters
///
/// The primary image is kept when the input carries none.
pub async fn update_product(
    pool: &SqlitePool,
    default_currency: &str,
    product_id: &str,
    input: ProductInput,
) -> RepoResult<ProductRecord> {
    let now = shared::util::now_millis();
    let currency = input.currency.as_deref().unwrap_or(default_currency);
    let status = input.status.unwrap_or_default();
    let levels = input.inventory.resolve();

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE products SET
            sku = ?, name = ?, description = ?, product_details = ?, product_story = ?,
            material_info = ?, care_instructions = ?, features = ?, price = ?,
            currency = ?, status = ?,
            image_primary_path = COALESCE(?, image_primary_path),
            image_primary_alt = COALESCE(?, image_primary_alt),
            colorways = ?, size_scale = ?, category = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.sku)
    .bind(&input.name)
    .bind(&input.description)
    .bind(Json(&input.product_details))
    .bind(&input.product_story)
    .bind(&input.material_info)
    .bind(Json(&input.care_instructions))
    .bind(Json(&input.features))
    .bind(input.price)
    .bind(currency)
    .bind(status)
    .bind(&input.image_path)
    .bind(&input.image_alt)
    .bind(Json(&input.colors))
    .bind(Json(&input.sizes))
    .bind(&input.category)
    .bind(now)
    .bind(product_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| product_write_error(e, &input))?;

    if result.rows_affected() == 0 {
        return Err(RepoError::not_found(
            ErrorCode::ProductNotFound,
            format!("Product {product_id} not found"),
        ));
    }

    let previous_on_hand: Option<i64> =
        sqlx::query_scalar("SELECT on_hand FROM inventory_items WHERE product_id = ?")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;

    upsert_inventory(&mut tx, product_id, &levels, now).await?;

    let delta = levels.on_hand - previous_on_hand.unwrap_or(0);
    if delta != 0 {
        insert_inventory_event(
            &mut tx,
            InventoryEvent {
                product_id,
                order_id: None,
                event_type: inventory_event::INVENTORY_ADJUSTED,
                delta,
                source: "product.update",
                metadata: json!({
                    "sku": input.sku,
                    "previousOnHand": previous_on_hand,
                    "onHand": levels.on_hand,
                }),
            },
        )
        .await?;
    }

    tx.commit().await?;

    tracing::info!(product_id = %product_id, sku = %input.sku, "Product updated");

    get_product_by_id(pool, product_id).await?.ok_or_else(|| {
        RepoError::not_found(
            ErrorCode::ProductNotFound,
            format!("Product {product_id} not found"),
        )
    })
}

/// Hard delete; cascades to inventory, media and inventory events
///
/// Products referenced by order lines cannot be deleted.
pub async fn delete_product_by_id(pool: &SqlitePool, product_id: &str) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(product_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                RepoError::in_use(
                    ErrorCode::ProductHasOrders,
                    format!("Product {product_id} is referenced by existing orders"),
                )
            } else {
                e.into()
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(RepoError::not_found(
            ErrorCode::ProductNotFound,
            format!("Product {product_id} not found"),
        ));
    }

    tx.commit().await?;
    tracing::info!(product_id = %product_id, "Product deleted");
    Ok(())
}

/// Admin restock: add `quantity` to on-hand stock
pub async fn restock_product(
    pool: &SqlitePool,
    product_id: &str,
    quantity: i64,
    actor: &str,
) -> RepoResult<RestockOutcome> {
    if quantity <= 0 {
        return Err(RepoError::validation(
            ErrorCode::InventoryInvalidQuantity,
            "Restock quantity must be positive",
        ));
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let outcome = sqlx::query_as::<_, RestockOutcome>(
        r#"
        UPDATE inventory_items
        SET on_hand = on_hand + ?, updated_at = ?
        WHERE product_id = ?
        RETURNING on_hand, reserved
        "#,
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(outcome) = outcome else {
        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
        return Err(match exists {
            Some(_) => RepoError::InventoryMissing {
                product_id: product_id.to_string(),
            },
            None => RepoError::not_found(
                ErrorCode::ProductNotFound,
                format!("Product {product_id} not found"),
            ),
        });
    };

    insert_inventory_event(
        &mut tx,
        InventoryEvent {
            product_id,
            order_id: None,
            event_type: inventory_event::RESTOCK,
            delta: quantity,
            source: "admin.restock",
            metadata: json!({
                "actor": actor,
                "quantity": quantity,
                "onHand": outcome.on_hand,
            }),
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(product_id = %product_id, quantity, on_hand = outcome.on_hand, "Product restocked");
    Ok(outcome)
}

// ── Shared helpers ──

/// One row of the append-only inventory log
pub(crate) struct InventoryEvent<'a> {
    pub product_id: &'a str,
    pub order_id: Option<&'a str>,
    pub event_type: &'a str,
    pub delta: i64,
    pub source: &'a str,
    pub metadata: serde_json::Value,
}

pub(crate) async fn insert_inventory_event(
    conn: &mut SqliteConnection,
    event: InventoryEvent<'_>,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO inventory_events (id, product_id, order_id, event_type, delta, source, metadata, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(shared::util::new_id())
    .bind(event.product_id)
    .bind(event.order_id)
    .bind(event.event_type)
    .bind(event.delta)
    .bind(event.source)
    .bind(Json(&event.metadata))
    .bind(shared::util::now_millis())
    .execute(conn)
    .await?;
    Ok(())
}

async fn upsert_inventory(
    conn: &mut SqliteConnection,
    product_id: &str,
    levels: &InventoryLevels,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO inventory_items (product_id, on_hand, reserved, safety_stock, reorder_point, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT (product_id) DO UPDATE SET
            on_hand = excluded.on_hand,
            reserved = excluded.reserved,
            safety_stock = excluded.safety_stock,
            reorder_point = excluded.reorder_point,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(product_id)
    .bind(levels.on_hand)
    .bind(levels.reserved)
    .bind(levels.safety_stock)
    .bind(levels.reorder_point)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

/// Translate anticipated constraint failures on a product insert/update
fn product_write_error(err: sqlx::Error, input: &ProductInput) -> RepoError {
    if is_unique_violation_on(&err, "products.sku") {
        RepoError::duplicate(
            ErrorCode::ProductSkuExists,
            format!("Product SKU '{}' already exists", input.sku),
        )
    } else if is_foreign_key_violation(&err) {
        RepoError::validation(
            ErrorCode::CategoryNotFound,
            format!(
                "Category '{}' does not exist",
                input.category.as_deref().unwrap_or_default()
            ),
        )
    } else {
        err.into()
    }
}
