//! Category Repository

use super::{RepoError, RepoResult, is_unique_violation_on};
use shared::error::ErrorCode;
use shared::models::{CategoryInput, CategoryRecord, DEFAULT_CATEGORY_SORT_ORDER};
use sqlx::SqlitePool;

/// All categories with their product counts, ordered for navigation
pub async fn list_category_summaries(pool: &SqlitePool) -> RepoResult<Vec<CategoryRecord>> {
    let categories = sqlx::query_as::<_, CategoryRecord>(
        r#"
        SELECT c.id, c.label, c.nav_label, c.description, c.sort_order,
               COUNT(p.id) AS total
        FROM product_categories c
        LEFT JOIN products p ON p.category = c.id
        GROUP BY c.id, c.label, c.nav_label, c.description, c.sort_order
        ORDER BY c.sort_order, c.label
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<CategoryRecord>> {
    let category = sqlx::query_as::<_, CategoryRecord>(
        r#"
        SELECT c.id, c.label, c.nav_label, c.description, c.sort_order,
               (SELECT COUNT(*) FROM products p WHERE p.category = c.id) AS total
        FROM product_categories c
        WHERE c.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn category_exists(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM product_categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

/// Create a category; its id is immutable afterwards
pub async fn create_category(pool: &SqlitePool, input: CategoryInput) -> RepoResult<CategoryRecord> {
    let now = shared::util::now_millis();
    let sort_order = input.sort_order.unwrap_or(DEFAULT_CATEGORY_SORT_ORDER);

    sqlx::query(
        r#"
        INSERT INTO product_categories (id, label, nav_label, description, sort_order, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.id)
    .bind(&input.label)
    .bind(&input.nav_label)
    .bind(&input.description)
    .bind(sort_order)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation_on(&e, "product_categories.id") {
            RepoError::duplicate(
                ErrorCode::CategoryIdExists,
                format!("Category '{}' already exists", input.id),
            )
        } else {
            e.into()
        }
    })?;

    tracing::info!(category_id = %input.id, "Category created");

    Ok(CategoryRecord {
        id: input.id,
        label: input.label,
        nav_label: input.nav_label,
        description: input.description,
        sort_order,
        total: 0,
    })
}

/// Delete a category; its products stay in the catalog uncategorized
pub async fn delete_category(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let result = sqlx::query("DELETE FROM product_categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::not_found(
            ErrorCode::CategoryNotFound,
            format!("Category {id} not found"),
        ));
    }
    tracing::info!(category_id = %id, "Category deleted");
    Ok(())
}
