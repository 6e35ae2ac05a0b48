//! Catalog Service - products, categories and stock levels
//!
//! Validates payloads, then delegates to the product and category
//! repositories. Repository errors surface as [`AppError`] with their codes.

use crate::core::Config;
use crate::db::repository::{category, product};
use crate::utils::validation::{validate_category_input, validate_product_input};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    CategoryInput, CategoryRecord, LowStockEntry, ProductInput, ProductRecord, RestockOutcome,
};
use sqlx::SqlitePool;

const DEFAULT_RESTOCK_ACTOR: &str = "admin.dashboard";

#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: SqlitePool,
    default_currency: String,
}

impl CatalogService {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            default_currency: config.default_currency.clone(),
        }
    }

    // ── Products ──

    pub async fn create_product(&self, input: ProductInput) -> AppResult<ProductRecord> {
        validate_product_input(&input)?;
        self.check_category(input.category.as_deref()).await?;
        Ok(product::create_product(&self.pool, &self.default_currency, input).await?)
    }

    pub async fn update_product(
        &self,
        product_id: &str,
        input: ProductInput,
    ) -> AppResult<ProductRecord> {
        validate_product_input(&input)?;
        self.check_category(input.category.as_deref()).await?;
        Ok(product::update_product(&self.pool, &self.default_currency, product_id, input).await?)
    }

    /// All products, newest first, optionally limited to one category
    pub async fn list_products(&self, category: Option<&str>) -> AppResult<Vec<ProductRecord>> {
        Ok(product::list_products(&self.pool, category).await?)
    }

    /// Newest products; `limit` defaults to 12 and must be positive
    pub async fn list_recent_products(&self, limit: Option<i64>) -> AppResult<Vec<ProductRecord>> {
        let limit = limit.unwrap_or(product::DEFAULT_RECENT_LIMIT);
        if limit <= 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "limit must be positive",
            ));
        }
        Ok(product::list_recent_products(&self.pool, limit).await?)
    }

    pub async fn get_product_by_id(&self, product_id: &str) -> AppResult<Option<ProductRecord>> {
        Ok(product::get_product_by_id(&self.pool, product_id).await?)
    }

    pub async fn delete_product_by_id(&self, product_id: &str) -> AppResult<()> {
        Ok(product::delete_product_by_id(&self.pool, product_id).await?)
    }

    // ── Stock ──

    pub async fn restock_product(
        &self,
        product_id: &str,
        quantity: i64,
        actor: Option<&str>,
    ) -> AppResult<RestockOutcome> {
        Ok(product::restock_product(
            &self.pool,
            product_id,
            quantity,
            actor.unwrap_or(DEFAULT_RESTOCK_ACTOR),
        )
        .await?)
    }

    /// Products at or below their reorder point
    pub async fn list_low_stock(&self) -> AppResult<Vec<LowStockEntry>> {
        Ok(product::list_low_stock(&self.pool).await?)
    }

    // ── Categories ──

    pub async fn list_categories(&self) -> AppResult<Vec<CategoryRecord>> {
        Ok(category::list_category_summaries(&self.pool).await?)
    }

    pub async fn create_category(&self, input: CategoryInput) -> AppResult<CategoryRecord> {
        validate_category_input(&input)?;
        Ok(category::create_category(&self.pool, input).await?)
    }

    pub async fn delete_category(&self, category_id: &str) -> AppResult<()> {
        Ok(category::delete_category(&self.pool, category_id).await?)
    }

    async fn check_category(&self, category_id: Option<&str>) -> AppResult<()> {
        let Some(id) = category_id else {
            return Ok(());
        };
        if category::category_exists(&self.pool, id).await? {
            Ok(())
        } else {
            Err(AppError::with_message(
                ErrorCode::CategoryNotFound,
                format!("Category {id} not found"),
            ))
        }
    }
}
