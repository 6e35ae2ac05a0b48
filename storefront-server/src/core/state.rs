//! Storefront state: configuration, database and every service, built once

use super::Config;
use crate::db::DbService;
use crate::db::repository::RepoResult;
use crate::invoice::InvoiceService;
use crate::orders::OrderService;
use crate::services::{AdminService, CatalogService};
use crate::utils::fs::ensure_directories;

#[derive(Debug, Clone)]
pub struct StorefrontState {
    pub config: Config,
    pub db: DbService,
    pub orders: OrderService,
    pub invoices: InvoiceService,
    pub catalog: CatalogService,
    pub admins: AdminService,
}

impl StorefrontState {
    /// Initialize the storefront
    ///
    /// 1. Create the work, upload, product image and invoice directories
    /// 2. Open the database and apply migrations
    /// 3. Build the services over the shared pool
    pub async fn initialize(config: &Config) -> RepoResult<Self> {
        ensure_directories(&[
            config.work_dir.clone(),
            config.uploads_root.clone(),
            config.product_images_dir(),
            config.invoices_dir(),
        ])
        .await?;
        if let Some(parent) = config.database_path.parent() {
            ensure_directories(&[parent]).await?;
        }

        let db = DbService::new(&config.database_path).await?;
        let pool = db.pool.clone();

        Ok(Self {
            orders: OrderService::new(pool.clone(), config),
            invoices: InvoiceService::new(pool.clone(), config),
            catalog: CatalogService::new(pool.clone(), config),
            admins: AdminService::new(pool),
            config: config.clone(),
            db,
        })
    }
}
