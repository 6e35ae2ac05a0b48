//! Storefront Server - order, invoice and catalog core of an online store
//!
//! # Module structure
//!
//! ```text
//! storefront-server/src/
//! ├── core/          # configuration, state
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── orders/        # order engine, aggregator, numbering
//! ├── invoice/       # invoice generation and PDF rendering
//! ├── services/      # catalog and admin services
//! └── utils/         # logging, validation, filesystem helpers
//! ```

pub mod core;
pub mod db;
pub mod invoice;
pub mod orders;
pub mod services;
pub mod utils;

pub use core::{Config, StorefrontState};
pub use db::DbService;
pub use invoice::InvoiceService;
pub use orders::OrderService;
pub use services::{AdminService, CatalogService};
pub use utils::{AppError, AppResult, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Start logging as configured
pub fn setup_environment(config: &Config) {
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
}
