//! Service layer
//!
//! - [`CatalogService`] - products, categories and stock
//! - [`AdminService`] - admin accounts

pub mod admin_service;
pub mod catalog_service;

pub use admin_service::AdminService;
pub use catalog_service::CatalogService;
