//! Data models
//!
//! Shared between storefront-server and the admin/storefront UI (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are UUID v4 strings, timestamps are Unix milliseconds.

pub mod admin;
pub mod category;
pub mod order;
pub mod product;

// Re-exports
pub use admin::*;
pub use category::*;
pub use order::*;
pub use product::*;
