//! Shared types for the storefront
//!
//! Common types used by the storefront server and its callers: the unified
//! error system, the catalog/order data models and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
