//! Category Model

use serde::{Deserialize, Serialize};

/// Category summary with its product count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryRecord {
    /// Slug, immutable after creation
    pub id: String,
    pub label: String,
    pub nav_label: String,
    pub description: String,
    pub sort_order: i64,
    /// Number of products referencing this category
    pub total: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    pub id: String,
    pub label: String,
    pub nav_label: String,
    #[serde(default)]
    pub description: String,
    pub sort_order: Option<i64>,
}

pub const DEFAULT_CATEGORY_SORT_ORDER: i64 = 100;
