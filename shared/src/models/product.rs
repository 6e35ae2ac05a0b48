//! Product Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product publication status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ProductStatus {
    Draft,
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unsupported product status: {other}")),
        }
    }
}

/// Inventory counters supplied with a product write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryInput {
    pub on_hand: i64,
    pub reserved: Option<i64>,
    pub safety_stock: Option<i64>,
    /// Restock threshold, defaults to a quarter of `on_hand` (at least 1)
    pub reorder_point: Option<i64>,
}

impl InventoryInput {
    /// Apply the defaults for counters the caller left out
    pub fn resolve(&self) -> InventoryLevels {
        InventoryLevels {
            on_hand: self.on_hand,
            reserved: self.reserved.unwrap_or(0),
            safety_stock: self.safety_stock.unwrap_or(0),
            reorder_point: self
                .reorder_point
                .unwrap_or_else(|| default_reorder_point(self.on_hand)),
        }
    }
}

/// `max(round(on_hand * 0.25), 1)`
pub fn default_reorder_point(on_hand: i64) -> i64 {
    ((on_hand as f64 * 0.25).round() as i64).max(1)
}

/// Inventory counters as stored on the inventory row
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryLevels {
    pub on_hand: i64,
    pub reserved: i64,
    pub safety_stock: i64,
    pub reorder_point: i64,
}

/// Create / full-replace product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    #[serde(default)]
    pub product_details: Vec<String>,
    pub product_story: Option<String>,
    pub material_info: Option<String>,
    #[serde(default)]
    pub care_instructions: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub price: f64,
    /// Defaults to the configured store currency
    pub currency: Option<String>,
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Category reference (slug)
    pub category: Option<String>,
    pub image_path: Option<String>,
    pub image_alt: Option<String>,
    pub inventory: InventoryInput,
}

/// Product as read back from the catalog, joined with its category and inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub currency: String,
    pub status: ProductStatus,
    pub description: Option<String>,
    pub product_details: Vec<String>,
    pub product_story: Option<String>,
    pub material_info: Option<String>,
    pub care_instructions: Vec<String>,
    pub features: Vec<String>,
    pub image_path: Option<String>,
    pub image_alt: Option<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub category: Option<String>,
    pub category_label: Option<String>,
    pub category_nav_label: Option<String>,
    pub category_description: Option<String>,
    pub category_sort_order: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Absent only if the inventory row was removed out of band
    pub inventory: Option<InventoryLevels>,
}

/// Product at or below its reorder point
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LowStockEntry {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub on_hand: i64,
    pub reserved: i64,
    pub reorder_point: i64,
}

/// Result of an admin restock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestockOutcome {
    pub on_hand: i64,
    pub reserved: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reorder_point() {
        assert_eq!(default_reorder_point(0), 1);
        assert_eq!(default_reorder_point(2), 1);
        assert_eq!(default_reorder_point(10), 3);
        assert_eq!(default_reorder_point(40), 10);
        assert_eq!(default_reorder_point(6), 2);
    }

    #[test]
    fn test_inventory_resolve_applies_defaults() {
        let input = InventoryInput {
            on_hand: 20,
            reserved: None,
            safety_stock: None,
            reorder_point: None,
        };
        assert_eq!(
            input.resolve(),
            InventoryLevels {
                on_hand: 20,
                reserved: 0,
                safety_stock: 0,
                reorder_point: 5,
            }
        );
    }

    #[test]
    fn test_inventory_resolve_keeps_explicit_values() {
        let input = InventoryInput {
            on_hand: 20,
            reserved: Some(3),
            safety_stock: Some(2),
            reorder_point: Some(0),
        };
        let levels = input.resolve();
        assert_eq!(levels.reserved, 3);
        assert_eq!(levels.safety_stock, 2);
        assert_eq!(levels.reorder_point, 0);
    }

    #[test]
    fn test_product_status_parse() {
        assert_eq!("Draft".parse::<ProductStatus>(), Ok(ProductStatus::Draft));
        assert_eq!(" active ".parse::<ProductStatus>(), Ok(ProductStatus::Active));
        assert!("archived".parse::<ProductStatus>().is_err());
        assert_eq!(ProductStatus::default(), ProductStatus::Active);
    }

    #[test]
    fn test_product_input_deserialize_defaults() {
        let json = r#"{
            "name": "Runner",
            "sku": "SHOE-1",
            "price": 1000.0,
            "inventory": { "on_hand": 10 }
        }"#;
        let input: ProductInput = serde_json::from_str(json).unwrap();
        assert!(input.colors.is_empty());
        assert!(input.status.is_none());
        assert_eq!(input.inventory.resolve().reorder_point, 3);
    }
}
