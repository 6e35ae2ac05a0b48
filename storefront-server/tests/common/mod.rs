//! Shared fixtures for the integration suites
#![allow(dead_code)]

use shared::models::{
    AddressInput, CustomerInput, InventoryInput, OrderCreateInput, OrderItemInput, ProductInput,
    ProductRecord,
};
use sqlx::SqlitePool;
use storefront_server::{Config, StorefrontState};
use tempfile::TempDir;

/// Fresh storefront rooted in a temp directory (kept alive by the returned guard)
pub async fn storefront() -> (TempDir, StorefrontState) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = Config::with_work_dir(tmp.path());
    let state = StorefrontState::initialize(&config)
        .await
        .expect("storefront init");
    (tmp, state)
}

pub fn product_input(sku: &str, price: f64, on_hand: i64) -> ProductInput {
    ProductInput {
        name: format!("Product {sku}"),
        sku: sku.to_string(),
        description: Some("Everyday essential".into()),
        product_details: vec!["Breathable mesh".into()],
        product_story: None,
        material_info: None,
        care_instructions: vec!["Hand wash".into()],
        features: vec![],
        price,
        currency: None,
        status: None,
        colors: vec!["Black".into()],
        sizes: vec!["9".into(), "10".into()],
        category: None,
        image_path: None,
        image_alt: None,
        inventory: InventoryInput {
            on_hand,
            reserved: None,
            safety_stock: None,
            reorder_point: None,
        },
    }
}

pub async fn seed_product(state: &StorefrontState, sku: &str, price: f64, on_hand: i64) -> ProductRecord {
    state
        .catalog
        .create_product(product_input(sku, price, on_hand))
        .await
        .expect("seed product")
}

pub fn customer(email: &str) -> CustomerInput {
    CustomerInput {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        email: email.to_string(),
        phone: Some("+91 98450 00000".into()),
    }
}

pub fn address(line1: &str) -> AddressInput {
    AddressInput {
        line1: line1.to_string(),
        line2: None,
        city: "Bengaluru".into(),
        state: Some("KA".into()),
        postal_code: "560001".into(),
        country: "IN".into(),
        label: None,
    }
}

pub fn item(product: &ProductRecord, quantity: i64) -> OrderItemInput {
    OrderItemInput {
        product_id: product.id.clone(),
        sku: product.sku.clone(),
        quantity,
        unit_price: product.price,
        discount: None,
        tax: None,
    }
}

pub fn checkout(transaction_id: &str, email: &str, items: Vec<OrderItemInput>) -> OrderCreateInput {
    let total_amount = items
        .iter()
        .map(|i| i.unit_price * i.quantity as f64)
        .sum();
    OrderCreateInput {
        order_number: None,
        transaction_id: transaction_id.to_string(),
        channel: None,
        currency: None,
        customer: customer(email),
        billing_address: None,
        shipping_address: address("12 MG Road"),
        items,
        total_amount,
        status: None,
        note: None,
    }
}

/// (on_hand, reserved) straight from the inventory table
pub async fn inventory(pool: &SqlitePool, product_id: &str) -> (i64, i64) {
    sqlx::query_as("SELECT on_hand, reserved FROM inventory_items WHERE product_id = ?")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .expect("inventory row")
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count")
}

pub async fn count_where(pool: &SqlitePool, table: &str, column: &str, value: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?"))
        .bind(value)
        .fetch_one(pool)
        .await
        .expect("count")
}
