//! Catalog store: products, categories, stock

mod common;

use common::*;
use shared::models::{CategoryInput, ProductStatus};
use storefront_server::ErrorCode;

fn category(id: &str, sort_order: Option<i64>) -> CategoryInput {
    CategoryInput {
        id: id.to_string(),
        label: format!("{id} label"),
        nav_label: id.to_uppercase(),
        description: String::new(),
        sort_order,
    }
}

#[tokio::test]
async fn test_create_and_get_product() {
    let (_tmp, state) = storefront().await;
    state
        .catalog
        .create_category(category("running", Some(1)))
        .await
        .unwrap();

    let mut input = product_input("SHOE-1", 1000.0, 20);
    input.category = Some("running".into());
    input.image_path = Some("products/shoe-1.jpg".into());
    input.image_alt = Some("Trail runner, side view".into());
    let created = state.catalog.create_product(input).await.unwrap();

    assert_eq!(created.sku, "SHOE-1");
    assert_eq!(created.currency, "INR");
    assert_eq!(created.status, ProductStatus::Active);
    assert_eq!(created.sizes, vec!["9", "10"]);
    assert_eq!(created.care_instructions, vec!["Hand wash"]);
    assert_eq!(created.category_label.as_deref(), Some("running label"));
    assert_eq!(created.image_path.as_deref(), Some("products/shoe-1.jpg"));

    let levels = created.inventory.unwrap();
    assert_eq!(levels.on_hand, 20);
    assert_eq!(levels.reserved, 0);
    assert_eq!(levels.reorder_point, 5);

    let fetched = state
        .catalog
        .get_product_by_id(&created.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.id, created.id);
    assert!(state.catalog.get_product_by_id("missing").await.unwrap().is_none());

    let pool = &state.db.pool;
    assert_eq!(count_where(pool, "product_media", "product_id", &created.id).await, 1);
    assert_eq!(
        count_where(pool, "inventory_events", "event_type", "INITIAL_STOCK").await,
        1
    );
}

#[tokio::test]
async fn test_product_with_no_stock_is_registered() {
    let (_tmp, state) = storefront().await;
    let pool = &state.db.pool;
    seed_product(&state, "PRE-1", 100.0, 0).await;
    assert_eq!(
        count_where(pool, "inventory_events", "event_type", "PRODUCT_REGISTERED").await,
        1
    );
}

#[tokio::test]
async fn test_product_write_errors() {
    let (_tmp, state) = storefront().await;
    seed_product(&state, "SHOE-1", 1000.0, 5).await;

    let err = state
        .catalog
        .create_product(product_input("SHOE-1", 900.0, 5))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductSkuExists);

    let mut input = product_input("SHOE-2", 900.0, 5);
    input.category = Some("nope".into());
    let err = state.catalog.create_product(input).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CategoryNotFound);

    let err = state
        .catalog
        .create_product(product_input("SHOE-3", -1.0, 5))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductInvalidPrice);

    let err = state
        .catalog
        .create_product(product_input("SHOE-4", 10.0, -5))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InventoryInvalidQuantity);

    let err = state
        .catalog
        .update_product("missing", product_input("SHOE-5", 10.0, 1))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductNotFound);
}

#[tokio::test]
async fn test_update_product_replaces_fields_and_logs_adjustment() {
    let (_tmp, state) = storefront().await;
    let pool = &state.db.pool;
    let mut input = product_input("SHOE-1", 1000.0, 10);
    input.image_path = Some("products/a.jpg".into());
    let product = state.catalog.create_product(input).await.unwrap();

    let mut update = product_input("SHOE-1", 1200.0, 15);
    update.name = "Trail Runner v2".into();
    update.status = Some(ProductStatus::Draft);
    update.colors = vec!["Olive".into()];
    let updated = state
        .catalog
        .update_product(&product.id, update)
        .await
        .unwrap();

    assert_eq!(updated.name, "Trail Runner v2");
    assert_eq!(updated.price, 1200.0);
    assert_eq!(updated.status, ProductStatus::Draft);
    assert_eq!(updated.colors, vec!["Olive"]);
    // Image kept when the update has none
    assert_eq!(updated.image_path.as_deref(), Some("products/a.jpg"));
    assert_eq!(updated.inventory.unwrap().on_hand, 15);

    let delta: i64 = sqlx::query_scalar(
        "SELECT delta FROM inventory_events WHERE product_id = ? AND event_type = 'INVENTORY_ADJUSTED'",
    )
    .bind(&product.id)
    .fetch_one(pool)
    .await
    .unwrap();
    assert_eq!(delta, 5);
}

#[tokio::test]
async fn test_list_products_and_recent() {
    let (_tmp, state) = storefront().await;
    state
        .catalog
        .create_category(category("tees", None))
        .await
        .unwrap();

    for i in 0..4 {
        seed_product(&state, &format!("SHOE-{i}"), 1000.0, 5).await;
    }
    let mut tee = product_input("TEE-1", 400.0, 5);
    tee.category = Some("tees".into());
    let tee = state.catalog.create_product(tee).await.unwrap();

    let all = state.catalog.list_products(None).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].id, tee.id);
    assert_eq!(all[4].sku, "SHOE-0");

    let tees = state.catalog.list_products(Some("tees")).await.unwrap();
    assert_eq!(tees.len(), 1);
    assert_eq!(tees[0].sku, "TEE-1");

    let recent = state.catalog.list_recent_products(Some(2)).await.unwrap();
    assert_eq!(
        recent.iter().map(|p| p.sku.as_str()).collect::<Vec<_>>(),
        vec!["TEE-1", "SHOE-3"]
    );
    assert_eq!(state.catalog.list_recent_products(None).await.unwrap().len(), 5);

    let err = state.catalog.list_recent_products(Some(0)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
}

#[tokio::test]
async fn test_delete_product() {
    let (_tmp, state) = storefront().await;
    let pool = &state.db.pool;
    let unused = seed_product(&state, "OLD-1", 100.0, 3).await;
    let sold = seed_product(&state, "SHOE-1", 1000.0, 3).await;
    state
        .orders
        .create_order(checkout("TXN-P", "p@example.com", vec![item(&sold, 1)]))
        .await
        .unwrap();

    state.catalog.delete_product_by_id(&unused.id).await.unwrap();
    assert!(state.catalog.get_product_by_id(&unused.id).await.unwrap().is_none());
    assert_eq!(count_where(pool, "inventory_items", "product_id", &unused.id).await, 0);

    let err = state.catalog.delete_product_by_id(&sold.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductHasOrders);
    assert!(state.catalog.get_product_by_id(&sold.id).await.unwrap().is_some());

    let err = state.catalog.delete_product_by_id(&unused.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductNotFound);
}

#[tokio::test]
async fn test_restock_and_low_stock() {
    let (_tmp, state) = storefront().await;
    let pool = &state.db.pool;
    let low = seed_product(&state, "LOW-1", 100.0, 4).await;
    seed_product(&state, "FULL-1", 100.0, 40).await;

    // 4 on hand, reorder point 1; selling 3 leaves it at the threshold
    state
        .orders
        .create_order(checkout("TXN-LOW", "low@example.com", vec![item(&low, 3)]))
        .await
        .unwrap();

    let flagged = state.catalog.list_low_stock().await.unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].sku, "LOW-1");
    assert_eq!(flagged[0].on_hand, 1);

    let outcome = state
        .catalog
        .restock_product(&low.id, 10, Some("ops@example.com"))
        .await
        .unwrap();
    assert_eq!(outcome.on_hand, 11);
    assert_eq!(outcome.reserved, 3);
    assert!(state.catalog.list_low_stock().await.unwrap().is_empty());
    assert_eq!(
        count_where(pool, "inventory_events", "event_type", "RESTOCK").await,
        1
    );

    let err = state
        .catalog
        .restock_product(&low.id, 0, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InventoryInvalidQuantity);

    let err = state
        .catalog
        .restock_product("missing", 5, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ProductNotFound);
}

#[tokio::test]
async fn test_categories() {
    let (_tmp, state) = storefront().await;

    state
        .catalog
        .create_category(category("tees", None))
        .await
        .unwrap();
    let first = state
        .catalog
        .create_category(category("running", Some(1)))
        .await
        .unwrap();
    assert_eq!(first.total, 0);

    let mut shoe = product_input("SHOE-1", 1000.0, 5);
    shoe.category = Some("running".into());
    state.catalog.create_product(shoe).await.unwrap();

    let categories = state.catalog.list_categories().await.unwrap();
    assert_eq!(
        categories.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
        vec!["running", "tees"]
    );
    assert_eq!(categories[0].total, 1);
    assert_eq!(categories[1].sort_order, 100);

    let err = state
        .catalog
        .create_category(category("tees", None))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CategoryIdExists);

    let err = state
        .catalog
        .create_category(category("Bad Slug", None))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    // Deleting a category leaves its products uncategorized
    state.catalog.delete_category("running").await.unwrap();
    let products = state.catalog.list_products(None).await.unwrap();
    assert!(products[0].category.is_none());

    let err = state.catalog.delete_category("running").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CategoryNotFound);
}
