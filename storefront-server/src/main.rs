use anyhow::Context;
use storefront_server::{Config, StorefrontState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env, configuration, logging
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    setup_environment(&config);

    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir.display(),
        "Storefront server starting..."
    );

    // 2. Directories, database, services
    let state = StorefrontState::initialize(&config)
        .await
        .context("failed to initialize storefront")?;

    // 3. Seed super admin
    let admin = state
        .admins
        .ensure_default_admin(&config)
        .await
        .context("failed to seed default admin")?;
    tracing::info!(email = %admin.email, role = ?admin.role, "Default admin ready");

    // 4. Catalog summary
    let categories = state.catalog.list_categories().await?;
    let products = state.catalog.list_products(None).await?;
    let orders = state.orders.list_orders().await?;
    tracing::info!(
        categories = categories.len(),
        products = products.len(),
        orders = orders.len(),
        "Storefront ready"
    );

    for entry in state.catalog.list_low_stock().await? {
        tracing::warn!(
            sku = %entry.sku,
            on_hand = entry.on_hand,
            reorder_point = entry.reorder_point,
            "Low stock"
        );
    }

    state.db.close().await;
    Ok(())
}
