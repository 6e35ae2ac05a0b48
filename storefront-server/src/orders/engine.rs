//! Order transaction engine
//!
//! Every write runs inside a single SQLite transaction: either the whole
//! checkout (customer, addresses, order, items, inventory, payment, audit
//! event) lands, or nothing does.

use super::aggregator::{self, OrderFilter};
use super::numbering::generate_order_number;
use crate::core::Config;
use crate::db::repository::product::{InventoryEvent, insert_inventory_event, inventory_event};
use crate::db::repository::{RepoError, RepoResult, is_foreign_key_violation, is_unique_violation_on};
use crate::utils::fs::{remove_file_best_effort, resolve_under};
use crate::utils::validation::validate_order_input;
use serde_json::json;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AddressInput, AddressRole, CustomerInput, OrderCreateInput, OrderDashboardEntry,
    OrderItemInput, OrderStatus, StatusChange, UnsupportedStatus, event_type,
};
use shared::util::{new_id, now_millis};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use std::path::PathBuf;

const DEFAULT_CHANNEL: &str = "web";
const DEFAULT_STATUS_ACTOR: &str = "admin.dashboard";
const SYSTEM_ACTOR: &str = "system";
const PAYMENT_STATUS_CAPTURED: &str = "captured";
const PAYMENT_METHOD_CARD: &str = "card";

/// Order service: checkout, status transitions, deletion and order reads
#[derive(Debug, Clone)]
pub struct OrderService {
    pool: SqlitePool,
    default_currency: String,
    uploads_root: PathBuf,
}

impl OrderService {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            default_currency: config.default_currency.clone(),
            uploads_root: config.uploads_root.clone(),
        }
    }

    /// Persist a checkout and return the assembled order
    pub async fn create_order(&self, input: OrderCreateInput) -> AppResult<OrderDashboardEntry> {
        validate_order_input(&input)?;

        let order_id = self.persist_order(&input).await?;
        Ok(aggregator::require_order(&self.pool, &order_id).await?)
    }

    /// Move an order to `next_status`
    ///
    /// Setting the current status again is a no-op: nothing is written and no
    /// event is recorded.
    pub async fn update_order_status(
        &self,
        order_id: &str,
        next_status: &str,
        actor: Option<&str>,
    ) -> AppResult<StatusChange> {
        let next: OrderStatus = next_status.parse().map_err(|e: UnsupportedStatus| {
            AppError::with_message(ErrorCode::OrderStatusUnsupported, e.to_string())
                .with_detail("status", next_status)
        })?;

        Ok(self
            .apply_status(order_id, next, actor.unwrap_or(DEFAULT_STATUS_ACTOR))
            .await?)
    }

    /// Delete an order and everything hanging off it
    ///
    /// Inventory allocated by the order is not restored. The invoice PDF, if
    /// any, is unlinked after commit; a failed unlink is only logged.
    pub async fn delete_order(&self, order_id: &str) -> AppResult<()> {
        let pdf_path = self.remove_order(order_id).await?;
        tracing::info!(order_id = %order_id, "Order deleted");

        if let Some(relative) = pdf_path {
            match resolve_under(&self.uploads_root, &relative) {
                Some(path) => {
                    remove_file_best_effort(&path).await;
                }
                None => {
                    tracing::warn!(pdf_path = %relative, "Refusing to unlink invoice outside uploads root")
                }
            }
        }

        Ok(())
    }

    pub async fn list_orders(&self) -> AppResult<Vec<OrderDashboardEntry>> {
        Ok(aggregator::load_orders(&self.pool, &OrderFilter::All).await?)
    }

    pub async fn find_order_by_id(&self, order_id: &str) -> AppResult<Option<OrderDashboardEntry>> {
        Ok(aggregator::find_order_by_id(&self.pool, order_id).await?)
    }

    pub async fn find_order_by_transaction(
        &self,
        transaction_id: &str,
    ) -> AppResult<Option<OrderDashboardEntry>> {
        Ok(aggregator::find_order_by_transaction(&self.pool, transaction_id).await?)
    }

    // ── Transactions ──

    async fn persist_order(&self, input: &OrderCreateInput) -> RepoResult<String> {
        let now = now_millis();
        let order_id = new_id();
        let order_number = input
            .order_number
            .clone()
            .unwrap_or_else(generate_order_number);
        let currency = input.currency.as_deref().unwrap_or(&self.default_currency);
        let channel = input.channel.as_deref().unwrap_or(DEFAULT_CHANNEL);
        let status = input.status.unwrap_or_default();

        let mut tx = self.pool.begin().await?;

        let customer_id = upsert_customer(&mut tx, &input.customer, now).await?;
        let shipping_address_id = insert_address(
            &mut tx,
            &customer_id,
            &input.shipping_address,
            AddressRole::Shipping,
            now,
        )
        .await?;
        // Without a billing address the shipping row serves both roles
        let billing_address_id = match &input.billing_address {
            Some(address) => {
                insert_address(&mut tx, &customer_id, address, AddressRole::Billing, now).await?
            }
            None => shipping_address_id.clone(),
        };

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, customer_id, status, total_amount, currency,
                transaction_id, channel, note, placed_at,
                shipping_address_id, billing_address_id, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&order_id)
        .bind(&order_number)
        .bind(&customer_id)
        .bind(status)
        .bind(input.total_amount)
        .bind(currency)
        .bind(&input.transaction_id)
        .bind(channel)
        .bind(&input.note)
        .bind(now)
        .bind(&shipping_address_id)
        .bind(&billing_address_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| order_insert_error(e, input, &order_number))?;

        for item in &input.items {
            allocate_item(&mut tx, &order_id, item, now).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO payments (id, order_id, transaction_id, status, amount, currency, method, processed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (transaction_id) DO NOTHING
            "#,
        )
        .bind(new_id())
        .bind(&order_id)
        .bind(&input.transaction_id)
        .bind(PAYMENT_STATUS_CAPTURED)
        .bind(input.total_amount)
        .bind(currency)
        .bind(PAYMENT_METHOD_CARD)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        insert_order_event(
            &mut tx,
            OrderEvent {
                order_id: &order_id,
                event_type: event_type::ORDER_CREATED,
                actor: Some(SYSTEM_ACTOR),
                note: input.note.as_deref(),
                metadata: json!({
                    "transactionId": input.transaction_id,
                    "channel": channel,
                }),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            order_number = %order_number,
            transaction_id = %input.transaction_id,
            items = input.items.len(),
            "Order created"
        );

        Ok(order_id)
    }

    /// Returns the stored invoice path of the deleted order, if any
    async fn remove_order(&self, order_id: &str) -> RepoResult<Option<String>> {
        let mut tx = self.pool.begin().await?;

        let pdf_path: Option<String> =
            sqlx::query_scalar("SELECT pdf_path FROM invoices WHERE order_id = ?")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(
                ErrorCode::OrderNotFound,
                format!("Order {order_id} not found"),
            ));
        }

        tx.commit().await?;
        Ok(pdf_path)
    }

    async fn apply_status(
        &self,
        order_id: &str,
        next: OrderStatus,
        actor: &str,
    ) -> RepoResult<StatusChange> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(String, OrderStatus)> =
            sqlx::query_as("SELECT order_number, status FROM orders WHERE id = ?")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((order_number, previous)) = current else {
            return Err(RepoError::not_found(
                ErrorCode::OrderNotFound,
                format!("Order {order_id} not found"),
            ));
        };

        if previous == next {
            tx.rollback().await?;
            tracing::debug!(order_number = %order_number, status = %next, "Status unchanged");
            return Ok(StatusChange {
                order_number,
                status: next,
            });
        }

        sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(next)
            .bind(now_millis())
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        insert_order_event(
            &mut tx,
            OrderEvent {
                order_id,
                event_type: event_type::STATUS_UPDATED,
                actor: Some(actor),
                note: None,
                metadata: json!({
                    "previousStatus": previous.as_str(),
                    "nextStatus": next.as_str(),
                }),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            order_number = %order_number,
            from = %previous,
            to = %next,
            actor = %actor,
            "Order status updated"
        );

        Ok(StatusChange {
            order_number,
            status: next,
        })
    }
}

// ── Transaction steps ──

/// Customers are keyed by email; a repeat checkout refreshes the name and
/// keeps the stored phone when none is given.
async fn upsert_customer(
    conn: &mut SqliteConnection,
    customer: &CustomerInput,
    now: i64,
) -> RepoResult<String> {
    let id: String = sqlx::query_scalar(
        r#"
        INSERT INTO customers (id, first_name, last_name, email, phone, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (email) DO UPDATE SET
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            phone = COALESCE(excluded.phone, customers.phone),
            updated_at = excluded.updated_at
        RETURNING id
        "#,
    )
    .bind(new_id())
    .bind(&customer.first_name)
    .bind(&customer.last_name)
    .bind(&customer.email)
    .bind(&customer.phone)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Addresses are never deduplicated; each checkout stores fresh rows
async fn insert_address(
    conn: &mut SqliteConnection,
    customer_id: &str,
    address: &AddressInput,
    role: AddressRole,
    now: i64,
) -> RepoResult<String> {
    let id = new_id();
    let label = address
        .label
        .clone()
        .unwrap_or_else(|| role.default_label());

    sqlx::query(
        r#"
        INSERT INTO customer_addresses (
            id, customer_id, label, line1, line2, city, state, postal_code, country,
            address_type, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(customer_id)
    .bind(label)
    .bind(&address.line1)
    .bind(&address.line2)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.postal_code)
    .bind(&address.country)
    .bind(role)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(id)
}

/// Insert one line item and move its quantity from on-hand to reserved
///
/// Stock is not checked; on-hand may go negative.
async fn allocate_item(
    conn: &mut SqliteConnection,
    order_id: &str,
    item: &OrderItemInput,
    now: i64,
) -> RepoResult<()> {
    let item_id = new_id();

    sqlx::query(
        r#"
        INSERT INTO order_items (
            id, order_id, product_id, sku, quantity, unit_price,
            discount_amount, tax_amount, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item_id)
    .bind(order_id)
    .bind(&item.product_id)
    .bind(&item.sku)
    .bind(item.quantity)
    .bind(item.unit_price)
    .bind(item.discount.unwrap_or(0.0))
    .bind(item.tax.unwrap_or(0.0))
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            RepoError::not_found(
                ErrorCode::ProductNotFound,
                format!("Product {} not found", item.product_id),
            )
        } else {
            e.into()
        }
    })?;

    let levels: Option<(i64, i64)> = sqlx::query_as(
        r#"
        UPDATE inventory_items
        SET on_hand = on_hand - ?, reserved = reserved + ?, updated_at = ?
        WHERE product_id = ?
        RETURNING on_hand, reserved
        "#,
    )
    .bind(item.quantity)
    .bind(item.quantity)
    .bind(now)
    .bind(&item.product_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some((on_hand, reserved)) = levels else {
        tracing::warn!(product_id = %item.product_id, sku = %item.sku, "No inventory record, aborting order");
        return Err(RepoError::InventoryMissing {
            product_id: item.product_id.clone(),
        });
    };

    insert_inventory_event(
        conn,
        InventoryEvent {
            product_id: &item.product_id,
            order_id: Some(order_id),
            event_type: inventory_event::ORDER_ALLOCATED,
            delta: -item.quantity,
            source: "order.create",
            metadata: json!({
                "orderItemId": item_id,
                "sku": item.sku,
                "quantity": item.quantity,
            }),
        },
    )
    .await?;

    tracing::debug!(
        sku = %item.sku,
        quantity = item.quantity,
        on_hand,
        reserved,
        "Inventory allocated"
    );

    Ok(())
}

fn order_insert_error(err: sqlx::Error, input: &OrderCreateInput, order_number: &str) -> RepoError {
    if is_unique_violation_on(&err, "orders.transaction_id") {
        RepoError::duplicate(
            ErrorCode::OrderTransactionExists,
            format!("An order for transaction {} already exists", input.transaction_id),
        )
    } else if is_unique_violation_on(&err, "orders.order_number") {
        RepoError::duplicate(
            ErrorCode::OrderNumberExists,
            format!("Order number {order_number} already exists"),
        )
    } else {
        err.into()
    }
}

/// One row of the per-order audit trail
pub(crate) struct OrderEvent<'a> {
    pub order_id: &'a str,
    pub event_type: &'a str,
    pub actor: Option<&'a str>,
    pub note: Option<&'a str>,
    pub metadata: serde_json::Value,
}

pub(crate) async fn insert_order_event(
    conn: &mut SqliteConnection,
    event: OrderEvent<'_>,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO order_events (id, order_id, event_type, actor, note, metadata, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new_id())
    .bind(event.order_id)
    .bind(event.event_type)
    .bind(event.actor)
    .bind(event.note)
    .bind(Json(&event.metadata))
    .bind(now_millis())
    .execute(conn)
    .await?;
    Ok(())
}
