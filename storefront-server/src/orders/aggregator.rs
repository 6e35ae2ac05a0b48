//! Order aggregator (read path)
//!
//! One query for order headers joined with customer and addresses, then one
//! bulk query per child table keyed by the whole order-id set, merged in
//! memory. No per-order round trips.

use crate::db::repository::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{
    AddressSnapshot, CustomerSnapshot, InventorySnapshot, InvoiceSnapshot, OrderDashboardEntry,
    OrderEventSnapshot, OrderItemSnapshot, OrderStatus, PaymentSnapshot,
};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;

/// Which orders to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderFilter {
    All,
    ById(String),
    ByTransaction(String),
}

impl OrderFilter {
    fn clause(&self) -> &'static str {
        match self {
            Self::All => "1 = 1",
            Self::ById(_) => "o.id = ?",
            Self::ByTransaction(_) => "o.transaction_id = ?",
        }
    }

    fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::ById(id) => Some(id),
            Self::ByTransaction(txn) => Some(txn),
        }
    }
}

// ── Row types ──

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub currency: String,
    pub transaction_id: String,
    pub channel: Option<String>,
    pub note: Option<String>,
    pub placed_at: i64,
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub shipping_address_id: Option<String>,
    pub shipping_label: Option<String>,
    pub shipping_line1: Option<String>,
    pub shipping_line2: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_country: Option<String>,
    pub billing_address_id: Option<String>,
    pub billing_label: Option<String>,
    pub billing_line1: Option<String>,
    pub billing_line2: Option<String>,
    pub billing_city: Option<String>,
    pub billing_state: Option<String>,
    pub billing_postal_code: Option<String>,
    pub billing_country: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemRow {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount_amount: Option<f64>,
    pub tax_amount: Option<f64>,
    pub product_name: String,
    pub image_path: Option<String>,
    pub inventory_on_hand: Option<i64>,
    pub inventory_reserved: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    pub id: String,
    pub order_id: String,
    pub event_type: String,
    pub actor: Option<String>,
    pub note: Option<String>,
    pub metadata: Option<Json<serde_json::Value>>,
    pub created_at: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InvoiceRow {
    pub id: String,
    pub order_id: String,
    pub invoice_number: String,
    pub pdf_path: String,
    pub generated_at: i64,
    pub total_amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentRow {
    pub id: String,
    pub order_id: String,
    pub transaction_id: String,
    pub status: String,
    pub amount: f64,
    pub currency: String,
    pub method: Option<String>,
    pub processed_at: i64,
}

impl From<InvoiceRow> for InvoiceSnapshot {
    fn from(row: InvoiceRow) -> Self {
        Self {
            id: row.id,
            invoice_number: row.invoice_number,
            pdf_path: row.pdf_path,
            generated_at: row.generated_at,
            total_amount: row.total_amount,
            currency: row.currency,
        }
    }
}

// ── Load ──

/// Load and assemble every order matching `filter`, newest first
pub async fn load_orders(
    pool: &SqlitePool,
    filter: &OrderFilter,
) -> RepoResult<Vec<OrderDashboardEntry>> {
    let mut conn = pool.acquire().await?;

    let orders = fetch_order_rows(&mut conn, filter).await?;
    if orders.is_empty() {
        return Ok(vec![]);
    }

    let order_ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
    let ids = Json(&order_ids);

    let items: Vec<ItemRow> = sqlx::query_as(
        r#"
        SELECT oi.id, oi.order_id, oi.product_id, oi.sku, oi.quantity, oi.unit_price,
               oi.discount_amount, oi.tax_amount,
               p.name AS product_name, p.image_primary_path AS image_path,
               inv.on_hand AS inventory_on_hand, inv.reserved AS inventory_reserved
        FROM order_items oi
        JOIN products p ON p.id = oi.product_id
        LEFT JOIN inventory_items inv ON inv.product_id = p.id
        WHERE oi.order_id IN (SELECT value FROM json_each(?))
        ORDER BY oi.created_at, oi.rowid
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let events: Vec<EventRow> = sqlx::query_as(
        r#"
        SELECT id, order_id, event_type, actor, note, metadata, created_at
        FROM order_events
        WHERE order_id IN (SELECT value FROM json_each(?))
        ORDER BY created_at ASC, rowid ASC
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let invoices: Vec<InvoiceRow> = sqlx::query_as(
        r#"
        SELECT id, order_id, invoice_number, pdf_path, generated_at, total_amount, currency
        FROM invoices
        WHERE order_id IN (SELECT value FROM json_each(?))
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let payments: Vec<PaymentRow> = sqlx::query_as(
        r#"
        SELECT id, order_id, transaction_id, status, amount, currency, method, processed_at
        FROM payments
        WHERE order_id IN (SELECT value FROM json_each(?))
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    tracing::debug!(
        orders = orders.len(),
        items = items.len(),
        events = events.len(),
        invoices = invoices.len(),
        payments = payments.len(),
        "Order aggregation fan-out"
    );

    Ok(build_order_aggregates(orders, items, events, invoices, payments))
}

async fn fetch_order_rows(
    conn: &mut SqliteConnection,
    filter: &OrderFilter,
) -> RepoResult<Vec<OrderRow>> {
    let sql = format!(
        r#"
        SELECT o.id, o.order_number, o.status, o.total_amount, o.currency,
               o.transaction_id, o.channel, o.note, o.placed_at,
               c.id AS customer_id, c.first_name, c.last_name, c.email, c.phone,
               ship.id AS shipping_address_id, ship.label AS shipping_label,
               ship.line1 AS shipping_line1, ship.line2 AS shipping_line2,
               ship.city AS shipping_city, ship.state AS shipping_state,
               ship.postal_code AS shipping_postal_code, ship.country AS shipping_country,
               bill.id AS billing_address_id, bill.label AS billing_label,
               bill.line1 AS billing_line1, bill.line2 AS billing_line2,
               bill.city AS billing_city, bill.state AS billing_state,
               bill.postal_code AS billing_postal_code, bill.country AS billing_country
        FROM orders o
        JOIN customers c ON c.id = o.customer_id
        LEFT JOIN customer_addresses ship ON ship.id = o.shipping_address_id
        LEFT JOIN customer_addresses bill ON bill.id = o.billing_address_id
        WHERE {}
        ORDER BY o.placed_at DESC, o.rowid DESC
        "#,
        filter.clause()
    );

    let mut query = sqlx::query_as::<_, OrderRow>(&sql);
    if let Some(value) = filter.value() {
        query = query.bind(value);
    }
    Ok(query.fetch_all(conn).await?)
}

/// Merge header rows with their child rows, keeping header order
pub fn build_order_aggregates(
    orders: Vec<OrderRow>,
    items: Vec<ItemRow>,
    events: Vec<EventRow>,
    invoices: Vec<InvoiceRow>,
    payments: Vec<PaymentRow>,
) -> Vec<OrderDashboardEntry> {
    let mut item_map: HashMap<String, Vec<OrderItemSnapshot>> = HashMap::new();
    for item in items {
        item_map
            .entry(item.order_id)
            .or_default()
            .push(OrderItemSnapshot {
                id: item.id,
                product_id: item.product_id,
                sku: item.sku,
                product_name: item.product_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
                discount: item.discount_amount,
                tax: item.tax_amount,
                image_path: item.image_path,
                inventory: InventorySnapshot {
                    on_hand: item.inventory_on_hand,
                    reserved: item.inventory_reserved,
                },
            });
    }

    let mut event_map: HashMap<String, Vec<OrderEventSnapshot>> = HashMap::new();
    for event in events {
        event_map
            .entry(event.order_id)
            .or_default()
            .push(OrderEventSnapshot {
                id: event.id,
                event_type: event.event_type,
                actor: event.actor,
                note: event.note,
                metadata: event.metadata.map(|m| m.0),
                created_at: event.created_at,
            });
    }

    let mut invoice_map: HashMap<String, InvoiceSnapshot> = invoices
        .into_iter()
        .map(|row| (row.order_id.clone(), InvoiceSnapshot::from(row)))
        .collect();

    let mut payment_map: HashMap<String, PaymentSnapshot> = payments
        .into_iter()
        .map(|row| {
            (
                row.order_id,
                PaymentSnapshot {
                    id: row.id,
                    transaction_id: row.transaction_id,
                    status: row.status,
                    amount: row.amount,
                    currency: row.currency,
                    method: row.method,
                    processed_at: row.processed_at,
                },
            )
        })
        .collect();

    orders
        .into_iter()
        .map(|row| OrderDashboardEntry {
            items: item_map.remove(&row.id).unwrap_or_default(),
            events: event_map.remove(&row.id).unwrap_or_default(),
            invoice: invoice_map.remove(&row.id),
            payment: payment_map.remove(&row.id),
            customer: CustomerSnapshot {
                id: row.customer_id,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
            },
            shipping_address: row.shipping_address_id.map(|id| AddressSnapshot {
                id,
                label: row.shipping_label,
                line1: row.shipping_line1,
                line2: row.shipping_line2,
                city: row.shipping_city,
                state: row.shipping_state,
                postal_code: row.shipping_postal_code,
                country: row.shipping_country,
            }),
            billing_address: row.billing_address_id.map(|id| AddressSnapshot {
                id,
                label: row.billing_label,
                line1: row.billing_line1,
                line2: row.billing_line2,
                city: row.billing_city,
                state: row.billing_state,
                postal_code: row.billing_postal_code,
                country: row.billing_country,
            }),
            id: row.id,
            order_number: row.order_number,
            status: row.status,
            total_amount: row.total_amount,
            currency: row.currency,
            transaction_id: row.transaction_id,
            channel: row.channel,
            note: row.note,
            placed_at: row.placed_at,
        })
        .collect()
}

// ── Thin wrappers ──

pub async fn list_orders(pool: &SqlitePool) -> RepoResult<Vec<OrderDashboardEntry>> {
    load_orders(pool, &OrderFilter::All).await
}

pub async fn find_order_by_id(
    pool: &SqlitePool,
    order_id: &str,
) -> RepoResult<Option<OrderDashboardEntry>> {
    let orders = load_orders(pool, &OrderFilter::ById(order_id.to_string())).await?;
    Ok(orders.into_iter().next())
}

pub async fn find_order_by_transaction(
    pool: &SqlitePool,
    transaction_id: &str,
) -> RepoResult<Option<OrderDashboardEntry>> {
    let orders = load_orders(pool, &OrderFilter::ByTransaction(transaction_id.to_string())).await?;
    Ok(orders.into_iter().next())
}

/// `find_order_by_id`, failing with `OrderNotFound` when absent
pub async fn require_order(pool: &SqlitePool, order_id: &str) -> RepoResult<OrderDashboardEntry> {
    find_order_by_id(pool, order_id).await?.ok_or_else(|| {
        RepoError::not_found(ErrorCode::OrderNotFound, format!("Order {order_id} not found"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_row(id: &str, placed_at: i64, with_billing: bool) -> OrderRow {
        OrderRow {
            id: id.into(),
            order_number: format!("ORD-2026-{id}"),
            status: OrderStatus::Processing,
            total_amount: 2000.0,
            currency: "INR".into(),
            transaction_id: format!("TXN-{id}"),
            channel: Some("web".into()),
            note: None,
            placed_at,
            customer_id: "cust-1".into(),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: "asha@example.com".into(),
            phone: None,
            shipping_address_id: Some(format!("ship-{id}")),
            shipping_label: Some("SHIPPING ADDRESS".into()),
            shipping_line1: Some("12 MG Road".into()),
            shipping_line2: None,
            shipping_city: Some("Bengaluru".into()),
            shipping_state: None,
            shipping_postal_code: Some("560001".into()),
            shipping_country: Some("IN".into()),
            billing_address_id: with_billing.then(|| format!("bill-{id}")),
            billing_label: with_billing.then(|| "BILLING ADDRESS".into()),
            billing_line1: with_billing.then(|| "1 Park St".into()),
            billing_line2: None,
            billing_city: with_billing.then(|| "Kolkata".into()),
            billing_state: None,
            billing_postal_code: with_billing.then(|| "700016".into()),
            billing_country: with_billing.then(|| "IN".into()),
        }
    }

    fn item_row(id: &str, order_id: &str) -> ItemRow {
        ItemRow {
            id: id.into(),
            order_id: order_id.into(),
            product_id: "prod-1".into(),
            sku: "SHOE-1".into(),
            quantity: 2,
            unit_price: 1000.0,
            discount_amount: Some(0.0),
            tax_amount: Some(0.0),
            product_name: "Runner".into(),
            image_path: None,
            inventory_on_hand: Some(8),
            inventory_reserved: Some(2),
        }
    }

    fn event_row(id: &str, order_id: &str, event_type: &str, created_at: i64) -> EventRow {
        EventRow {
            id: id.into(),
            order_id: order_id.into(),
            event_type: event_type.into(),
            actor: Some("system".into()),
            note: None,
            metadata: Some(Json(json!({ "transactionId": "TXN" }))),
            created_at,
        }
    }

    #[test]
    fn test_merge_attaches_children_by_order_id() {
        let orders = vec![order_row("b", 2000, false), order_row("a", 1000, true)];
        let items = vec![item_row("i1", "a"), item_row("i2", "b"), item_row("i3", "a")];
        let events = vec![
            event_row("e1", "a", "ORDER_CREATED", 1000),
            event_row("e2", "a", "STATUS_UPDATED", 1500),
            event_row("e3", "b", "ORDER_CREATED", 2000),
        ];
        let invoices = vec![InvoiceRow {
            id: "inv-1".into(),
            order_id: "a".into(),
            invoice_number: "INV-2026-ABCDEF".into(),
            pdf_path: "invoices/INV-2026-ABCDEF.pdf".into(),
            generated_at: 1600,
            total_amount: 2000.0,
            currency: "INR".into(),
        }];
        let payments = vec![PaymentRow {
            id: "pay-1".into(),
            order_id: "b".into(),
            transaction_id: "TXN-b".into(),
            status: "captured".into(),
            amount: 2000.0,
            currency: "INR".into(),
            method: Some("card".into()),
            processed_at: 2000,
        }];

        let merged = build_order_aggregates(orders, items, events, invoices, payments);

        assert_eq!(merged.len(), 2);
        // header order is preserved
        assert_eq!(merged[0].id, "b");
        assert_eq!(merged[1].id, "a");

        let a = &merged[1];
        assert_eq!(
            a.items.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            vec!["i1", "i3"]
        );
        assert_eq!(
            a.events.iter().map(|e| e.event_type.as_str()).collect::<Vec<_>>(),
            vec!["ORDER_CREATED", "STATUS_UPDATED"]
        );
        assert_eq!(
            a.invoice.as_ref().map(|i| i.invoice_number.as_str()),
            Some("INV-2026-ABCDEF")
        );
        assert!(a.payment.is_none());
        assert_eq!(
            a.billing_address.as_ref().and_then(|b| b.city.as_deref()),
            Some("Kolkata")
        );

        let b = &merged[0];
        assert_eq!(b.items.len(), 1);
        assert_eq!(b.events.len(), 1);
        assert!(b.invoice.is_none());
        assert_eq!(b.payment.as_ref().map(|p| p.status.as_str()), Some("captured"));
        assert!(b.billing_address.is_none());
        assert_eq!(b.items[0].inventory.on_hand, Some(8));
    }

    #[test]
    fn test_merge_ignores_orphan_children() {
        let merged = build_order_aggregates(
            vec![order_row("a", 1000, false)],
            vec![item_row("i1", "zzz")],
            vec![event_row("e1", "zzz", "ORDER_CREATED", 1)],
            vec![],
            vec![],
        );
        assert_eq!(merged.len(), 1);
        assert!(merged[0].items.is_empty());
        assert!(merged[0].events.is_empty());
    }

    #[test]
    fn test_merge_with_no_orders_is_empty() {
        let merged = build_order_aggregates(vec![], vec![item_row("i1", "a")], vec![], vec![], vec![]);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_filter_clauses() {
        assert_eq!(OrderFilter::All.value(), None);
        assert_eq!(OrderFilter::ById("x".into()).clause(), "o.id = ?");
        assert_eq!(
            OrderFilter::ByTransaction("TXN-1".into()).value(),
            Some("TXN-1")
        );
    }
}
