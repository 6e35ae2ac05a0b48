//! Order Model
//!
//! Checkout input types and the denormalized order view returned to the
//! admin dashboard and storefront.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Order event types recorded on `order_events`
pub mod event_type {
    pub const ORDER_CREATED: &str = "ORDER_CREATED";
    pub const STATUS_UPDATED: &str = "STATUS_UPDATED";
    pub const INVOICE_GENERATED: &str = "INVOICE_GENERATED";
}

/// Order status
///
/// A flat set of values: any status may move to any other, moving to the
/// current status is a no-op.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum OrderStatus {
    #[default]
    Processing,
    Paid,
    Fulfilled,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        Self::Processing,
        Self::Paid,
        Self::Fulfilled,
        Self::Cancelled,
        Self::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Paid => "paid",
            Self::Fulfilled => "fulfilled",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not one of the five known values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedStatus(pub String);

impl fmt::Display for UnsupportedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported order status: {}", self.0)
    }
}

impl std::error::Error for UnsupportedStatus {}

impl FromStr for OrderStatus {
    type Err = UnsupportedStatus;

    /// Case-insensitive parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or(UnsupportedStatus(s.to_string()))
    }
}

// =============================================================================
// Checkout input
// =============================================================================

/// Customer contact fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInput {
    pub first_name: String,
    pub last_name: String,
    /// Durable customer identity
    pub email: String,
    pub phone: Option<String>,
}

/// Address snapshot supplied at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInput {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    /// Six digits
    pub postal_code: String,
    pub country: String,
    pub label: Option<String>,
}

/// Role of a customer address row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum AddressRole {
    Shipping,
    Billing,
}

impl AddressRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shipping => "shipping",
            Self::Billing => "billing",
        }
    }

    /// Label used when the caller supplied none, e.g. `SHIPPING ADDRESS`
    pub fn default_label(&self) -> String {
        format!("{} ADDRESS", self.as_str().to_uppercase())
    }
}

/// One line of a checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: Option<f64>,
    pub tax: Option<f64>,
}

/// Checkout payload for order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreateInput {
    /// Generated as `ORD-<year>-<8 hex>` when absent
    pub order_number: Option<String>,
    /// External payment reference
    pub transaction_id: String,
    pub channel: Option<String>,
    pub currency: Option<String>,
    pub customer: CustomerInput,
    pub billing_address: Option<AddressInput>,
    pub shipping_address: AddressInput,
    pub items: Vec<OrderItemInput>,
    pub total_amount: f64,
    pub status: Option<OrderStatus>,
    pub note: Option<String>,
}

// =============================================================================
// Aggregated order view
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerSnapshot {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressSnapshot {
    pub id: String,
    pub label: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Current inventory of the product behind an order line
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventorySnapshot {
    pub on_hand: Option<i64>,
    pub reserved: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemSnapshot {
    pub id: String,
    pub product_id: String,
    /// Snapshotted at checkout
    pub sku: String,
    /// Current product name
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: Option<f64>,
    pub tax: Option<f64>,
    pub image_path: Option<String>,
    pub inventory: InventorySnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderEventSnapshot {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub actor: Option<String>,
    pub note: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentSnapshot {
    pub id: String,
    pub transaction_id: String,
    pub status: String,
    pub amount: f64,
    pub currency: String,
    pub method: Option<String>,
    pub processed_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceSnapshot {
    pub id: String,
    pub invoice_number: String,
    /// Relative to the uploads root, e.g. `invoices/INV-2026-1A2B3C.pdf`
    pub pdf_path: String,
    pub generated_at: i64,
    pub total_amount: f64,
    pub currency: String,
}

/// Denormalized order: header, customer, addresses, items, events, payment, invoice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDashboardEntry {
    pub id: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub currency: String,
    pub transaction_id: String,
    pub channel: Option<String>,
    pub note: Option<String>,
    pub placed_at: i64,
    pub customer: CustomerSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<AddressSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<AddressSnapshot>,
    pub items: Vec<OrderItemSnapshot>,
    pub events: Vec<OrderEventSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<InvoiceSnapshot>,
}

impl OrderDashboardEntry {
    /// Events of the given type, in creation order
    pub fn events_of<'a>(
        &'a self,
        event_type: &'a str,
    ) -> impl Iterator<Item = &'a OrderEventSnapshot> + 'a {
        self.events
            .iter()
            .filter(move |event| event.event_type == event_type)
    }
}

/// Result of a status update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChange {
    pub order_number: String,
    pub status: OrderStatus,
}
