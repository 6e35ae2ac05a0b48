//! Human-readable business numbers

use shared::util::{hex_fragment, now_millis, year_of_millis};

/// `ORD-<current year>-<8 uppercase hex>`
pub fn generate_order_number() -> String {
    format!("ORD-{}-{}", year_of_millis(now_millis()), hex_fragment(8))
}

/// `INV-<year the order was placed>-<6 uppercase hex>`
pub fn generate_invoice_number(placed_at: i64) -> String {
    format!("INV-{}-{}", year_of_millis(placed_at), hex_fragment(6))
}
