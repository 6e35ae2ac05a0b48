//! Invoice layout and PDF rendering
//!
//! Layout is computed as plain text placements first ([`InvoiceDocument::layout`]),
//! then drawn with printpdf's builtin Helvetica faces. Money is computed in
//! `Decimal` and rounded half away from zero to two places.

use crate::db::repository::{RepoError, RepoResult};
use chrono::TimeZone;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::models::{AddressSnapshot, OrderDashboardEntry};

// A4, millimetres
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 277.0;
const BOTTOM: f32 = 20.0;
const LEFT: f32 = 20.0;
const LINE_HEIGHT: f32 = 6.0;
const ROW_HEIGHT: f32 = 6.5;

const TITLE_SIZE: f32 = 20.0;
const BODY_SIZE: f32 = 11.0;

const COL_SKU: f32 = LEFT;
const COL_PRODUCT: f32 = 48.0;
const COL_QTY: f32 = 118.0;
const COL_UNIT: f32 = 134.0;
const COL_TOTAL: f32 = 166.0;

const MAX_PRODUCT_CHARS: usize = 36;
const SKU_COLUMN_CHARS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// One piece of text at an absolute position (mm from bottom-left)
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub text: String,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub weight: FontWeight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    pub sku: String,
    pub product_name: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
}

/// Everything printed on an invoice, already formatted
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub header_lines: Vec<String>,
    pub bill_to: Vec<String>,
    pub ship_to: Option<Vec<String>>,
    pub lines: Vec<InvoiceLine>,
    pub total_line: String,
}

/// `unit_price * quantity - discount + tax`, rounded to cents
pub fn line_total(unit_price: f64, quantity: i64, discount: Option<f64>, tax: Option<f64>) -> Decimal {
    let total = to_decimal(unit_price) * Decimal::from(quantity) - to_decimal(discount.unwrap_or(0.0))
        + to_decimal(tax.unwrap_or(0.0));
    round_cents(total)
}

/// `INR 2000.00`
pub fn format_money(currency: &str, amount: Decimal) -> String {
    format!("{currency} {:.2}", round_cents(amount))
}

fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}

fn format_timestamp(millis: i64) -> String {
    chrono::Utc
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn address_lines(address: &AddressSnapshot) -> Vec<String> {
    let locality = [&address.city, &address.state, &address.postal_code]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    [
        address.line1.clone(),
        address.line2.clone(),
        Some(locality),
        address.country.clone(),
    ]
    .into_iter()
    .flatten()
    .filter(|line| !line.is_empty())
    .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

impl InvoiceDocument {
    pub fn from_order(order: &OrderDashboardEntry, invoice_number: &str) -> Self {
        let currency = order.currency.as_str();

        let header_lines = vec![
            format!("Invoice Number: {invoice_number}"),
            format!("Order Number: {}", order.order_number),
            format!("Transaction ID: {}", order.transaction_id),
            format!("Placed At: {}", format_timestamp(order.placed_at)),
        ];

        let customer = &order.customer;
        let mut bill_to = vec![
            format!("{} {}", customer.first_name, customer.last_name),
            customer.email.clone(),
        ];
        if let Some(phone) = customer.phone.as_ref().filter(|p| !p.is_empty()) {
            bill_to.push(phone.clone());
        }

        let lines = order
            .items
            .iter()
            .map(|item| InvoiceLine {
                sku: item.sku.clone(),
                product_name: item.product_name.clone(),
                quantity: item.quantity.to_string(),
                unit_price: format_money(currency, to_decimal(item.unit_price)),
                line_total: format_money(
                    currency,
                    line_total(item.unit_price, item.quantity, item.discount, item.tax),
                ),
            })
            .collect();

        Self {
            invoice_number: invoice_number.to_string(),
            header_lines,
            bill_to,
            ship_to: order.shipping_address.as_ref().map(address_lines),
            lines,
            total_line: format!(
                "Total: {}",
                format_money(currency, to_decimal(order.total_amount))
            ),
        }
    }

    /// Text placements per page
    pub fn layout(&self) -> Vec<Vec<TextOp>> {
        let mut cursor = Cursor::new();

        cursor.put(150.0, "Invoice", TITLE_SIZE, FontWeight::Bold);
        cursor.advance(LINE_HEIGHT * 2.0);

        for line in &self.header_lines {
            cursor.line(line, FontWeight::Regular);
        }
        cursor.advance(LINE_HEIGHT);

        cursor.line("Bill To:", FontWeight::Bold);
        for line in &self.bill_to {
            cursor.line(line, FontWeight::Regular);
        }

        if let Some(ship_to) = &self.ship_to {
            cursor.advance(LINE_HEIGHT);
            cursor.line("Ship To:", FontWeight::Bold);
            for line in ship_to {
                cursor.line(line, FontWeight::Regular);
            }
        }

        cursor.advance(LINE_HEIGHT);
        cursor.line("Items:", FontWeight::Bold);
        cursor.table_header();

        for row in &self.lines {
            // SKUs wider than their column get a row of their own
            let wide_sku = row.sku.chars().count() > SKU_COLUMN_CHARS;
            let height = if wide_sku { ROW_HEIGHT * 2.0 } else { ROW_HEIGHT };
            if cursor.page_break_needed(height) {
                cursor.new_page();
                cursor.table_header();
            }
            cursor.put(COL_SKU, &row.sku, BODY_SIZE, FontWeight::Regular);
            if wide_sku {
                cursor.advance(ROW_HEIGHT);
            }
            cursor.put(
                COL_PRODUCT,
                &truncate(&row.product_name, MAX_PRODUCT_CHARS),
                BODY_SIZE,
                FontWeight::Regular,
            );
            cursor.put(COL_QTY, &row.quantity, BODY_SIZE, FontWeight::Regular);
            cursor.put(COL_UNIT, &row.unit_price, BODY_SIZE, FontWeight::Regular);
            cursor.put(COL_TOTAL, &row.line_total, BODY_SIZE, FontWeight::Regular);
            cursor.advance(ROW_HEIGHT);
        }

        if cursor.page_break_needed(LINE_HEIGHT * 2.0) {
            cursor.new_page();
        }
        cursor.advance(LINE_HEIGHT);
        cursor.put(COL_UNIT, &self.total_line, BODY_SIZE + 1.0, FontWeight::Bold);

        cursor.pages
    }
}

struct Cursor {
    pages: Vec<Vec<TextOp>>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: TOP,
        }
    }

    fn page_break_needed(&self, height: f32) -> bool {
        self.y - height < BOTTOM
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = TOP;
    }

    fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    fn put(&mut self, x: f32, text: &str, size: f32, weight: FontWeight) {
        let op = TextOp {
            text: text.to_string(),
            size,
            x,
            y: self.y,
            weight,
        };
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }

    fn line(&mut self, text: &str, weight: FontWeight) {
        if self.page_break_needed(LINE_HEIGHT) {
            self.new_page();
        }
        self.put(LEFT, text, BODY_SIZE, weight);
        self.advance(LINE_HEIGHT);
    }

    fn table_header(&mut self) {
        if self.page_break_needed(ROW_HEIGHT * 2.0) {
            self.new_page();
        }
        for (x, label) in [
            (COL_SKU, "SKU"),
            (COL_PRODUCT, "Product"),
            (COL_QTY, "Qty"),
            (COL_UNIT, "Unit Price"),
            (COL_TOTAL, "Line Total"),
        ] {
            self.put(x, label, BODY_SIZE, FontWeight::Bold);
        }
        self.advance(ROW_HEIGHT);
    }
}

fn render_error(err: impl std::fmt::Display) -> RepoError {
    RepoError::Render(err.to_string())
}

/// Draw the invoice and return the PDF bytes
pub fn render_pdf(document: &InvoiceDocument) -> RepoResult<Vec<u8>> {
    let pages = document.layout();

    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("Invoice {}", document.invoice_number),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Page 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(render_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_error)?;

    for (index, ops) in pages.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Page {}", index + 1))
        };
        let layer = doc.get_page(page).get_layer(layer);

        for op in ops {
            let font = match op.weight {
                FontWeight::Regular => &regular,
                FontWeight::Bold => &bold,
            };
            layer.use_text(op.text.clone(), op.size, Mm(op.x), Mm(op.y), font);
        }
    }

    doc.save_to_bytes().map_err(render_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{
        CustomerSnapshot, InventorySnapshot, OrderItemSnapshot, OrderStatus,
    };

    fn sample_order(item_count: usize) -> OrderDashboardEntry {
        let items = (0..item_count)
            .map(|i| OrderItemSnapshot {
                id: format!("item-{i}"),
                product_id: "prod-1".into(),
                sku: "SHOE-1".into(),
                product_name: "Trail Runner".into(),
                quantity: 2,
                unit_price: 1000.0,
                discount: Some(0.0),
                tax: Some(0.0),
                image_path: None,
                inventory: InventorySnapshot::default(),
            })
            .collect();

        OrderDashboardEntry {
            id: "ord-1".into(),
            order_number: "ORD-2026-1A2B3C4D".into(),
            status: OrderStatus::Processing,
            total_amount: 2000.0,
            currency: "INR".into(),
            transaction_id: "TXN-1".into(),
            channel: Some("web".into()),
            note: None,
            placed_at: 1_709_251_200_000,
            customer: CustomerSnapshot {
                id: "cust-1".into(),
                first_name: "Asha".into(),
                last_name: "Rao".into(),
                email: "asha@example.com".into(),
                phone: None,
            },
            shipping_address: Some(AddressSnapshot {
                id: "addr-1".into(),
                label: Some("SHIPPING ADDRESS".into()),
                line1: Some("12 MG Road".into()),
                line2: None,
                city: Some("Bengaluru".into()),
                state: None,
                postal_code: Some("560001".into()),
                country: Some("IN".into()),
            }),
            billing_address: None,
            items,
            events: vec![],
            payment: None,
            invoice: None,
        }
    }

    #[test]
    fn test_line_total_applies_discount_and_tax() {
        assert_eq!(line_total(1000.0, 2, None, None), Decimal::new(200000, 2));
        assert_eq!(
            line_total(250.5, 2, Some(1.0), Some(0.25)),
            Decimal::new(50025, 2)
        );
    }

    #[test]
    fn test_format_money_rounds_half_away_from_zero() {
        assert_eq!(format_money("INR", Decimal::new(2000, 0)), "INR 2000.00");
        assert_eq!(format_money("USD", Decimal::new(10005, 3)), "USD 10.01");
        assert_eq!(format_money("USD", Decimal::new(-10005, 3)), "USD -10.01");
    }

    #[test]
    fn test_document_contents() {
        let doc = InvoiceDocument::from_order(&sample_order(1), "INV-2024-ABCDEF");

        assert_eq!(doc.header_lines[0], "Invoice Number: INV-2024-ABCDEF");
        assert_eq!(doc.header_lines[1], "Order Number: ORD-2026-1A2B3C4D");
        assert_eq!(doc.header_lines[3], "Placed At: 2024-03-01 00:00 UTC");
        assert_eq!(doc.bill_to, vec!["Asha Rao", "asha@example.com"]);
        assert_eq!(
            doc.ship_to,
            Some(vec![
                "12 MG Road".to_string(),
                "Bengaluru, 560001".to_string(),
                "IN".to_string(),
            ])
        );
        assert_eq!(doc.lines[0].unit_price, "INR 1000.00");
        assert_eq!(doc.lines[0].line_total, "INR 2000.00");
        assert_eq!(doc.total_line, "Total: INR 2000.00");
    }

    #[test]
    fn test_layout_paginates_and_repeats_table_header() {
        let doc = InvoiceDocument::from_order(&sample_order(80), "INV-2024-ABCDEF");
        let pages = doc.layout();

        assert!(pages.len() > 1);
        for page in &pages[1..] {
            assert!(page.iter().any(|op| op.text == "SKU" && op.weight == FontWeight::Bold));
        }
        let rows: usize = pages
            .iter()
            .flatten()
            .filter(|op| op.text == "INR 2000.00" && op.x == COL_TOTAL)
            .count();
        assert_eq!(rows, 80);
        assert!(pages.iter().flatten().all(|op| op.y >= BOTTOM));
        assert!(
            pages
                .last()
                .unwrap()
                .iter()
                .any(|op| op.text == "Total: INR 2000.00")
        );
    }

    #[test]
    fn test_long_product_names_are_truncated() {
        let name = "x".repeat(80);
        let cut = truncate(&name, MAX_PRODUCT_CHARS);
        assert_eq!(cut.chars().count(), MAX_PRODUCT_CHARS);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_long_skus_are_printed_in_full() {
        let mut order = sample_order(2);
        let sku = "TRAIL-RUNNER-2026-OLIVE-XL".to_string();
        order.items[0].sku = sku.clone();
        let pages = InvoiceDocument::from_order(&order, "INV-2024-ABCDEF").layout();
        let ops: Vec<&TextOp> = pages.iter().flatten().collect();

        let sku_op = ops.iter().find(|op| op.text == sku).unwrap();
        assert_eq!(sku_op.x, COL_SKU);
        let names: Vec<f32> = ops
            .iter()
            .filter(|op| op.text == "Trail Runner")
            .map(|op| op.y)
            .collect();
        assert_eq!(names.len(), 2);
        // Product row sits below the wide SKU, not beside it
        assert!(names[0] < sku_op.y);
        assert!(ops.iter().any(|op| op.text == "SHOE-1" && op.y == names[1]));
    }

    #[test]
    fn test_render_pdf_produces_pdf_bytes() {
        let doc = InvoiceDocument::from_order(&sample_order(3), "INV-2024-ABCDEF");
        let bytes = render_pdf(&doc).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
