//! Invoice generation
//!
//! An order has at most one invoice. Regenerating keeps the invoice number,
//! rewrites the PDF and refreshes `generated_at`.

pub mod renderer;

use crate::core::Config;
use crate::core::config::INVOICES_SUBDIR;
use crate::db::repository::{RepoError, RepoResult};
use crate::orders::aggregator;
use crate::orders::engine::{OrderEvent, insert_order_event};
use crate::orders::numbering::generate_invoice_number;
use crate::utils::fs::{ensure_directory, resolve_under};
use renderer::{InvoiceDocument, render_pdf};
use serde_json::json;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OrderDashboardEntry, event_type};
use shared::util::{new_id, now_millis};
use sqlx::SqlitePool;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct InvoiceService {
    pool: SqlitePool,
    uploads_root: PathBuf,
    invoices_dir: PathBuf,
}

impl InvoiceService {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            uploads_root: config.uploads_root.clone(),
            invoices_dir: config.invoices_dir(),
        }
    }

    /// Create or refresh the invoice of an order, returning the order with
    /// its invoice populated
    pub async fn upsert_invoice_for_order(&self, order_id: &str) -> AppResult<OrderDashboardEntry> {
        let order = aggregator::require_order(&self.pool, order_id).await?;
        Ok(self.generate(order).await?)
    }

    /// Same as [`Self::upsert_invoice_for_order`], addressed by payment
    /// transaction id
    pub async fn upsert_invoice_by_transaction(
        &self,
        transaction_id: &str,
    ) -> AppResult<OrderDashboardEntry> {
        let order = aggregator::find_order_by_transaction(&self.pool, transaction_id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("No order for transaction {transaction_id}"),
                )
            })?;
        Ok(self.generate(order).await?)
    }

    /// Absolute path of a stored invoice path, refusing anything that
    /// escapes the uploads root
    pub fn resolve_invoice_path(&self, pdf_path: &str) -> AppResult<PathBuf> {
        resolve_under(&self.uploads_root, pdf_path).ok_or_else(|| {
            AppError::with_message(ErrorCode::InvalidRequest, "Invalid invoice path")
                .with_detail("pdf_path", pdf_path)
        })
    }

    /// PDF bytes of an order's invoice
    pub async fn read_invoice_pdf(&self, order_id: &str) -> AppResult<Vec<u8>> {
        let pdf_path: Option<String> =
            sqlx::query_scalar("SELECT pdf_path FROM invoices WHERE order_id = ?")
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(RepoError::from)?;

        let pdf_path = pdf_path.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvoiceNotFound,
                format!("Order {order_id} has no invoice"),
            )
        })?;

        let path = self.resolve_invoice_path(&pdf_path)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::with_message(
                ErrorCode::InvoiceNotFound,
                format!("Invoice file {pdf_path} is missing"),
            )),
            Err(e) => Err(RepoError::Io(e).into()),
        }
    }

    async fn generate(&self, order: OrderDashboardEntry) -> RepoResult<OrderDashboardEntry> {
        let invoice_number = order
            .invoice
            .as_ref()
            .map(|invoice| invoice.invoice_number.clone())
            .unwrap_or_else(|| generate_invoice_number(order.placed_at));

        let file_name = format!("{invoice_number}.pdf");
        let relative_path = format!("{INVOICES_SUBDIR}/{file_name}");

        let document = InvoiceDocument::from_order(&order, &invoice_number);
        let bytes = render_pdf(&document)?;

        ensure_directory(&self.invoices_dir).await?;
        tokio::fs::write(self.invoices_dir.join(&file_name), &bytes).await?;

        let now = now_millis();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (id, order_id, invoice_number, pdf_path, generated_at, total_amount, currency)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (order_id) DO UPDATE SET
                invoice_number = excluded.invoice_number,
                pdf_path = excluded.pdf_path,
                generated_at = excluded.generated_at,
                total_amount = excluded.total_amount,
                currency = excluded.currency
            "#,
        )
        .bind(new_id())
        .bind(&order.id)
        .bind(&invoice_number)
        .bind(&relative_path)
        .bind(now)
        .bind(order.total_amount)
        .bind(&order.currency)
        .execute(&mut *tx)
        .await?;

        insert_order_event(
            &mut tx,
            OrderEvent {
                order_id: &order.id,
                event_type: event_type::INVOICE_GENERATED,
                actor: Some("system"),
                note: None,
                metadata: json!({
                    "invoiceNumber": invoice_number,
                    "pdfPath": relative_path,
                }),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            order_number = %order.order_number,
            invoice_number = %invoice_number,
            bytes = bytes.len(),
            "Invoice generated"
        );

        aggregator::require_order(&self.pool, &order.id).await
    }
}
