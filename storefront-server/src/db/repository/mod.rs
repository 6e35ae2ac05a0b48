//! Repository Module
//!
//! Catalog, category and admin-user persistence over SQLite, plus the
//! repository error type shared by the order engine and invoice generator.

pub mod admin;
pub mod category;
pub mod product;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
///
/// Domain variants carry the `ErrorCode` the caller should see; infrastructure
/// variants carry the original error unchanged.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{message}")]
    NotFound { code: ErrorCode, message: String },

    #[error("{message}")]
    Duplicate { code: ErrorCode, message: String },

    #[error("{message}")]
    Validation { code: ErrorCode, message: String },

    #[error("Inventory record missing for product {product_id}")]
    InventoryMissing { product_id: String },

    #[error("{message}")]
    InUse { code: ErrorCode, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepoError {
    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn duplicate(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Duplicate {
            code,
            message: message.into(),
        }
    }

    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn in_use(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::InUse {
            code,
            message: message.into(),
        }
    }

    /// Error code this error surfaces as
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { code, .. }
            | Self::Duplicate { code, .. }
            | Self::Validation { code, .. }
            | Self::InUse { code, .. } => *code,
            Self::InventoryMissing { .. } => ErrorCode::InventoryRecordMissing,
            Self::Database(_) | Self::Migration(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::FileStorageFailed,
            Self::Render(_) => ErrorCode::InvoiceRenderFailed,
            Self::Json(_) | Self::PasswordHash(_) => ErrorCode::InternalError,
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        let code = err.code();
        match err {
            RepoError::NotFound { message, .. }
            | RepoError::Duplicate { message, .. }
            | RepoError::Validation { message, .. }
            | RepoError::InUse { message, .. } => AppError::with_message(code, message),
            RepoError::InventoryMissing { product_id } => AppError::with_message(
                code,
                format!("Inventory record missing for product {product_id}"),
            )
            .with_detail("product_id", product_id),
            infra => {
                tracing::error!(error = %infra, "Repository infrastructure error");
                AppError::with_message(code, infra.to_string())
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Whether `err` is a UNIQUE violation whose message names `column`
/// (SQLite reports `UNIQUE constraint failed: table.column`).
pub(crate) fn is_unique_violation_on(err: &sqlx::Error, column: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.message().contains(column)
        }
        _ => false,
    }
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_their_code() {
        let err: AppError =
            RepoError::not_found(ErrorCode::OrderNotFound, "Order ord-1 not found").into();
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order ord-1 not found");

        let err: AppError =
            RepoError::validation(ErrorCode::OrderStatusUnsupported, "Unsupported order status")
                .into();
        assert_eq!(err.code, ErrorCode::OrderStatusUnsupported);
    }

    #[test]
    fn test_inventory_missing_maps_with_detail() {
        let err: AppError = RepoError::InventoryMissing {
            product_id: "prod-9".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InventoryRecordMissing);
        assert_eq!(err.message, "Inventory record missing for product prod-9");
        assert_eq!(err.details.unwrap().get("product_id").unwrap(), "prod-9");
    }

    #[test]
    fn test_infrastructure_errors_map_to_system_codes() {
        let err: AppError = RepoError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = RepoError::Io(io).into();
        assert_eq!(err.code, ErrorCode::FileStorageFailed);

        let err: AppError = RepoError::Render("font".into()).into();
        assert_eq!(err.code, ErrorCode::InvoiceRenderFailed);
    }

    #[test]
    fn test_unique_violation_helper_ignores_other_errors() {
        assert!(!is_unique_violation_on(&sqlx::Error::RowNotFound, "sku"));
        assert!(!is_foreign_key_violation(&sqlx::Error::PoolTimedOut));
    }
}
