//! Admin accounts: creation, login check and the startup seed

use crate::core::Config;
use crate::db::repository::admin;
use crate::utils::validation::validate_admin_credentials;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{AdminCreate, AdminUser};
use sqlx::SqlitePool;

#[derive(Debug, Clone)]
pub struct AdminService {
    pool: SqlitePool,
}

impl AdminService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_admin(&self, data: AdminCreate) -> AppResult<AdminUser> {
        validate_admin_credentials(&data.email, &data.password)?;
        Ok(admin::create_admin_user(&self.pool, data).await?)
    }

    /// Fails with `InvalidCredentials` for an unknown email or a wrong
    /// password alike
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<AdminUser> {
        match admin::authenticate_admin(&self.pool, email, password).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(email = %email, "Admin login rejected");
                Err(AppError::new(ErrorCode::InvalidCredentials))
            }
        }
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<AdminUser>> {
        Ok(admin::find_admin_by_email(&self.pool, email).await?)
    }

    /// Create or promote the configured super admin
    pub async fn ensure_default_admin(&self, config: &Config) -> AppResult<AdminUser> {
        Ok(admin::ensure_default_admin(&self.pool, config).await?)
    }
}
