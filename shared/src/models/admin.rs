//! Admin User Model

use serde::{Deserialize, Serialize};

/// Admin console role
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum AdminRole {
    Superadmin,
    #[default]
    Viewer,
}

impl AdminRole {
    /// Only super admins may mutate the catalog and orders
    pub fn can_write(&self) -> bool {
        matches!(self, Self::Superadmin)
    }
}

/// Admin user (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub role: AdminRole,
    pub created_at: i64,
}

/// Create admin payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCreate {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: AdminRole,
}
