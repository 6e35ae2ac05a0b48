//! Admin User Repository

use super::{RepoError, RepoResult, is_unique_violation_on};
use crate::core::Config;
use shared::error::ErrorCode;
use shared::models::{AdminCreate, AdminRole, AdminUser};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: String,
    email: String,
    password_hash: String,
    role: AdminRole,
    created_at: i64,
}

impl From<AdminRow> for AdminUser {
    fn from(row: AdminRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

/// Emails are matched case-insensitively
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn find_row_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<AdminRow>> {
    let row = sqlx::query_as::<_, AdminRow>(
        "SELECT id, email, password_hash, role, created_at FROM admin_users WHERE email = ?",
    )
    .bind(normalize_email(email))
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_admin_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<AdminUser>> {
    Ok(find_row_by_email(pool, email).await?.map(AdminUser::from))
}

pub async fn create_admin_user(pool: &SqlitePool, data: AdminCreate) -> RepoResult<AdminUser> {
    let email = normalize_email(&data.email);
    let password_hash = hash_password(&data.password)?;
    let now = shared::util::now_millis();
    let id = shared::util::new_id();

    sqlx::query(
        r#"
        INSERT INTO admin_users (id, email, password_hash, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&email)
    .bind(&password_hash)
    .bind(data.role)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation_on(&e, "admin_users.email") {
            RepoError::duplicate(
                ErrorCode::AdminEmailExists,
                "An admin with that email already exists",
            )
        } else {
            e.into()
        }
    })?;

    tracing::info!(email = %email, role = ?data.role, "Admin user created");

    Ok(AdminUser {
        id,
        email,
        role: data.role,
        created_at: now,
    })
}

/// Returns the admin only when the password verifies
pub async fn authenticate_admin(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> RepoResult<Option<AdminUser>> {
    let Some(row) = find_row_by_email(pool, email).await? else {
        return Ok(None);
    };
    if verify_password(password, &row.password_hash) {
        Ok(Some(row.into()))
    } else {
        Ok(None)
    }
}

/// Startup seed: create the configured admin as super admin, or promote it
pub async fn ensure_default_admin(pool: &SqlitePool, config: &Config) -> RepoResult<AdminUser> {
    match find_admin_by_email(pool, &config.admin_email).await? {
        Some(admin) if admin.role == AdminRole::Superadmin => Ok(admin),
        Some(admin) => {
            sqlx::query("UPDATE admin_users SET role = ?, updated_at = ? WHERE id = ?")
                .bind(AdminRole::Superadmin)
                .bind(shared::util::now_millis())
                .bind(&admin.id)
                .execute(pool)
                .await?;
            tracing::info!(email = %admin.email, "Default admin promoted to superadmin");
            Ok(AdminUser {
                role: AdminRole::Superadmin,
                ..admin
            })
        }
        None => {
            create_admin_user(
                pool,
                AdminCreate {
                    email: config.admin_email.clone(),
                    password: config.admin_password.clone(),
                    role: AdminRole::Superadmin,
                },
            )
            .await
        }
    }
}

fn hash_password(password: &str) -> RepoResult<String> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| RepoError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
