use std::path::{Path, PathBuf};

/// Directory under the uploads root holding invoice PDFs
pub const INVOICES_SUBDIR: &str = "invoices";

/// Storefront configuration, built once at startup and passed to every service
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory (database, uploads) |
/// | DATABASE_PATH | `<WORK_DIR>/storefront.db` | SQLite database file |
/// | UPLOADS_ROOT | `<WORK_DIR>/uploads` | Root for product images and invoices |
/// | DEFAULT_CURRENCY | INR | Store currency for orders and products |
/// | ADMIN_EMAIL | admin@example.com | Seed super admin email |
/// | ADMIN_PASSWORD | admin123 | Seed super admin password |
/// | LOG_LEVEL | info | tracing max level |
/// | LOG_DIR | (unset) | Daily rolling log directory |
/// | ENVIRONMENT | development | development / staging / production |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/storefront DEFAULT_CURRENCY=USD cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub database_path: PathBuf,
    pub uploads_root: PathBuf,
    pub default_currency: String,
    pub admin_email: String,
    pub admin_password: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        let work_dir = PathBuf::from(env_or("WORK_DIR", "./data"));
        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| work_dir.join("storefront.db"));
        let uploads_root = std::env::var("UPLOADS_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| work_dir.join("uploads"));

        Self {
            work_dir,
            database_path,
            uploads_root,
            default_currency: env_or("DEFAULT_CURRENCY", "INR"),
            admin_email: env_or("ADMIN_EMAIL", "admin@example.com"),
            admin_password: env_or("ADMIN_PASSWORD", "admin123"),
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: env_or("ENVIRONMENT", "development"),
        }
    }

    /// Self-contained configuration rooted at `work_dir`
    ///
    /// Ignores the environment; used by tests and tooling.
    pub fn with_work_dir(work_dir: impl AsRef<Path>) -> Self {
        let work_dir = work_dir.as_ref().to_path_buf();
        Self {
            database_path: work_dir.join("storefront.db"),
            uploads_root: work_dir.join("uploads"),
            work_dir,
            default_currency: "INR".into(),
            admin_email: "admin@example.com".into(),
            admin_password: "admin123".into(),
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
        }
    }

    /// `<uploads>/products`
    pub fn product_images_dir(&self) -> PathBuf {
        self.uploads_root.join("products")
    }

    /// `<uploads>/invoices`
    pub fn invoices_dir(&self) -> PathBuf {
        self.uploads_root.join(INVOICES_SUBDIR)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}
