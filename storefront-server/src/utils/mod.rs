//! Utilities: logging, caller-layer validation, filesystem helpers

pub mod fs;
pub mod logger;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCode};
