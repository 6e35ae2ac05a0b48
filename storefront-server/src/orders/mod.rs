//! Orders
//!
//! - [`engine`] - transactional writes (checkout, status, delete)
//! - [`aggregator`] - denormalized read path
//! - [`numbering`] - order and invoice numbers

pub mod aggregator;
pub mod engine;
pub mod numbering;

pub use aggregator::OrderFilter;
pub use engine::OrderService;
