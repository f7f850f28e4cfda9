//! Shared test support for the bodylog crates.

pub mod body;
pub mod tracing;

pub use body::{chunked, failing_after};
pub use crate::tracing::{CapturedEvent, LogCollector, create_log_collector};
