//! Input processing module
//! Handles document discovery and PDF span collection

pub mod file_detector;
pub mod manager;
pub mod span_collector;

pub use manager::InputManager;
pub use span_collector::{PdfOxideSource, PdfSource, SpanCollector};
