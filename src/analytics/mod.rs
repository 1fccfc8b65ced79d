//! Analytics modules for tables, statistics and chart generation

pub mod logger;
pub mod metrics;
pub mod report;
pub mod summary;
pub mod table;

pub use logger::TableLogger;
pub use metrics::MetricsCalculator;
pub use report::ReportRenderer;
pub use summary::{EmissionSummary, TripSummary};
pub use table::Table;
