pub mod core;
pub mod edinet;

// Re-exports
pub use crate::core::config::EdinetConfig;
pub use edinet::{
    AliasTable, CategoryFilter, Extraction, FilingQuery, FilingRecord, FilingRegistry,
    HttpRegistry, Metric, MetricSet, MetricValue, Orchestrator, Representation, ResolveError,
};
