pub mod analytics;
pub mod config;
pub mod ledger;
pub mod models;
#[cfg(test)]
pub mod test_helpers;

pub use analytics::{compute_analytics, AnalyticsEngine, AnalyticsResult, PerformanceAnalytics};
