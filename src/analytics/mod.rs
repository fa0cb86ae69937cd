pub mod cache;
pub mod engine;
pub mod report;
pub mod types;

pub use cache::AnalyticsCache;
pub use engine::{compute_analytics, AnalyticsEngine};
pub use types::{
    AnalyticsResult, DirectionBucket, DirectionStats, EquityPoint, EquityPointKind,
    InstrumentStats, PerformanceAnalytics, PROFIT_FACTOR_CAP,
};
