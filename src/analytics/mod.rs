//! Expense analytics: period resolution, aggregation, comparison, ranking and
//! the report contract built from them.

pub mod aggregation;
pub mod comparison;
pub mod engine;
pub mod period;
pub mod ranking;
pub mod report;
pub mod summary;

pub use aggregation::{CategoryAggregate, PeriodAggregate, TrendPoint};
pub use comparison::{CategoryComparison, ChangeDirection, ComparisonResult, PercentChange};
pub use engine::{AnalyticsEngine, ReportQuery};
pub use period::{PeriodResolver, ResolvedPeriod};
pub use report::AnalyticsReport;
