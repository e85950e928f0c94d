#![doc(test(attr(deny(warnings))))]

//! Expense Analytics turns a user's raw transaction records into period
//! reports: totals, category breakdowns, zero-filled trends, period-over-period
//! comparisons and top expenses, for calendar timeframes or custom ranges.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use analytics::{AnalyticsEngine, AnalyticsReport, PercentChange, ReportQuery};
pub use domain::{Timeframe, TransactionRecord};
pub use errors::{AnalyticsError, Result};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense analytics tracing initialized.");
    });
}
