use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AnalyticsConfig;
use crate::currency::MoneyFormatter;
use crate::domain::{Expense, Timeframe, TransactionRecord};
use crate::errors::Result;

use super::aggregation::aggregate;
use super::comparison::{compare_categories, compare_totals};
use super::period::{PeriodResolver, ResolvedPeriod};
use super::ranking::{top_expenses, DEFAULT_TOP_EXPENSES};
use super::report::{assemble, AnalyticsReport, ReportParts};
use super::summary::build_summary;

/// Reporting window requested by the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub timeframe: Timeframe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_end: Option<NaiveDate>,
}

impl ReportQuery {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            custom_start: None,
            custom_end: None,
        }
    }

    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            timeframe: Timeframe::Custom,
            custom_start: Some(start),
            custom_end: Some(end),
        }
    }
}

/// Stateless report generator; one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    resolver: PeriodResolver,
    money: MoneyFormatter,
    top_limit: usize,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            resolver: PeriodResolver::default(),
            money: MoneyFormatter::default(),
            top_limit: DEFAULT_TOP_EXPENSES,
        }
    }
}

impl AnalyticsEngine {
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            resolver: PeriodResolver::new(config.zone()?),
            money: config.money_formatter(),
            top_limit: config.top_expenses_limit,
        })
    }

    pub fn resolve(&self, query: &ReportQuery, now: DateTime<Utc>) -> Result<ResolvedPeriod> {
        self.resolver
            .resolve(query.timeframe, now, query.custom_start, query.custom_end)
    }

    /// Resolves the query, then reports on `records`.
    ///
    /// An invalid range is rejected before any record is inspected.
    pub fn generate(
        &self,
        records: &[TransactionRecord],
        query: &ReportQuery,
        now: DateTime<Utc>,
    ) -> Result<AnalyticsReport> {
        let period = self.resolve(query, now)?;
        Ok(self.report_for_period(records, &period))
    }

    pub fn report_for_period(
        &self,
        records: &[TransactionRecord],
        period: &ResolvedPeriod,
    ) -> AnalyticsReport {
        let (expenses, skipped) = self.validate(records);

        let current = aggregate(&expenses, period.current, period.granularity);
        let previous = aggregate(&expenses, period.previous, period.granularity);
        let comparison = compare_totals(&current, &previous);
        let category_comparison = compare_categories(&current, &previous);
        let top = top_expenses(&expenses, &period.current, self.top_limit);
        let summary = build_summary(period.timeframe, &current, &comparison, &self.money);

        info!(
            timeframe = %period.timeframe,
            range = %period.current,
            included = current.included,
            skipped,
            total = current.total,
            "generated analytics report"
        );

        assemble(ReportParts {
            period,
            current: &current,
            comparison: &comparison,
            category_comparison: &category_comparison,
            top_expenses: &top,
            summary,
            skipped_records: skipped,
        })
    }

    fn validate<'a>(&self, records: &'a [TransactionRecord]) -> (Vec<Expense<'a>>, usize) {
        let zone = self.resolver.zone();
        let mut expenses = Vec::with_capacity(records.len());
        let mut skipped = 0;
        for record in records {
            match record.validate(&zone) {
                Ok(expense) => expenses.push(expense),
                Err(reason) => {
                    skipped += 1;
                    warn!(record_id = %record.id, %reason, "skipping malformed record");
                }
            }
        }
        (expenses, skipped)
    }
}
