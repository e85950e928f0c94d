//! Response contract consumed by charts, cards and exports.
//!
//! Monetary values are rounded to cents here and nowhere earlier.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::{BucketGranularity, DateRange, Expense, Timeframe};

use super::aggregation::PeriodAggregate;
use super::comparison::{CategoryComparison, ComparisonResult, PercentChange};
use super::period::ResolvedPeriod;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub timeframe: Timeframe,
    pub period_label: String,
    pub range: DateRange,
    pub previous_range: DateRange,
    pub total_spent: f64,
    pub avg_daily_spent: f64,
    pub category_breakdown: Vec<CategorySlice>,
    pub spending_trend: Vec<TrendEntry>,
    pub top_expenses: Vec<TopExpense>,
    pub comparison: PeriodComparison,
    pub category_comparison: Vec<CategoryComparisonEntry>,
    pub summary: String,
    pub skipped_records: usize,
}

impl AnalyticsReport {
    pub fn has_data(&self) -> bool {
        !self.category_breakdown.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySlice {
    pub name: String,
    pub value: f64,
    /// Percent of the period total, 0 when nothing was spent.
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendEntry {
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopExpense {
    pub id: String,
    pub title: String,
    pub category: String,
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub current_period_total: f64,
    pub previous_period_total: f64,
    pub percent_change: PercentChange,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComparisonEntry {
    pub name: String,
    pub current_value: f64,
    pub previous_value: f64,
    pub percent_change: PercentChange,
}

/// Intermediate results of one engine run, borrowed for assembly.
pub struct ReportParts<'r, 'a> {
    pub period: &'r ResolvedPeriod,
    pub current: &'r PeriodAggregate,
    pub comparison: &'r ComparisonResult,
    pub category_comparison: &'r [CategoryComparison],
    pub top_expenses: &'r [Expense<'a>],
    pub summary: String,
    pub skipped_records: usize,
}

pub fn assemble(parts: ReportParts<'_, '_>) -> AnalyticsReport {
    let ReportParts {
        period,
        current,
        comparison,
        category_comparison,
        top_expenses,
        summary,
        skipped_records,
    } = parts;

    let days = BucketGranularity::Daily.bucket_count(&period.current);
    let category_totals: Vec<f64> = current
        .category_breakdown
        .iter()
        .map(|entry| entry.total)
        .collect();
    let category_values = apportion_cents(&category_totals, current.total);
    let trend_totals: Vec<f64> = current.trend.iter().map(|point| point.total).collect();
    let trend_amounts = apportion_cents(&trend_totals, current.total);

    AnalyticsReport {
        timeframe: period.timeframe,
        period_label: period.timeframe.period_label().to_string(),
        range: period.current,
        previous_range: period.previous,
        total_spent: round_cents(current.total),
        avg_daily_spent: round_cents(current.total / days as f64),
        category_breakdown: current
            .category_breakdown
            .iter()
            .zip(category_values)
            .map(|(entry, value)| CategorySlice {
                name: entry.category.clone(),
                value,
                share: share_of(entry.total, current.total),
            })
            .collect(),
        spending_trend: current
            .trend
            .iter()
            .zip(trend_amounts)
            .map(|(point, amount)| TrendEntry {
                date: point.bucket_key.clone(),
                amount,
            })
            .collect(),
        top_expenses: top_expenses
            .iter()
            .map(|expense| TopExpense {
                id: expense.id.to_string(),
                title: expense.title.to_string(),
                category: expense.category.to_string(),
                date: period.granularity.bucket_key(expense.occurred_at),
                amount: round_cents(expense.amount),
            })
            .collect(),
        comparison: PeriodComparison {
            current_period_total: round_cents(comparison.current_total),
            previous_period_total: round_cents(comparison.previous_total),
            percent_change: comparison.percent_change.rounded(),
            label: period.timeframe.comparison_label().to_string(),
        },
        category_comparison: category_comparison
            .iter()
            .map(|row| CategoryComparisonEntry {
                name: row.category.clone(),
                current_value: round_cents(row.current),
                previous_value: round_cents(row.previous),
                percent_change: row.percent_change.rounded(),
            })
            .collect(),
        summary,
        skipped_records,
    }
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds `parts` to cents so that they add up exactly to `round_cents(total)`.
///
/// Every part is floored to a whole cent; the cents still missing go to the
/// parts with the largest remainders, earlier parts first on ties.
fn apportion_cents(parts: &[f64], total: f64) -> Vec<f64> {
    let scaled: Vec<f64> = parts.iter().map(|part| part * 100.0).collect();
    let mut cents: Vec<i64> = scaled.iter().map(|value| value.floor() as i64).collect();
    let target = (total * 100.0).round() as i64;
    let missing = target - cents.iter().sum::<i64>();

    let mut order: Vec<usize> = (0..parts.len()).collect();
    order.sort_by(|&a, &b| {
        let (rem_a, rem_b) = (scaled[a] - scaled[a].floor(), scaled[b] - scaled[b].floor());
        rem_b
            .partial_cmp(&rem_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    if missing > 0 {
        for &index in order.iter().cycle().take(missing as usize) {
            cents[index] += 1;
        }
    } else if missing < 0 {
        let mut excess = -missing;
        for &index in order.iter().rev() {
            if excess == 0 {
                break;
            }
            if cents[index] > 0 {
                cents[index] -= 1;
                excess -= 1;
            }
        }
    }
    cents.into_iter().map(|cent| cent as f64 / 100.0).collect()
}

fn share_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        (part / whole * 1000.0).round() / 10.0
    }
}
