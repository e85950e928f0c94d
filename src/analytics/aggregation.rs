use std::{cmp::Ordering, collections::BTreeMap};

use chrono::NaiveDateTime;

use crate::domain::{BucketGranularity, DateRange, Expense};

/// Total spend for one category inside a range.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAggregate {
    pub category: String,
    pub total: f64,
}

/// One bucket of the spending trend.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub bucket_start: NaiveDateTime,
    pub bucket_key: String,
    pub total: f64,
}

/// Everything derived from the expenses that fall inside a single range.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodAggregate {
    pub range: DateRange,
    pub granularity: BucketGranularity,
    pub total: f64,
    pub bucket_count: usize,
    pub avg_per_bucket: f64,
    /// Descending by total, ties broken by category name.
    pub category_breakdown: Vec<CategoryAggregate>,
    /// Chronological, one point per bucket, zero-filled.
    pub trend: Vec<TrendPoint>,
    pub included: usize,
}

impl PeriodAggregate {
    pub fn is_empty(&self) -> bool {
        self.category_breakdown.is_empty()
    }

    pub fn category_total(&self, category: &str) -> f64 {
        self.category_breakdown
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.total)
            .unwrap_or(0.0)
    }

    pub fn top_category(&self) -> Option<&CategoryAggregate> {
        self.category_breakdown.first()
    }
}

/// Aggregates the expenses that fall inside `range`.
///
/// Amounts are summed in input order so repeated runs over the same slice
/// produce bit-identical totals.
pub fn aggregate(
    expenses: &[Expense<'_>],
    range: DateRange,
    granularity: BucketGranularity,
) -> PeriodAggregate {
    let bucket_count = granularity.bucket_count(&range);
    let mut buckets = vec![0.0_f64; bucket_count];
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    let mut total = 0.0;
    let mut included = 0;

    for expense in expenses
        .iter()
        .filter(|expense| range.contains(expense.occurred_at))
    {
        total += expense.amount;
        *by_category.entry(expense.category).or_insert(0.0) += expense.amount;
        let index = granularity
            .bucket_index(&range, expense.occurred_at)
            .min(bucket_count - 1);
        buckets[index] += expense.amount;
        included += 1;
    }

    let mut category_breakdown: Vec<CategoryAggregate> = by_category
        .into_iter()
        .map(|(category, total)| CategoryAggregate {
            category: category.to_string(),
            total,
        })
        .collect();
    category_breakdown.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });

    let trend = granularity
        .bucket_starts(&range)
        .zip(buckets)
        .map(|(bucket_start, total)| TrendPoint {
            bucket_start,
            bucket_key: granularity.bucket_key(bucket_start),
            total,
        })
        .collect();

    PeriodAggregate {
        range,
        granularity,
        total,
        bucket_count,
        avg_per_bucket: total / bucket_count as f64,
        category_breakdown,
        trend,
        included,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, d)
            .unwrap()
            .and_hms_opt(h, 30, 0)
            .unwrap()
    }

    fn expense<'a>(id: &'a str, category: &'a str, amount: f64, when: NaiveDateTime) -> Expense<'a> {
        Expense {
            id,
            title: id,
            category,
            amount,
            occurred_at: when,
        }
    }

    fn april_first_week() -> DateRange {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 4, 8).unwrap().and_hms_opt(0, 0, 0).unwrap();
        DateRange::new(start, end).unwrap()
    }

    #[test]
    fn breakdown_sorts_by_total_then_name() {
        let expenses = [
            expense("a", "Travel", 30.0, at(1, 9)),
            expense("b", "Food", 30.0, at(2, 9)),
            expense("c", "Bills", 80.0, at(3, 9)),
            expense("d", "Food", 0.0, at(3, 10)),
        ];
        let aggregate = aggregate(&expenses, april_first_week(), BucketGranularity::Daily);
        let names: Vec<&str> = aggregate
            .category_breakdown
            .iter()
            .map(|entry| entry.category.as_str())
            .collect();
        assert_eq!(names, ["Bills", "Food", "Travel"]);
        assert_eq!(aggregate.total, 140.0);
        assert_eq!(aggregate.included, 4);
        assert_eq!(aggregate.top_category().unwrap().category, "Bills");
    }

    #[test]
    fn trend_is_zero_filled_and_sums_to_total() {
        let expenses = [
            expense("a", "Food", 12.5, at(1, 0)),
            expense("b", "Food", 7.5, at(1, 23)),
            expense("c", "Fuel", 40.0, at(7, 23)),
            expense("outside", "Fuel", 99.0, at(8, 0)),
        ];
        let aggregate = aggregate(&expenses, april_first_week(), BucketGranularity::Daily);
        let totals: Vec<f64> = aggregate.trend.iter().map(|point| point.total).collect();
        assert_eq!(totals, [20.0, 0.0, 0.0, 0.0, 0.0, 0.0, 40.0]);
        assert_eq!(aggregate.trend[0].bucket_key, "2024-04-01");
        assert_eq!(aggregate.trend[6].bucket_key, "2024-04-07");
        assert_eq!(totals.iter().sum::<f64>(), aggregate.total);
        assert!((aggregate.avg_per_bucket - 60.0 / 7.0).abs() < 1e-9);
        assert_eq!(aggregate.category_total("Fuel"), 40.0);
        assert_eq!(aggregate.category_total("Rent"), 0.0);
    }

    #[test]
    fn empty_input_still_produces_every_bucket() {
        let aggregate = aggregate(&[], april_first_week(), BucketGranularity::Hourly);
        assert!(aggregate.is_empty());
        assert_eq!(aggregate.trend.len(), 7 * 24);
        assert_eq!(aggregate.total, 0.0);
        assert_eq!(aggregate.avg_per_bucket, 0.0);
        assert!(aggregate.trend.iter().all(|point| point.total == 0.0));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let expenses = [
            expense("a", "Food", 0.1, at(1, 1)),
            expense("b", "Food", 0.2, at(1, 2)),
            expense("c", "Cafe", 0.3, at(2, 3)),
        ];
        let first = aggregate(&expenses, april_first_week(), BucketGranularity::Daily);
        let second = aggregate(&expenses, april_first_week(), BucketGranularity::Daily);
        assert_eq!(first, second);
    }
}
