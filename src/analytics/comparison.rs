use std::{cmp::Ordering, collections::BTreeSet, fmt};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::aggregation::PeriodAggregate;

const NEW_SPENDING_MARKER: &str = "new_spending";

/// Period-over-period change.
///
/// Growth from zero has no meaningful percentage, so it is a variant of its own
/// rather than an infinite float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentChange {
    Finite(f64),
    /// Spending appeared where the previous period had none.
    NewSpending,
    /// Spending dropped to zero from a positive amount; always -100%.
    FullyReduced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Increase,
    Decrease,
    Unchanged,
}

impl PercentChange {
    pub fn between(current: f64, previous: f64) -> Self {
        match (current == 0.0, previous == 0.0) {
            (true, true) => PercentChange::Finite(0.0),
            (false, true) => PercentChange::NewSpending,
            (true, false) => PercentChange::FullyReduced,
            (false, false) => PercentChange::Finite((current - previous) / previous * 100.0),
        }
    }

    /// Numeric value where one exists; `None` for new spending.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PercentChange::Finite(value) => Some(*value),
            PercentChange::FullyReduced => Some(-100.0),
            PercentChange::NewSpending => None,
        }
    }

    pub fn direction(&self) -> ChangeDirection {
        match self {
            PercentChange::NewSpending => ChangeDirection::Increase,
            PercentChange::FullyReduced => ChangeDirection::Decrease,
            PercentChange::Finite(value) => match value.partial_cmp(&0.0) {
                Some(Ordering::Greater) => ChangeDirection::Increase,
                Some(Ordering::Less) => ChangeDirection::Decrease,
                _ => ChangeDirection::Unchanged,
            },
        }
    }

    /// Rounds finite values to two decimals for presentation.
    pub fn rounded(&self) -> Self {
        match self {
            PercentChange::Finite(value) => PercentChange::Finite((value * 100.0).round() / 100.0),
            other => *other,
        }
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::NewSpending => f.write_str("new spending"),
            PercentChange::FullyReduced => f.write_str("-100.00%"),
            PercentChange::Finite(value) if *value > 0.0 => write!(f, "+{value:.2}%"),
            PercentChange::Finite(value) => write!(f, "{value:.2}%"),
        }
    }
}

impl Serialize for PercentChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(NEW_SPENDING_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for PercentChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(f64),
            Marker(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(value) if value == -100.0 => Ok(PercentChange::FullyReduced),
            Wire::Number(value) => Ok(PercentChange::Finite(value)),
            Wire::Marker(marker) if marker == NEW_SPENDING_MARKER => Ok(PercentChange::NewSpending),
            Wire::Marker(other) => Err(de::Error::custom(format!(
                "unknown percent change marker `{other}`"
            ))),
        }
    }
}

/// Overall current-vs-previous totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonResult {
    pub current_total: f64,
    pub previous_total: f64,
    pub percent_change: PercentChange,
}

impl ComparisonResult {
    pub fn new(current_total: f64, previous_total: f64) -> Self {
        Self {
            current_total,
            previous_total,
            percent_change: PercentChange::between(current_total, previous_total),
        }
    }
}

/// Current-vs-previous totals for a single category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryComparison {
    pub category: String,
    pub current: f64,
    pub previous: f64,
    pub percent_change: PercentChange,
}

pub fn compare_totals(current: &PeriodAggregate, previous: &PeriodAggregate) -> ComparisonResult {
    ComparisonResult::new(current.total, previous.total)
}

/// Compares every category seen in either period; a category missing from one
/// side counts as zero there.
///
/// Ordered by current total, then previous total (both descending), then name.
pub fn compare_categories(
    current: &PeriodAggregate,
    previous: &PeriodAggregate,
) -> Vec<CategoryComparison> {
    let names: BTreeSet<&str> = current
        .category_breakdown
        .iter()
        .chain(previous.category_breakdown.iter())
        .map(|entry| entry.category.as_str())
        .collect();

    let mut comparisons: Vec<CategoryComparison> = names
        .into_iter()
        .map(|name| {
            let now = current.category_total(name);
            let before = previous.category_total(name);
            CategoryComparison {
                category: name.to_string(),
                current: now,
                previous: before,
                percent_change: PercentChange::between(now, before),
            }
        })
        .collect();

    comparisons.sort_by(|a, b| {
        b.current
            .partial_cmp(&a.current)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.previous.partial_cmp(&a.previous).unwrap_or(Ordering::Equal))
            .then_with(|| a.category.cmp(&b.category))
    });
    comparisons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregation::aggregate;
    use crate::domain::{BucketGranularity, DateRange, Expense};
    use chrono::NaiveDate;

    #[test]
    fn special_cases_follow_zero_semantics() {
        assert_eq!(PercentChange::between(0.0, 0.0), PercentChange::Finite(0.0));
        assert_eq!(PercentChange::between(100.0, 0.0), PercentChange::NewSpending);
        assert_eq!(PercentChange::between(0.0, 100.0), PercentChange::FullyReduced);
        assert_eq!(PercentChange::between(0.0, 100.0).as_f64(), Some(-100.0));
        assert_eq!(PercentChange::between(150.0, 100.0), PercentChange::Finite(50.0));
        assert_eq!(PercentChange::between(75.0, 100.0), PercentChange::Finite(-25.0));
        // Any positive spend counts, however small.
        assert_eq!(PercentChange::between(1e-20, 0.0), PercentChange::NewSpending);
        assert_eq!(PercentChange::between(0.0, 1e-20), PercentChange::FullyReduced);
    }

    #[test]
    fn direction_and_rounding() {
        assert_eq!(PercentChange::NewSpending.direction(), ChangeDirection::Increase);
        assert_eq!(PercentChange::FullyReduced.direction(), ChangeDirection::Decrease);
        assert_eq!(PercentChange::Finite(0.0).direction(), ChangeDirection::Unchanged);
        assert_eq!(
            PercentChange::between(200.0, 300.0).rounded(),
            PercentChange::Finite(-33.33)
        );
        assert_eq!(PercentChange::Finite(12.5).to_string(), "+12.50%");
        assert_eq!(PercentChange::FullyReduced.to_string(), "-100.00%");
    }

    #[test]
    fn serializes_marker_and_numbers() {
        let encoded = serde_json::to_string(&[
            PercentChange::Finite(12.5),
            PercentChange::NewSpending,
            PercentChange::FullyReduced,
        ])
        .unwrap();
        assert_eq!(encoded, r#"[12.5,"new_spending",-100.0]"#);

        let decoded: Vec<PercentChange> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            decoded,
            [
                PercentChange::Finite(12.5),
                PercentChange::NewSpending,
                PercentChange::FullyReduced
            ]
        );
        assert!(serde_json::from_str::<PercentChange>(r#""infinity""#).is_err());
    }

    #[test]
    fn category_comparison_covers_union_of_categories() {
        let day = |d: u32| {
            NaiveDate::from_ymd_opt(2024, 1, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let expense = |category: &'static str, amount: f64, d: u32| Expense {
            id: category,
            title: category,
            category,
            amount,
            occurred_at: day(d) + chrono::Duration::hours(12),
        };
        let previous_range = DateRange::new(day(1), day(8)).unwrap();
        let current_range = DateRange::new(day(8), day(15)).unwrap();
        let expenses = [
            expense("Food", 50.0, 2),
            expense("Gym", 30.0, 3),
            expense("Food", 80.0, 9),
            expense("Books", 20.0, 10),
        ];
        let previous = aggregate(&expenses, previous_range, BucketGranularity::Daily);
        let current = aggregate(&expenses, current_range, BucketGranularity::Daily);

        let overall = compare_totals(&current, &previous);
        assert_eq!(overall.current_total, 100.0);
        assert_eq!(overall.previous_total, 80.0);
        assert_eq!(overall.percent_change, PercentChange::Finite(25.0));

        let rows = compare_categories(&current, &previous);
        let summary: Vec<(&str, f64, f64, PercentChange)> = rows
            .iter()
            .map(|row| (row.category.as_str(), row.current, row.previous, row.percent_change))
            .collect();
        assert_eq!(
            summary,
            [
                ("Food", 80.0, 50.0, PercentChange::Finite(60.0)),
                ("Books", 20.0, 0.0, PercentChange::NewSpending),
                ("Gym", 0.0, 30.0, PercentChange::FullyReduced),
            ]
        );
    }
}
