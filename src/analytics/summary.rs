use crate::currency::MoneyFormatter;
use crate::domain::Timeframe;

use super::aggregation::PeriodAggregate;
use super::comparison::{ChangeDirection, ComparisonResult, PercentChange};

/// One-sentence highlight of the current period.
pub fn build_summary(
    timeframe: Timeframe,
    current: &PeriodAggregate,
    comparison: &ComparisonResult,
    money: &MoneyFormatter,
) -> String {
    let period = timeframe.noun();
    let Some(top) = current.top_category() else {
        return no_data_sentence(timeframe);
    };

    let mut summary = format!(
        "This {period}, your highest spending was on {} ({})",
        top.category,
        money.format(top.total)
    );
    let change = comparison.percent_change.rounded();
    match (change, change.direction()) {
        (PercentChange::NewSpending, _) => {
            summary.push_str(", which is new spending compared to last period.");
        }
        (_, ChangeDirection::Unchanged) => {
            summary.push_str(", which is unchanged from last period.");
        }
        (_, direction) => {
            let verb = if direction == ChangeDirection::Increase {
                "increased"
            } else {
                "decreased"
            };
            let magnitude = change.as_f64().unwrap_or_default().abs();
            summary.push_str(&format!(
                ". Your total spending {verb} by {} compared to last {period}.",
                money.format_percent(magnitude)
            ));
        }
    }
    summary
}

pub fn no_data_sentence(timeframe: Timeframe) -> String {
    format!("No spending data available for this {}.", timeframe.noun())
}
