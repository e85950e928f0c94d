use std::fmt::Write as _;

use chrono::Duration;

use crate::analytics::{AnalyticsReport, PercentChange};
use crate::currency::MoneyFormatter;
use crate::domain::DateRange;

const SEPARATOR: &str = "----------------------------------------";

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "=== {} ===", title.trim());
}

/// Human-readable rendition of a percent change, as shown on the comparison card.
pub fn describe_change(change: &PercentChange) -> String {
    match change {
        PercentChange::NewSpending => "Increased from zero".into(),
        PercentChange::FullyReduced => "Decreased to zero".into(),
        PercentChange::Finite(_) => change.to_string(),
    }
}

fn describe_range(range: &DateRange) -> String {
    let last = range.end - Duration::milliseconds(1);
    let (first, last) = (range.start.date(), last.date());
    if first == last {
        first.to_string()
    } else {
        format!("{first} to {last}")
    }
}

pub fn render_text(report: &AnalyticsReport, money: &MoneyFormatter) -> String {
    let mut out = String::new();
    section(
        &mut out,
        &format!(
            "Expense Analytics: {} ({})",
            report.period_label,
            describe_range(&report.range)
        ),
    );
    let _ = writeln!(out, "{}", report.summary);
    let _ = writeln!(out, "{SEPARATOR}");
    let _ = writeln!(out, "Total Spent:    {}", money.format(report.total_spent));
    let _ = writeln!(out, "Daily Average:  {}", money.format(report.avg_daily_spent));
    let _ = writeln!(
        out,
        "Comparison:     {} {} (Current: {} | Previous: {})",
        describe_change(&report.comparison.percent_change),
        report.comparison.label,
        money.format(report.comparison.current_period_total),
        money.format(report.comparison.previous_period_total)
    );
    if report.skipped_records > 0 {
        let _ = writeln!(out, "Skipped:        {} malformed record(s)", report.skipped_records);
    }

    section(&mut out, "Spending by Category");
    if report.category_breakdown.is_empty() {
        let _ = writeln!(out, "  No category data.");
    }
    for slice in &report.category_breakdown {
        let _ = writeln!(
            out,
            "  {:<20} {:>14}  ({:.1}%)",
            slice.name,
            money.format(slice.value),
            slice.share
        );
    }

    section(&mut out, "Category Comparison");
    if report.category_comparison.is_empty() {
        let _ = writeln!(out, "  No comparison data.");
    }
    for row in &report.category_comparison {
        let _ = writeln!(
            out,
            "  {:<20} {:>14} vs {:>14}  {}",
            row.name,
            money.format(row.current_value),
            money.format(row.previous_value),
            describe_change(&row.percent_change)
        );
    }

    section(&mut out, "Top Expenses");
    if report.top_expenses.is_empty() {
        let _ = writeln!(out, "  No expenses recorded.");
    }
    for (rank, expense) in report.top_expenses.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} [{}] {}  {}",
            rank + 1,
            expense.title,
            expense.category,
            expense.date,
            money.format(expense.amount)
        );
    }

    section(&mut out, "Spending Trend");
    for point in &report.spending_trend {
        let _ = writeln!(out, "  {:<16} {}", point.date, money.format(point.amount));
    }
    out
}
