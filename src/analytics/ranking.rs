use std::cmp::Ordering;

use crate::domain::{DateRange, Expense};

pub const DEFAULT_TOP_EXPENSES: usize = 5;

/// Largest expenses inside `range`, at most `limit` of them.
///
/// Ties on amount go to the more recent expense, then to the lower id so the
/// order never depends on input position.
pub fn top_expenses<'a>(
    expenses: &[Expense<'a>],
    range: &DateRange,
    limit: usize,
) -> Vec<Expense<'a>> {
    let mut ranked: Vec<Expense<'a>> = expenses
        .iter()
        .filter(|expense| range.contains(expense.occurred_at))
        .copied()
        .collect();
    ranked.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.occurred_at.cmp(&a.occurred_at))
            .then_with(|| a.id.cmp(b.id))
    });
    ranked.truncate(limit);
    ranked
}
