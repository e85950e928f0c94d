use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const UNTITLED: &str = "Untitled expense";

/// A transaction as delivered by the record source.
///
/// Fields the source may omit or corrupt are optional so a bad record can be
/// represented, reported and skipped instead of failing the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub occurred_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
}

impl TransactionRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            amount: Some(amount),
            category: Some(category.into()),
            occurred_at: Some(occurred_at),
            title: Some(title.into()),
        }
    }

    /// Checks the record and projects its timestamp into the reporting zone.
    pub fn validate(&self, zone: &FixedOffset) -> Result<Expense<'_>, SkipReason> {
        let amount = self.amount.ok_or(SkipReason::MissingAmount)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(SkipReason::InvalidAmount(amount));
        }
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(SkipReason::MissingCategory)?;
        let occurred_at = self.occurred_at.ok_or(SkipReason::MissingTimestamp)?;
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(UNTITLED);
        Ok(Expense {
            id: &self.id,
            title,
            category,
            amount,
            occurred_at: occurred_at.with_timezone(zone).naive_local(),
        })
    }
}

/// A validated record borrowed from its source, timestamp in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expense<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub category: &'a str,
    pub amount: f64,
    pub occurred_at: NaiveDateTime,
}

/// Why a record was left out of aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    MissingAmount,
    InvalidAmount(f64),
    MissingCategory,
    MissingTimestamp,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingAmount => f.write_str("amount is missing or not numeric"),
            SkipReason::InvalidAmount(amount) => {
                write!(f, "amount {amount} is not a finite non-negative number")
            }
            SkipReason::MissingCategory => f.write_str("category is missing or blank"),
            SkipReason::MissingTimestamp => f.write_str("timestamp is missing or unparseable"),
        }
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(id)) => id,
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        _ => None,
    })
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (read as UTC midnight).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::String(raw)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc()))
}
