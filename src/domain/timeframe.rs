use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::window::BucketGranularity;
use crate::errors::AnalyticsError;

/// Reporting window selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    Custom,
}

impl Timeframe {
    pub const ALL: [Timeframe; 6] = [
        Timeframe::Day,
        Timeframe::Week,
        Timeframe::Month,
        Timeframe::Quarter,
        Timeframe::Year,
        Timeframe::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Day => "day",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Quarter => "quarter",
            Timeframe::Year => "year",
            Timeframe::Custom => "custom",
        }
    }

    /// Noun used in sentences such as "this month" or "last period".
    pub fn noun(&self) -> &'static str {
        match self {
            Timeframe::Custom => "period",
            other => other.as_str(),
        }
    }

    pub fn period_label(&self) -> &'static str {
        match self {
            Timeframe::Day => "Today",
            Timeframe::Week => "This Week",
            Timeframe::Month => "This Month",
            Timeframe::Quarter => "This Quarter",
            Timeframe::Year => "This Year",
            Timeframe::Custom => "Custom Range",
        }
    }

    pub fn comparison_label(&self) -> &'static str {
        match self {
            Timeframe::Day => "vs. Yesterday",
            Timeframe::Week => "vs. Last Week",
            Timeframe::Month => "vs. Last Month",
            Timeframe::Quarter => "vs. Last Quarter",
            Timeframe::Year => "vs. Last Year",
            Timeframe::Custom => "vs. Previous Period",
        }
    }

    /// Trend buckets are hourly for a single day and daily for everything else.
    pub fn granularity(&self) -> BucketGranularity {
        match self {
            Timeframe::Day => BucketGranularity::Hourly,
            _ => BucketGranularity::Daily,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = AnalyticsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim().to_ascii_lowercase();
        Timeframe::ALL
            .into_iter()
            .find(|timeframe| timeframe.as_str() == token)
            .ok_or_else(|| {
                AnalyticsError::InvalidInput(format!(
                    "unknown timeframe `{}` (expected day, week, month, quarter, year or custom)",
                    raw.trim()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens_case_insensitively() {
        assert_eq!("Month".parse::<Timeframe>().unwrap(), Timeframe::Month);
        assert_eq!(" custom ".parse::<Timeframe>().unwrap(), Timeframe::Custom);
        assert!("fortnight".parse::<Timeframe>().is_err());
    }

    #[test]
    fn only_day_uses_hourly_buckets() {
        for timeframe in Timeframe::ALL {
            let expected = if timeframe == Timeframe::Day {
                BucketGranularity::Hourly
            } else {
                BucketGranularity::Daily
            };
            assert_eq!(timeframe.granularity(), expected, "{timeframe}");
        }
    }
}
