use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::AnalyticsError;

const HOURLY_KEY_FORMAT: &str = "%Y-%m-%dT%H:00";
const DAILY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Half-open `[start, end)` interval of local wall-clock time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, AnalyticsError> {
        if end <= start {
            return Err(AnalyticsError::InvalidRange(format!(
                "range end {end} must be after start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The adjacent range of identical duration that ends where this one starts.
    pub fn preceding(&self) -> Result<Self, AnalyticsError> {
        let start = self
            .start
            .checked_sub_signed(self.duration())
            .ok_or_else(|| {
                AnalyticsError::InvalidRange(format!(
                    "range before {} starts outside the supported calendar",
                    self.start
                ))
            })?;
        Ok(Self {
            start,
            end: self.start,
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Width of a trend bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BucketGranularity {
    Hourly,
    Daily,
}

impl BucketGranularity {
    pub fn step(&self) -> Duration {
        match self {
            BucketGranularity::Hourly => Duration::hours(1),
            BucketGranularity::Daily => Duration::days(1),
        }
    }

    /// Number of buckets needed to cover `range`; a partial trailing bucket counts, and the
    /// result is never zero.
    pub fn bucket_count(&self, range: &DateRange) -> usize {
        let span = range.duration().num_milliseconds();
        let step = self.step().num_milliseconds();
        let count = (span + step - 1) / step;
        count.max(1) as usize
    }

    /// Bucket index of `instant`, which must lie inside `range`.
    pub fn bucket_index(&self, range: &DateRange, instant: NaiveDateTime) -> usize {
        let offset = (instant - range.start).num_milliseconds();
        (offset / self.step().num_milliseconds()) as usize
    }

    pub fn bucket_starts(&self, range: &DateRange) -> impl Iterator<Item = NaiveDateTime> {
        let start = range.start;
        let step = self.step();
        (0..self.bucket_count(range)).map(move |idx| start + step * idx as i32)
    }

    pub fn bucket_key(&self, bucket_start: NaiveDateTime) -> String {
        let pattern = match self {
            BucketGranularity::Hourly => HOURLY_KEY_FORMAT,
            BucketGranularity::Daily => DAILY_KEY_FORMAT,
        };
        bucket_start.format(pattern).to_string()
    }
}
