//! Turns a timeframe selector into concrete reporting ranges.
//!
//! Every range is half-open and aligned to local calendar midnight in the
//! resolver's zone. Calendar timeframes (month, quarter, year) compare against
//! the prior calendar unit, so the previous range may be shorter or longer than
//! the current one. Day, week and custom ranges compare against the adjacent
//! range of identical duration.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc,
};
use tracing::debug;

use crate::domain::{BucketGranularity, DateRange, Timeframe};
use crate::errors::{AnalyticsError, Result};

/// Current and previous ranges for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPeriod {
    pub timeframe: Timeframe,
    pub current: DateRange,
    pub previous: DateRange,
    pub granularity: BucketGranularity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodResolver {
    zone: FixedOffset,
}

impl Default for PeriodResolver {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl PeriodResolver {
    pub fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// Resolves `timeframe` relative to `now`.
    ///
    /// Custom bounds are calendar dates: the range runs from `custom_start` at
    /// midnight through the whole of `custom_end`. They are required for
    /// [`Timeframe::Custom`] and ignored otherwise.
    pub fn resolve(
        &self,
        timeframe: Timeframe,
        now: DateTime<Utc>,
        custom_start: Option<NaiveDate>,
        custom_end: Option<NaiveDate>,
    ) -> Result<ResolvedPeriod> {
        let today = now.with_timezone(&self.zone).date_naive();
        if timeframe != Timeframe::Custom && (custom_start.is_some() || custom_end.is_some()) {
            debug!(%timeframe, "ignoring custom bounds for non-custom timeframe");
        }

        let (current, previous) = match timeframe {
            Timeframe::Day => adjacent(today, offset_days(today, 1)?)?,
            Timeframe::Week => {
                let monday = offset_days(today, -(today.weekday().num_days_from_monday() as i64))?;
                adjacent(monday, offset_days(monday, 7)?)?
            }
            Timeframe::Month => calendar(first_of_month(today), 1)?,
            Timeframe::Quarter => {
                let quarter_month = today.month0() / 3 * 3 + 1;
                let start = NaiveDate::from_ymd_opt(today.year(), quarter_month, 1)
                    .ok_or_else(|| out_of_range(today))?;
                calendar(start, 3)?
            }
            Timeframe::Year => {
                let start =
                    NaiveDate::from_ymd_opt(today.year(), 1, 1).ok_or_else(|| out_of_range(today))?;
                calendar(start, 12)?
            }
            Timeframe::Custom => {
                let (start, end) = match (custom_start, custom_end) {
                    (Some(start), Some(end)) => (start, end),
                    _ => {
                        return Err(AnalyticsError::InvalidRange(
                            "custom timeframe requires both a start and an end date".into(),
                        ))
                    }
                };
                if start > end {
                    return Err(AnalyticsError::InvalidRange(format!(
                        "custom start {start} is after custom end {end}"
                    )));
                }
                adjacent(start, offset_days(end, 1)?)?
            }
        };

        debug!(%timeframe, %current, %previous, "resolved reporting period");
        Ok(ResolvedPeriod {
            timeframe,
            current,
            previous,
            granularity: timeframe.granularity(),
        })
    }
}

/// `[start, end)` plus the equal-length range immediately before it.
fn adjacent(start: NaiveDate, end: NaiveDate) -> Result<(DateRange, DateRange)> {
    let current = DateRange::new(midnight(start), midnight(end))?;
    let previous = current.preceding()?;
    Ok((current, previous))
}

/// `months`-long calendar range starting at `start` plus the prior one of the same unit.
fn calendar(start: NaiveDate, months: i32) -> Result<(DateRange, DateRange)> {
    let current = DateRange::new(midnight(start), midnight(shift_months(start, months)?))?;
    let previous = DateRange::new(midnight(shift_months(start, -months)?), midnight(start))?;
    Ok((current, previous))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

/// Moves a first-of-month date by whole months.
fn shift_months(first: NaiveDate, months: i32) -> Result<NaiveDate> {
    let index = first.year() * 12 + first.month0() as i32 + months;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
        .ok_or_else(|| out_of_range(first))
}

fn offset_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| out_of_range(date))
}

fn out_of_range(date: NaiveDate) -> AnalyticsError {
    AnalyticsError::InvalidRange(format!("date {date} is outside the supported calendar"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(midnight(start), midnight(end)).unwrap()
    }

    fn now(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 15, 0).unwrap()
    }

    fn resolve(timeframe: Timeframe, at: DateTime<Utc>) -> ResolvedPeriod {
        PeriodResolver::default()
            .resolve(timeframe, at, None, None)
            .expect("resolves")
    }

    #[test]
    fn day_compares_with_yesterday() {
        let period = resolve(Timeframe::Day, now(2024, 3, 1, 9));
        assert_eq!(period.current, range(date(2024, 3, 1), date(2024, 3, 2)));
        assert_eq!(period.previous, range(date(2024, 2, 29), date(2024, 3, 1)));
        assert_eq!(period.granularity, BucketGranularity::Hourly);
    }

    #[test]
    fn week_starts_on_monday_across_year_boundary() {
        // 2025-01-01 is a Wednesday.
        let period = resolve(Timeframe::Week, now(2025, 1, 1, 12));
        assert_eq!(period.current, range(date(2024, 12, 30), date(2025, 1, 6)));
        assert_eq!(period.previous, range(date(2024, 12, 23), date(2024, 12, 30)));

        let sunday = resolve(Timeframe::Week, now(2025, 1, 5, 23));
        assert_eq!(sunday.current, period.current);
    }

    #[test]
    fn month_compares_with_prior_calendar_month() {
        let period = resolve(Timeframe::Month, now(2024, 3, 31, 23));
        assert_eq!(period.current, range(date(2024, 3, 1), date(2024, 4, 1)));
        assert_eq!(period.previous, range(date(2024, 2, 1), date(2024, 3, 1)));
        assert_eq!(period.previous.duration().num_days(), 29);

        let january = resolve(Timeframe::Month, now(2024, 1, 10, 0));
        assert_eq!(january.previous, range(date(2023, 12, 1), date(2024, 1, 1)));
    }

    #[test]
    fn quarter_and_year_align_to_calendar() {
        let q2 = resolve(Timeframe::Quarter, now(2024, 5, 15, 8));
        assert_eq!(q2.current, range(date(2024, 4, 1), date(2024, 7, 1)));
        assert_eq!(q2.previous, range(date(2024, 1, 1), date(2024, 4, 1)));

        let q1 = resolve(Timeframe::Quarter, now(2024, 2, 1, 8));
        assert_eq!(q1.previous, range(date(2023, 10, 1), date(2024, 1, 1)));

        let q4 = resolve(Timeframe::Quarter, now(2024, 12, 31, 8));
        assert_eq!(q4.current, range(date(2024, 10, 1), date(2025, 1, 1)));

        let year = resolve(Timeframe::Year, now(2024, 6, 30, 8));
        assert_eq!(year.current, range(date(2024, 1, 1), date(2025, 1, 1)));
        assert_eq!(year.previous, range(date(2023, 1, 1), date(2024, 1, 1)));
    }

    #[test]
    fn custom_range_includes_whole_end_day() {
        let period = PeriodResolver::default()
            .resolve(
                Timeframe::Custom,
                now(2024, 6, 30, 8),
                Some(date(2024, 6, 10)),
                Some(date(2024, 6, 12)),
            )
            .unwrap();
        assert_eq!(period.current, range(date(2024, 6, 10), date(2024, 6, 13)));
        assert_eq!(period.previous, range(date(2024, 6, 7), date(2024, 6, 10)));
        assert_eq!(period.granularity, BucketGranularity::Daily);

        let single = PeriodResolver::default()
            .resolve(
                Timeframe::Custom,
                now(2024, 6, 30, 8),
                Some(date(2024, 6, 10)),
                Some(date(2024, 6, 10)),
            )
            .unwrap();
        assert_eq!(single.current.duration(), Duration::days(1));
    }

    #[test]
    fn custom_range_rejects_missing_or_inverted_bounds() {
        let resolver = PeriodResolver::default();
        let at = now(2024, 6, 30, 8);
        let inverted = resolver
            .resolve(Timeframe::Custom, at, Some(date(2024, 6, 12)), Some(date(2024, 6, 10)))
            .expect_err("inverted bounds");
        assert!(inverted.is_invalid_range());

        for (start, end) in [(Some(date(2024, 6, 1)), None), (None, Some(date(2024, 6, 1))), (None, None)] {
            let err = resolver
                .resolve(Timeframe::Custom, at, start, end)
                .expect_err("missing bound");
            assert!(err.is_invalid_range(), "{err}");
        }
    }

    #[test]
    fn local_zone_decides_the_calendar_day() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let resolver = PeriodResolver::new(ist);
        // 20:00 UTC on March 31 is already April 1 in IST.
        let period = resolver
            .resolve(Timeframe::Month, now(2024, 3, 31, 20), None, None)
            .unwrap();
        assert_eq!(period.current, range(date(2024, 4, 1), date(2024, 5, 1)));
    }

    #[test]
    fn custom_bounds_are_ignored_for_calendar_timeframes() {
        let period = PeriodResolver::default()
            .resolve(
                Timeframe::Year,
                now(2024, 6, 30, 8),
                Some(date(2024, 6, 12)),
                Some(date(2024, 6, 10)),
            )
            .expect("bounds ignored");
        assert_eq!(period.current, range(date(2024, 1, 1), date(2025, 1, 1)));
    }
}
