use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Default timezone for ledger dates.
/// This is the canonical timezone used to bucket instants into calendar days.
/// Deployments pass the user's zone explicitly; this default stands in for the
/// device zone of a single-user install.
pub const DEFAULT_LEDGER_TZ: Tz = chrono_tz::Asia::Kolkata;

/// A calendar month reference (year + month), the navigation unit of the
/// ledger views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month reference. `month` is 1-based.
    ///
    /// # Panics
    /// Panics if `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Self {
        assert!((1..=12).contains(&month), "month must be 1-12, got {month}");
        Self { year, month }
    }

    /// The month that `date` falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // month is kept in 1..=12, so day 1 always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.plus_months(1)
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn plus_months(&self, months: u32) -> Self {
        Self::from_index(self.index() + months as i32)
    }

    pub fn minus_months(&self, months: u32) -> Self {
        Self::from_index(self.index() - months as i32)
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: YearMonth) -> i32 {
        other.index() - self.index()
    }

    fn index(&self) -> i32 {
        self.year * 12 + self.month as i32 - 1
    }

    fn from_index(index: i32) -> Self {
        Self {
            year: index.div_euclid(12),
            month: (index.rem_euclid(12) + 1) as u32,
        }
    }
}

/// Epoch milliseconds of local midnight of `day` in `tz`.
///
/// This is the timestamp stored on every expense: whatever time-of-day was
/// originally entered, the record carries its calendar day's midnight.
pub fn day_start_millis(day: NaiveDate, tz: Tz) -> i64 {
    zoned_millis(day, NaiveTime::MIN, tz)
}

/// Epoch milliseconds of the last millisecond of `day` in `tz`.
pub fn day_end_millis(day: NaiveDate, tz: Tz) -> i64 {
    match day.succ_opt() {
        Some(next) => day_start_millis(next, tz) - 1,
        None => i64::MAX,
    }
}

/// Truncates an instant to the local midnight of its calendar day in `tz`.
pub fn truncate_to_day_millis(instant: DateTime<Utc>, tz: Tz) -> i64 {
    day_start_millis(instant.with_timezone(&tz).date_naive(), tz)
}

/// Calendar day (in `tz`) that a stored timestamp belongs to.
///
/// Returns `None` only for timestamps outside chrono's representable range.
pub fn day_of_millis(millis: i64, tz: Tz) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.with_timezone(&tz).date_naive())
}

fn zoned_millis(day: NaiveDate, time: NaiveTime, tz: Tz) -> i64 {
    let naive = day.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        // DST fold: take the earlier of the two wall-clock instants
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        // DST gap: the wall-clock time does not exist, shift forward an hour
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive).timestamp_millis()),
    }
}
