//! Forgetting-curve review scheduling
//!
//! Each time an item is reviewed, the next review is pushed further out
//! according to a fixed table of day intervals. Once the table runs out
//! the curve plateaus at its last entry.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, TimeZone};

/// Day intervals indexed by review count
pub const REVIEW_INTERVALS: [u32; 6] = [1, 2, 4, 7, 15, 30];

/// Number of days until the next review for an item reviewed `review_count` times
pub fn interval_days(review_count: u32) -> u32 {
    let last = REVIEW_INTERVALS.len() - 1;
    let index = usize::try_from(review_count).map_or(last, |i| i.min(last));
    REVIEW_INTERVALS[index]
}

/// Calculate the next review date for an item
///
/// Adds whole calendar days in `from`'s time zone, so the time of day is
/// preserved across daylight saving transitions.
pub fn next_review_date<Tz: TimeZone>(review_count: u32, from: &DateTime<Tz>) -> DateTime<Tz> {
    let days = interval_days(review_count);
    from.naive_local()
        .checked_add_days(Days::new(u64::from(days)))
        // An ambiguous local time (DST fall-back) resolves to its earlier instant
        .and_then(|naive| from.timezone().from_local_datetime(&naive).earliest())
        // Local time skipped by a DST gap: fall back to fixed 24h days
        .unwrap_or_else(|| from.clone() + Duration::days(i64::from(days)))
}

/// Half-open window `[start of today, start of tomorrow)` around `reference`,
/// evaluated in `reference`'s time zone
pub fn day_window<Tz: TimeZone>(reference: &DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    let tz = reference.timezone();
    let today = reference.date_naive();
    let tomorrow = today.succ_opt().unwrap_or(NaiveDate::MAX);
    (start_of_day(&tz, today), start_of_day(&tz, tomorrow))
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(start) = tz.from_local_datetime(&midnight).earliest() {
        return start;
    }

    // Midnight skipped by a DST transition; the day starts at the first valid hour
    (1..=3)
        .filter_map(|h| {
            tz.from_local_datetime(&(midnight + Duration::hours(h)))
                .earliest()
        })
        .next()
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// Format an interval in days to a short human-readable string
pub fn format_interval(days: i64) -> String {
    match days {
        d if d <= 0 => "today".to_string(),
        d if d < 7 => format!("{}d", d),
        d if d < 30 => format!("{}w", d / 7),
        d if d < 365 => format!("{}mo", d / 30),
        d => format!("{}y", d / 365),
    }
}

/// Label for the review an item is waiting for ("1st review", "2nd review", ...)
pub fn review_label(review_count: u32) -> String {
    let n = u64::from(review_count) + 1;
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{} review", n, suffix)
}
