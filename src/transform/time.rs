use crate::warehouse::TimeRow;
use chrono::{DateTime, Datelike, Timelike};

/// Decompose an epoch-millisecond timestamp into its UTC calendar fields.
///
/// Returns `None` when the timestamp is outside chrono's representable range.
pub fn time_row(start_time: i64) -> Option<TimeRow> {
    let dt = DateTime::from_timestamp_millis(start_time)?;
    Some(TimeRow {
        start_time,
        hour: dt.hour(),
        day: dt.day(),
        week_of_year: dt.iso_week().week(),
        month: dt.month(),
        year: dt.year(),
        weekday: dt.weekday().num_days_from_monday(),
    })
}
