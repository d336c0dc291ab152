//! Calendar-day helpers for clinical timestamps.
//!
//! Day boundaries are always computed in an explicit [`UtcOffset`], the
//! system's configured time zone, never in the offset the timestamp happens
//! to carry.

use crate::error::{CoreError, CoreResult};
use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, time};
use time::{OffsetDateTime, Time, UtcOffset};

/// Last representable millisecond of a calendar day.
pub const LAST_MOMENT_OF_DAY: Time = time!(23:59:59.999);

const OFFSET_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

/// Returns the last millisecond of the calendar day containing `datetime`,
/// evaluated in `offset`.
pub fn last_moment_of_day(datetime: OffsetDateTime, offset: UtcOffset) -> OffsetDateTime {
    datetime.to_offset(offset).replace_time(LAST_MOMENT_OF_DAY)
}

/// Returns midnight at the start of the calendar day containing `datetime`,
/// evaluated in `offset`.
pub fn start_of_day(datetime: OffsetDateTime, offset: UtcOffset) -> OffsetDateTime {
    datetime.to_offset(offset).replace_time(Time::MIDNIGHT)
}

/// Parse a UTC offset written as `+HH:MM` / `-HH:MM`. `Z` and `UTC` are
/// accepted as aliases for `+00:00`.
pub fn parse_utc_offset(value: &str) -> CoreResult<UtcOffset> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(trimmed, OFFSET_FORMAT)
        .map_err(|e| CoreError::invalid_time_zone(format!("'{trimmed}': {e}")))
}

pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}
