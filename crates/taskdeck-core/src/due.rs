//! Turning date/time form inputs into due timestamps and back.

use time::format_description::BorrowedFormatItem;
use time::macros::{format_description, time};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");
const TIME_WITH_SECONDS_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

/// Time of day used when only a date is supplied.
pub const DEFAULT_DUE_TIME: Time = time!(23:59);

/// Combine a `YYYY-MM-DD` date and an `HH:MM` time into a due timestamp.
///
/// Both inputs blank means "no due date". A blank date falls back to today in
/// `offset`, a blank time to 23:59. The wall time is read in `offset` and the
/// result is normalized to UTC. Unparseable input yields `None` instead of an
/// error.
#[must_use]
pub fn build_due(
    date_input: &str,
    time_input: &str,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> Option<OffsetDateTime> {
    let date_input = date_input.trim();
    let time_input = time_input.trim();
    if date_input.is_empty() && time_input.is_empty() {
        return None;
    }

    let day = if date_input.is_empty() {
        now.to_offset(offset).date()
    } else {
        Date::parse(date_input, DATE_FORMAT).ok()?
    };
    let clock = if time_input.is_empty() {
        DEFAULT_DUE_TIME
    } else {
        parse_clock(time_input)?
    };

    Some(
        PrimitiveDateTime::new(day, clock)
            .assume_offset(offset)
            .to_offset(UtcOffset::UTC),
    )
}

fn parse_clock(raw: &str) -> Option<Time> {
    Time::parse(raw, TIME_FORMAT)
        .or_else(|_| Time::parse(raw, TIME_WITH_SECONDS_FORMAT))
        .ok()
}

/// Split a due timestamp into the `(date, time)` pair an edit form is prefilled with.
///
/// Tasks without a due date produce two empty strings.
#[must_use]
pub fn split_due(due: Option<OffsetDateTime>, offset: UtcOffset) -> (String, String) {
    let Some(due) = due else {
        return (String::new(), String::new());
    };
    let local = due.to_offset(offset);
    let date = local.date().format(DATE_FORMAT).unwrap_or_default();
    let clock = local.time().format(TIME_FORMAT).unwrap_or_default();
    (date, clock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    const NOW: OffsetDateTime = datetime!(2025-03-10 15:30 UTC);

    #[test]
    fn both_blank_means_no_due_date() {
        assert_eq!(build_due("", "", NOW, UtcOffset::UTC), None);
        assert_eq!(build_due("  ", " ", NOW, UtcOffset::UTC), None);
    }

    #[test]
    fn combines_date_and_time() {
        assert_eq!(
            build_due("2025-01-01", "09:00", NOW, UtcOffset::UTC),
            Some(datetime!(2025-01-01 09:00 UTC))
        );
        assert_eq!(
            build_due("2025-01-01", "09:00:30", NOW, UtcOffset::UTC),
            Some(datetime!(2025-01-01 09:00:30 UTC))
        );
    }

    #[test]
    fn date_only_defaults_to_end_of_day() {
        assert_eq!(
            build_due("2025-01-01", "", NOW, UtcOffset::UTC),
            Some(datetime!(2025-01-01 23:59 UTC))
        );
    }

    #[test]
    fn time_only_defaults_to_today_in_offset() {
        assert_eq!(
            build_due("", "08:00", NOW, UtcOffset::UTC),
            Some(datetime!(2025-03-10 08:00 UTC))
        );
        // 15:30 UTC is already the 11th in +09:00.
        assert_eq!(
            build_due("", "08:00", NOW, offset!(+9)),
            Some(datetime!(2025-03-11 08:00 +9))
        );
    }

    #[test]
    fn wall_time_is_read_in_offset_and_normalized() {
        let due = build_due("2025-01-01", "09:00", NOW, offset!(+9))
            .unwrap_or_else(|| panic!("due must parse"));
        assert_eq!(due, datetime!(2025-01-01 00:00 UTC));
        assert!(due.offset().is_utc());
    }

    #[test]
    fn garbage_degrades_to_no_due_date() {
        assert_eq!(build_due("tomorrow", "09:00", NOW, UtcOffset::UTC), None);
        assert_eq!(build_due("2025-02-30", "", NOW, UtcOffset::UTC), None);
        assert_eq!(build_due("2025-01-01", "25:00", NOW, UtcOffset::UTC), None);
        assert_eq!(build_due("", "noon", NOW, UtcOffset::UTC), None);
    }

    #[test]
    fn split_due_prefills_edit_form() {
        let due = Some(datetime!(2025-01-01 00:00 UTC));
        assert_eq!(
            split_due(due, offset!(+9)),
            ("2025-01-01".to_owned(), "09:00".to_owned())
        );
        assert_eq!(split_due(None, UtcOffset::UTC), (String::new(), String::new()));
    }
}
