//! Conversion of GMT time-of-day strings into a zone's local time.

use chrono::{NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constants::UNKNOWN_TIME;

const INPUT_FORMATS: [&str; 4] = ["%I:%M:%S %p", "%I:%M %p", "%H:%M:%S", "%H:%M"];

fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

/// Re-render a GMT time of day (e.g. `"7:06:43 AM"`) in the zone `iana_id`.
///
/// The conversion uses today's date for the offset, so daylight saving is
/// whatever applies today. Returns `"<unknown>"` when either input cannot
/// be understood.
pub fn convert_time_zone(gmt_time: &str, iana_id: &str) -> String {
    let Some(time) = parse_time_of_day(gmt_time) else {
        return UNKNOWN_TIME.to_string();
    };
    let Ok(zone) = iana_id.trim().parse::<Tz>() else {
        return UNKNOWN_TIME.to_string();
    };

    let local = Utc
        .from_utc_datetime(&Utc::now().date_naive().and_time(time))
        .with_timezone(&zone);
    local.format("%-I:%M:%S %p").to_string()
}
