//! CF-convention time axis decoding.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Seconds represented by one step of a CF time unit, or `None` for units we
/// do not support (month/year offsets are not well defined at day
/// granularity).
fn unit_seconds(unit: &str) -> Option<i64> {
    match unit {
        "days" | "day" | "d" => Some(86_400),
        "hours" | "hour" | "hrs" | "hr" | "h" => Some(3_600),
        "minutes" | "minute" | "min" => Some(60),
        "seconds" | "second" | "secs" | "sec" | "s" => Some(1),
        _ => None,
    }
}

/// Parses a CF `"<unit> since <base>"` units string into the base instant
/// and the length of one offset step in seconds.
///
/// The base accepts `YYYY-MM-DD` with an optional `HH:MM:SS` suffix; a
/// missing time of day means midnight.
pub(crate) fn parse_units(units: &str) -> Result<(NaiveDateTime, i64), String> {
    let parts: Vec<&str> = units.splitn(3, ' ').collect();
    if parts.len() < 3 || parts[1] != "since" {
        return Err(format!("unexpected time units format: '{units}'"));
    }

    let step = unit_seconds(parts[0])
        .ok_or_else(|| format!("unsupported time unit '{}' in '{units}'", parts[0]))?;

    let rest = parts[2].trim();
    let date_str = if rest.len() >= 10 { &rest[..10] } else { rest };
    let base_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| format!("failed to parse base date '{date_str}': {e}"))?;

    let time = rest
        .get(10..)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveTime::parse_from_str(s, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                .map_err(|e| format!("failed to parse base time '{s}': {e}"))
        })
        .transpose()?
        .unwrap_or_default();

    Ok((base_date.and_time(time), step))
}

/// Converts floating-point offsets from a CF units string into calendar
/// dates at day granularity.
pub(crate) fn decode_time_axis(units: &str, offsets: &[f64]) -> Result<Vec<NaiveDate>, String> {
    let (base, step) = parse_units(units)?;

    offsets
        .iter()
        .map(|&offset| {
            let seconds = (offset * step as f64).round() as i64;
            base.checked_add_signed(TimeDelta::seconds(seconds))
                .map(|dt| dt.date())
                .ok_or_else(|| format!("date overflow adding {offset} steps to {base}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn days_since_midnight_base() {
        let dates = decode_time_axis("days since 1961-01-01", &[0.0, 1.0, 364.0]).unwrap();
        assert_eq!(dates, vec![date(1961, 1, 1), date(1961, 1, 2), date(1961, 12, 31)]);
    }

    #[test]
    fn days_since_with_time_of_day() {
        let dates = decode_time_axis("days since 1949-12-01 00:00:00", &[4018.0]).unwrap();
        assert_eq!(dates, vec![date(1960, 12, 1)]);
    }

    #[test]
    fn hours_since_collapse_to_days() {
        let dates = decode_time_axis("hours since 2000-01-01 12:00:00", &[0.0, 11.0, 12.0]).unwrap();
        assert_eq!(dates, vec![date(2000, 1, 1), date(2000, 1, 1), date(2000, 1, 2)]);
    }

    #[test]
    fn fractional_day_offsets_round() {
        let dates = decode_time_axis("days since 2000-01-01", &[0.5]).unwrap();
        // 0.5 days from midnight lands at noon of the same day.
        assert_eq!(dates, vec![date(2000, 1, 1)]);
    }

    #[test]
    fn rejects_units_without_since() {
        assert!(decode_time_axis("days after 2000-01-01", &[0.0]).is_err());
    }

    #[test]
    fn rejects_month_offsets() {
        assert!(decode_time_axis("months since 2000-01-01", &[0.0]).is_err());
    }
}
