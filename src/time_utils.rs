use chrono::{DateTime, NaiveDate, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Parse a dataset date key into epoch seconds at 00:00 UTC.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time part separated by
/// `T` or a space; the time part is ignored.
pub fn parse_date_key(key: &str) -> Option<i64> {
    let key = key.trim();
    let date_part = match key.find(['T', ' ']) {
        Some(idx) => &key[..idx],
        None => key,
    };
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

fn to_utc(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
}

/// Calendar date of an epoch-seconds timestamp, `YYYY-MM-DD` in UTC.
pub fn format_date(timestamp: i64) -> String {
    match to_utc(timestamp) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => timestamp.to_string(),
    }
}

/// Time-axis label. Daily (or coarser) bars show the day, intraday bars
/// add hours and minutes. Seconds are never shown.
pub fn format_time_label(timestamp: i64, bar_interval_secs: i64) -> String {
    let Some(dt) = to_utc(timestamp) else {
        return timestamp.to_string();
    };
    if bar_interval_secs >= SECONDS_PER_DAY || bar_interval_secs <= 0 {
        dt.format("%b %d").to_string()
    } else {
        dt.format("%b %d %H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates_at_utc_midnight() {
        assert_eq!(parse_date_key("1970-01-02"), Some(SECONDS_PER_DAY));
        assert_eq!(parse_date_key("2024-01-02"), Some(1_704_153_600));
    }

    #[test]
    fn ignores_time_suffix() {
        assert_eq!(parse_date_key("2024-01-02T15:30:00Z"), parse_date_key("2024-01-02"));
        assert_eq!(parse_date_key("2024-01-02 09:00"), parse_date_key("2024-01-02"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date_key(""), None);
        assert_eq!(parse_date_key("yesterday"), None);
        assert_eq!(parse_date_key("2024-13-01"), None);
    }

    #[test]
    fn labels_never_show_seconds() {
        let ts = 1_704_153_600 + 3_661;
        assert_eq!(format_time_label(ts, SECONDS_PER_DAY), "Jan 02");
        assert_eq!(format_time_label(ts, 60), "Jan 02 01:01");
        assert_eq!(format_date(ts), "2024-01-02");
    }
}
