use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Half-open `[start, end)` bounds of the UTC calendar day containing `at`.
pub fn utc_day_bounds(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = at.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_bounds_truncate_to_midnight() {
        let at = Utc.with_ymd_and_hms(2030, 6, 1, 19, 0, 0).unwrap();
        let (start, end) = utc_day_bounds(at);
        assert_eq!(start, Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2030, 6, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_day_bounds_at_midnight_is_own_day() {
        let at = Utc.with_ymd_and_hms(2030, 6, 2, 0, 0, 0).unwrap();
        let (start, _) = utc_day_bounds(at);
        assert_eq!(start, at);
    }
}
