use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Stock expiring within this many days of today counts as nearly expired.
pub const NEARLY_EXPIRED_DAYS: i64 = 30;

/// Parses either a calendar date (`2024-03-01`, read as midnight UTC) or a
/// full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
}

pub fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&at.date_naive().and_time(NaiveTime::MIN))
}

/// Cutoffs for the expiry reports, anchored at the start of the current day.
///
/// Expired stock has `expiry_date <= today`; nearly-expired stock has
/// `today < expiry_date <= horizon`. The two sets never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryWindow {
    pub today: DateTime<Utc>,
    pub horizon: DateTime<Utc>,
}

impl ExpiryWindow {
    pub fn starting(now: DateTime<Utc>) -> Self {
        let today = start_of_day(now);
        Self {
            today,
            horizon: today + Duration::days(NEARLY_EXPIRED_DAYS),
        }
    }

    pub fn is_expired(&self, expiry: DateTime<Utc>) -> bool {
        expiry <= self.today
    }

    pub fn is_nearly_expired(&self, expiry: DateTime<Utc>) -> bool {
        expiry > self.today && expiry <= self.horizon
    }
}

// ── Serde helpers ─────────────────────────────────────────────────────────────

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("`{}` is not a valid date", raw)))
}

pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("`{}` is not a valid date", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> DateTime<Utc> {
        parse_date(raw).unwrap()
    }

    #[test]
    fn parses_calendar_dates_and_timestamps() {
        assert_eq!(at("2024-03-01"), at("2024-03-01T00:00:00Z"));
        assert_eq!(at("2024-03-01T02:00:00+02:00"), at("2024-03-01"));
        assert!(parse_date("next tuesday").is_none());
        assert!(parse_date("2024-02-30").is_none());
    }

    #[test]
    fn start_of_day_truncates_time() {
        assert_eq!(start_of_day(at("2024-03-01T17:45:10Z")), at("2024-03-01"));
    }

    #[test]
    fn today_is_expired_not_nearly_expired() {
        let window = ExpiryWindow::starting(at("2024-03-01T09:30:00Z"));
        let today = at("2024-03-01");

        assert!(window.is_expired(today - Duration::days(1)));
        assert!(window.is_expired(today));
        assert!(!window.is_nearly_expired(today));
        assert!(!window.is_expired(today + Duration::days(1)));
        assert!(window.is_nearly_expired(today + Duration::days(1)));
    }

    #[test]
    fn horizon_is_inclusive() {
        let window = ExpiryWindow::starting(at("2024-03-01T23:59:59Z"));
        assert_eq!(window.horizon, at("2024-03-31"));
        assert!(window.is_nearly_expired(at("2024-03-31")));
        assert!(!window.is_nearly_expired(at("2024-03-31T00:00:01Z")));
        assert!(!window.is_nearly_expired(at("2024-04-01")));
    }
}
