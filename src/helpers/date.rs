//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Canonical date format used for `date` and `updated`
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a YAML-style timestamp into a calendar date
///
/// Accepts a bare date, a naive datetime (read as UTC) or a datetime with an
/// offset, which is converted to UTC before the day is taken.
pub fn parse_timestamp(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, CANONICAL_DATE_FORMAT) {
        return Some(d);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    let offset_formats = [
        "%Y-%m-%d %H:%M:%S%.f %:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f %z",
    ];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }

    let naive_formats = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in naive_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    if let Some(stripped) = s.strip_suffix('Z') {
        if let Ok(dt) = NaiveDateTime::parse_from_str(stripped, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(dt.date());
        }
    }

    None
}

/// Normalize a date-like string to `YYYY-MM-DD`
///
/// # Examples
/// ```ignore
/// normalize_date("2024-01-15T10:30:00Z") // -> Some("2024-01-15")
/// normalize_date("next tuesday")         // -> None
/// ```
pub fn normalize_date(s: &str) -> Option<String> {
    parse_timestamp(s).map(|d| d.format(CANONICAL_DATE_FORMAT).to_string())
}

/// Format a canonical date for display (like "January 5, 2024")
///
/// Values that do not parse are returned unchanged.
pub fn full_date(s: &str) -> String {
    match parse_timestamp(s) {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_date_only() {
        assert_eq!(normalize_date("2024-01-15").as_deref(), Some("2024-01-15"));
        assert_eq!(normalize_date(" 2024-01-15 ").as_deref(), Some("2024-01-15"));
    }

    #[test]
    fn test_normalize_datetime() {
        assert_eq!(
            normalize_date("2024-01-15 10:30:00").as_deref(),
            Some("2024-01-15")
        );
        assert_eq!(
            normalize_date("2024-01-15T10:30:00Z").as_deref(),
            Some("2024-01-15")
        );
        assert_eq!(
            normalize_date("2024-01-15T10:30:00.250Z").as_deref(),
            Some("2024-01-15")
        );
    }

    #[test]
    fn test_normalize_offset_converts_to_utc() {
        assert_eq!(
            normalize_date("2024-01-15T23:30:00-05:00").as_deref(),
            Some("2024-01-16")
        );
        assert_eq!(
            normalize_date("2024-01-15T01:00:00+02:00").as_deref(),
            Some("2024-01-14")
        );
    }

    #[test]
    fn test_normalize_rejects_prose() {
        assert_eq!(normalize_date("sometime in spring"), None);
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("2024-13-45"), None);
    }

    #[test]
    fn test_full_date() {
        assert_eq!(full_date("2024-01-05"), "January 5, 2024");
        assert_eq!(full_date("not a date"), "not a date");
    }
}
