//! Match-expiry policy: when a stale match assignment must be revoked.
//!
//! A match expires one full day after its scheduled date. Dates arrive as
//! operator-entered text in several formats; anything unparseable fails
//! open (not expired) so an ambiguous date never silently revokes an
//! assignment.

use chrono::NaiveDate;
use tracing::warn;

/// Accepted match date formats. chrono tolerates missing zero padding on
/// day and month as long as the separators are present.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Parse an operator-entered match date
pub fn parse_match_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// True when `today` is past the day after the scheduled date
pub fn is_expired(date_text: &str, today: NaiveDate) -> bool {
    match parse_match_date(date_text) {
        Some(match_date) => today > match_date + chrono::Duration::days(1),
        None => {
            warn!(date = date_text, "unparseable match date, treating as not expired");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expires_one_day_after_match_date() {
        assert!(is_expired("2025-01-10", day(2025, 1, 12)));
        assert!(!is_expired("2025-01-10", day(2025, 1, 11)));
        assert!(!is_expired("2025-01-10", day(2025, 1, 10)));
    }

    #[test]
    fn test_accepted_formats() {
        assert_eq!(parse_match_date("2025-01-10"), Some(day(2025, 1, 10)));
        assert_eq!(parse_match_date("10/01/2025"), Some(day(2025, 1, 10)));
        assert_eq!(parse_match_date("2025/01/10"), Some(day(2025, 1, 10)));
        // zero padding is optional
        assert_eq!(parse_match_date("2025-1-5"), Some(day(2025, 1, 5)));
        assert_eq!(parse_match_date("5/1/2025"), Some(day(2025, 1, 5)));
        assert_eq!(parse_match_date(" 2025-01-10 "), Some(day(2025, 1, 10)));
    }

    #[test]
    fn test_unparseable_date_fails_open() {
        assert!(!is_expired("sometime soon", day(2030, 1, 1)));
        assert!(!is_expired("", day(2030, 1, 1)));
        assert!(!is_expired("32/13/2025", day(2030, 1, 1)));
    }
}
