//! Raw input checks that run before anything reaches the task service.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};
use crate::model::{Priority, DATETIME_FORMAT};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn is_valid_title(title: &str) -> bool {
    !title.trim().is_empty()
}

/// Trimmed title, or `InvalidArgument` when blank
pub fn require_title(title: &str) -> Result<String> {
    if !is_valid_title(title) {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }
    Ok(title.trim().to_string())
}

pub fn parse_priority(raw: &str) -> Result<Priority> {
    raw.parse()
}

/// Parse `yyyy-MM-dd HH:mm`, or a bare `yyyy-MM-dd` meaning midnight
pub fn parse_due(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    if let Ok(value) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        return Ok(value);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "invalid date '{trimmed}' (expected yyyy-MM-dd or yyyy-MM-dd HH:mm)"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles() {
        assert!(is_valid_title("Buy milk"));
        assert!(!is_valid_title("   "));
        assert_eq!(require_title("  Buy milk ").unwrap(), "Buy milk");
        assert!(matches!(require_title(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn due_accepts_both_layouts() {
        let full = parse_due("2025-06-01 14:45").unwrap();
        assert_eq!(full.to_string(), "2025-06-01 14:45:00");

        let date_only = parse_due(" 2025-06-01 ").unwrap();
        assert_eq!(date_only.to_string(), "2025-06-01 00:00:00");
    }

    #[test]
    fn due_rejects_garbage() {
        for raw in ["", "tomorrow", "2025-13-01", "01/06/2025", "2025-06-01T14:45"] {
            assert!(
                matches!(parse_due(raw), Err(Error::InvalidArgument(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn priority_delegates_to_from_str() {
        assert_eq!(parse_priority("low").unwrap(), Priority::Low);
        assert!(parse_priority("").is_err());
    }
}
