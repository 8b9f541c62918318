//! Common validation utilities.

use chrono::{DateTime, Utc};
use validator::ValidationError;

/// Maximum slug length after normalization.
pub const MAX_SLUG_LENGTH: usize = 80;

/// Validates that a slug contains only lowercase letters, digits and hyphens,
/// does not start or end with a hyphen, and fits the length limit.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if well_formed {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug_format");
        err.message =
            Some("Slug must contain only lowercase letters, digits and hyphens".into());
        Err(err)
    }
}

/// Validates a CSS hex color like `#fff` or `#d4af37`.
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let valid = color
        .strip_prefix('#')
        .map(|hex| {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        })
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("hex_color");
        err.message = Some("Color must be a hex value like #d4af37".into());
        Err(err)
    }
}

/// Validates that an event date is not in the past (with a one-day grace
/// period so same-day edits do not start failing at midnight).
pub fn validate_event_date(date: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *date >= Utc::now() - chrono::Duration::days(1) {
        Ok(())
    } else {
        let mut err = ValidationError::new("event_date_past");
        err.message = Some("Event date cannot be in the past".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_slug_accepts_well_formed() {
        assert!(validate_slug("asal-jahon").is_ok());
        assert!(validate_slug("a").is_ok());
        assert!(validate_slug("nigora-va-botir-2026").is_ok());
    }

    #[test]
    fn test_validate_slug_rejects_malformed() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
        assert!(validate_slug("Upper-Case").is_err());
        assert!(validate_slug("under_score").is_err());
        assert!(validate_slug("spa ce").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_hex_color() {
        assert!(validate_hex_color("#fff").is_ok());
        assert!(validate_hex_color("#d4af37").is_ok());
        assert!(validate_hex_color("#D4AF37").is_ok());

        assert!(validate_hex_color("d4af37").is_err());
        assert!(validate_hex_color("#d4af3").is_err());
        assert!(validate_hex_color("#gggggg").is_err());
        assert!(validate_hex_color("gold").is_err());
    }

    #[test]
    fn test_validate_event_date() {
        assert!(validate_event_date(&(Utc::now() + Duration::days(30))).is_ok());
        assert!(validate_event_date(&Utc::now()).is_ok());
        assert!(validate_event_date(&(Utc::now() - Duration::days(2))).is_err());
    }
}
