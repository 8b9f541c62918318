//! Cursor-based pagination utilities for admin listings.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Error type for cursor operations.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("Invalid cursor format")]
    InvalidFormat,
    #[error("Invalid cursor encoding")]
    InvalidEncoding,
    #[error("Invalid timestamp in cursor")]
    InvalidTimestamp,
    #[error("Invalid ID in cursor")]
    InvalidId,
}

/// Encodes a cursor from a row's creation timestamp and id.
///
/// The cursor format is: base64(RFC3339_timestamp:uuid). The composite
/// cursor keeps ordering stable for rows created at identical timestamps.
pub fn encode_cursor(created_at: DateTime<Utc>, id: Uuid) -> String {
    let raw = format!(
        "{}:{}",
        created_at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        id
    );
    URL_SAFE_NO_PAD.encode(raw.as_bytes())
}

/// Decodes a cursor into timestamp and id.
pub fn decode_cursor(cursor: &str) -> Result<(DateTime<Utc>, Uuid), CursorError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(cursor)
        .map_err(|_| CursorError::InvalidEncoding)?;

    let s = String::from_utf8(decoded).map_err(|_| CursorError::InvalidFormat)?;

    // Split on last colon (the timestamp itself contains colons)
    let colon_pos = s.rfind(':').ok_or(CursorError::InvalidFormat)?;

    let timestamp_str = &s[..colon_pos];
    let id_str = &s[colon_pos + 1..];

    let id = Uuid::parse_str(id_str).map_err(|_| CursorError::InvalidId)?;

    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .map_err(|_| CursorError::InvalidTimestamp)?
        .with_timezone(&Utc);

    Ok((timestamp, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_roundtrip() {
        let ts = Utc::now();
        let id = Uuid::new_v4();

        let cursor = encode_cursor(ts, id);
        let (decoded_ts, decoded_id) = decode_cursor(&cursor).expect("Failed to decode");

        assert_eq!(decoded_id, id);
        // Microsecond precision survives the roundtrip
        assert_eq!(decoded_ts.timestamp_micros(), ts.timestamp_micros());
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(matches!(
            decode_cursor("!!not-base64!!"),
            Err(CursorError::InvalidEncoding)
        ));
    }

    #[test]
    fn test_decode_missing_separator() {
        let cursor = URL_SAFE_NO_PAD.encode(b"no-separator-here");
        // The payload has no colon at all, but even a colon-bearing string
        // must carry a parseable uuid after the last colon.
        assert!(decode_cursor(&cursor).is_err());
    }

    #[test]
    fn test_decode_invalid_uuid() {
        let cursor = URL_SAFE_NO_PAD.encode(b"2026-01-01T00:00:00Z:not-a-uuid");
        assert!(matches!(decode_cursor(&cursor), Err(CursorError::InvalidId)));
    }

    #[test]
    fn test_decode_invalid_timestamp() {
        let id = Uuid::new_v4();
        let cursor = URL_SAFE_NO_PAD.encode(format!("yesterday:{}", id).as_bytes());
        assert!(matches!(
            decode_cursor(&cursor),
            Err(CursorError::InvalidTimestamp)
        ));
    }
}
