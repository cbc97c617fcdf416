use std::fmt;

use serde::{Deserialize, Serialize};

/// Server timestamps carry no zone; they are shown as-is.
pub type Timestamp = chrono::NaiveDateTime;

/// Server-assigned project identifier.
///
/// Never generated on the client. The remote API sometimes encodes ids as
/// JSON numbers, so the gateway normalizes them to their string form
/// before constructing one of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Parse a user- or server-supplied decimal amount.
///
/// Returns `None` for empty, whitespace-only, non-numeric, or non-finite
/// input.
///
/// # Examples
///
/// ```
/// use catalog_core::types::parse_amount;
///
/// assert_eq!(parse_amount(" 499.50 "), Some(499.5));
/// assert_eq!(parse_amount(""), None);
/// assert_eq!(parse_amount("free"), None);
/// ```
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render an amount the way the remote API expects it in form fields.
///
/// Whole numbers carry no fractional part (`499`, not `499.0`).
pub fn format_amount(amount: f64) -> String {
    format!("{amount}")
}

/// Parse a server timestamp, accepting MySQL-style `YYYY-MM-DD HH:MM:SS`
/// and RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let trimmed = raw.trim();
    chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_rejects_non_finite() {
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn format_amount_drops_trailing_zero_fraction() {
        assert_eq!(format_amount(499.0), "499");
        assert_eq!(format_amount(12.75), "12.75");
    }

    #[test]
    fn parse_timestamp_mysql_format() {
        let ts = parse_timestamp("2024-03-09 14:05:00").expect("should parse");
        assert_eq!(ts.to_string(), "2024-03-09 14:05:00");
    }

    #[test]
    fn parse_timestamp_rfc3339() {
        let ts = parse_timestamp("2024-03-09T14:05:00Z").expect("should parse");
        assert_eq!(ts.to_string(), "2024-03-09 14:05:00");
    }

    #[test]
    fn parse_timestamp_garbage_is_none() {
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn project_id_display_matches_inner() {
        assert_eq!(ProjectId::new("42").to_string(), "42");
    }
}
