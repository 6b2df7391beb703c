//! Value normalization
//!
//! Every numeric field and month token passes through here before it reaches
//! the filter or the aggregator.

use crate::error::AnalyticsError;
use crate::store::RecordStore;
use crate::Result;
use chrono::NaiveDate;
use serde_json::Value;

/// Human-readable description of the accepted month token
pub const MONTH_FORMAT: &str = "Mon-YY (e.g. Oct-24)";

/// Month returned when the store holds no month at all
pub const FALLBACK_MONTH: &str = "Jun-25";

/// Coerce a dataset value into a number.
///
/// Accepts native numbers and text with `,` grouping separators or stray
/// whitespace. Null, blank, the literal `null`, unparseable and non-finite
/// input all read as `0.0`.
pub fn parse_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => parse_numeric_text(s),
        _ => 0.0,
    }
}

pub fn parse_numeric_text(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("null") {
        return 0.0;
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Calendar position of a `Mon-YY` token, `None` if the token is malformed
pub fn month_key(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    let bytes = token.as_bytes();

    if bytes.len() != 6 || bytes[3] != b'-' {
        return None;
    }
    if !bytes[..3].iter().all(|b| b.is_ascii_alphabetic())
        || !bytes[4..].iter().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    // chrono wants "01-Oct-24"
    let mut dated = String::with_capacity(9);
    dated.push_str("01-");
    dated.push(bytes[0].to_ascii_uppercase() as char);
    dated.push(bytes[1].to_ascii_lowercase() as char);
    dated.push(bytes[2].to_ascii_lowercase() as char);
    dated.push_str(&token[3..]);

    NaiveDate::parse_from_str(&dated, "%d-%b-%y").ok()
}

pub fn validate_month_format(month: &str) -> Result<()> {
    match month_key(month) {
        Some(_) => Ok(()),
        None => Err(AnalyticsError::InvalidArgument(format!(
            "month must be in {} format, got '{}'",
            MONTH_FORMAT, month
        ))),
    }
}

/// Validate a caller-supplied month, or pick the latest month in the store.
pub fn resolve_month(month: Option<&str>, store: &RecordStore) -> Result<String> {
    match month.map(str::trim).filter(|m| !m.is_empty()) {
        Some(month) => {
            validate_month_format(month)?;
            Ok(month.to_string())
        }
        None => Ok(store
            .latest_month()
            .unwrap_or_else(|| FALLBACK_MONTH.to_string())),
    }
}

/// Like [`resolve_month`] but the month must be supplied
pub fn require_month(name: &str, month: &str) -> Result<String> {
    let month = month.trim();
    if month.is_empty() {
        return Err(AnalyticsError::InvalidArgument(format!(
            "{} is required",
            name
        )));
    }
    validate_month_format(month)?;
    Ok(month.to_string())
}
