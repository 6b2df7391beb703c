//! Core data models for the analytics tools

use crate::normalize::parse_number;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

//
// ================= Field names =================
//

/// Record field names read by the tools
pub mod fields {
    pub const MONTH: &str = "month";
    pub const PILLAR: &str = "pillar";
    pub const PRODUCT_TYPE: &str = "product_type";
    pub const BRAND_ID: &str = "brand_id";
    pub const MERCHANT_NAME: &str = "merchant_name";
    pub const TPV: &str = "tpv";
    pub const TPT: &str = "tpt";
    pub const CHURN_PREDICTION: &str = "Churn_Prediction";
    pub const CHURN_STATUS: &str = "Churn_Status";
    pub const TRANSACTION_TYPE: &str = "Transaction_Type";
}

//
// ================= Record =================
//

/// One merchant-transaction-period observation, kept as the raw JSON object.
///
/// Field types drift between dataset variants (`"1,234"` vs `1234`), so values
/// are only interpreted through [`Record::text`] and [`Record::number`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Text view of a field. Numbers and booleans are rendered; null, blank
    /// strings, arrays and objects count as absent.
    pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.0.get(field)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(Cow::Borrowed(trimmed))
            }
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    /// Numeric view of a field; malformed or missing values read as zero
    pub fn number(&self, field: &str) -> f64 {
        parse_number(self.0.get(field))
    }
}

//
// ================= Tool I/O =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub tool_name: String,
    pub parameters: serde_json::Value,
}

impl ToolInput {
    pub fn new(tool_name: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            parameters,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub data: serde_json::Value,
    pub error: Option<String>,
}

impl ToolOutput {
    /// Wrap a response envelope
    pub fn ok<T: Serialize>(data: &T) -> crate::Result<Self> {
        Ok(Self {
            success: true,
            data: serde_json::to_value(data)?,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_renders_numbers_and_skips_blanks() {
        let r = record(json!({
            "brand_id": 1042,
            "pillar": "   ",
            "merchant_name": "  Kopi Kenangan ",
            "tags": ["a"],
            "month": null
        }));

        assert_eq!(r.text("brand_id").as_deref(), Some("1042"));
        assert_eq!(r.text("merchant_name").as_deref(), Some("Kopi Kenangan"));
        assert!(r.text("pillar").is_none());
        assert!(r.text("tags").is_none());
        assert!(r.text("month").is_none());
        assert!(r.text("missing").is_none());
    }

    #[test]
    fn test_number_reads_both_representations() {
        let r = record(json!({"tpv": "12,500", "tpt": 7, "bad": "n/a"}));

        assert_eq!(r.number("tpv"), 12500.0);
        assert_eq!(r.number("tpt"), 7.0);
        assert_eq!(r.number("bad"), 0.0);
        assert_eq!(r.number("missing"), 0.0);
    }
}
