//! Filter engine
//!
//! A conjunction of optional equality predicates applied in one linear scan.

use crate::models::{fields, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Optional dimension filters shared by most tools (everything except month)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub pillar: Option<String>,
    pub product_type: Option<String>,
    pub brand_id: Option<String>,
    pub merchant_name: Option<String>,
}

/// Equality constraints; `None` or blank means "match anything"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub month: Option<String>,
    pub pillar: Option<String>,
    pub product_type: Option<String>,
    pub brand_id: Option<String>,
    pub merchant_name: Option<String>,
}

impl FilterCriteria {
    pub fn new(month: impl Into<String>, dimensions: Dimensions) -> Self {
        Self {
            month: Some(month.into()),
            pillar: dimensions.pillar,
            product_type: dimensions.product_type,
            brand_id: dimensions.brand_id,
            merchant_name: dimensions.merchant_name,
        }
    }

    pub fn for_month(month: impl Into<String>) -> Self {
        Self::new(month, Dimensions::default())
    }

    /// Active (non-blank) constraints as `(field, expected)` pairs
    pub fn constraints(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (fields::MONTH, &self.month),
            (fields::PILLAR, &self.pillar),
            (fields::PRODUCT_TYPE, &self.product_type),
            (fields::BRAND_ID, &self.brand_id),
            (fields::MERCHANT_NAME, &self.merchant_name),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (field, v))
        })
    }

    /// A record matches when every active constraint equals its field.
    /// A constrained field missing from the record never matches.
    pub fn matches(&self, record: &Record) -> bool {
        self.constraints().all(|(field, expected)| {
            record
                .text(field)
                .is_some_and(|actual| eq_ignore_case(&actual, expected))
        })
    }

    /// The applied constraints, echoed back in response envelopes
    pub fn echo(&self) -> BTreeMap<String, String> {
        self.constraints()
            .map(|(field, value)| (field.to_string(), value.to_string()))
            .collect()
    }
}

/// Keep the records matching `criteria`, preserving input order.
pub fn filter<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect()
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || fold_case(a) == fold_case(b)
}

/// Comparison key under which [`eq_ignore_case`] values are equal
pub(crate) fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset() -> Vec<Record> {
        [
            json!({"month": "Oct-24", "pillar": "F&B", "product_type": "QRIS", "brand_id": "B1", "merchant_name": "Kopi Kita"}),
            json!({"month": "Oct-24", "pillar": "Retail", "product_type": "VA", "brand_id": "B2", "merchant_name": "Toko Maju"}),
            json!({"month": "Nov-24", "pillar": "F&B", "product_type": "QRIS", "brand_id": "B1", "merchant_name": "Kopi Kita"}),
            json!({"month": "Oct-24", "product_type": "QRIS", "brand_id": 7}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
    }

    #[test]
    fn test_empty_criteria_returns_everything_in_order() {
        let data = dataset();
        let result = filter(&data, &FilterCriteria::default());

        assert_eq!(result.len(), data.len());
        for (kept, original) in result.iter().zip(data.iter()) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn test_blank_criteria_are_wildcards() {
        let data = dataset();
        let criteria = FilterCriteria {
            pillar: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter(&data, &criteria).len(), data.len());
    }

    #[test]
    fn test_criteria_are_anded_and_case_insensitive() {
        let data = dataset();
        let criteria = FilterCriteria::new(
            "oct-24",
            Dimensions {
                product_type: Some("qris".to_string()),
                merchant_name: Some("KOPI KITA".to_string()),
                ..Default::default()
            },
        );

        let result = filter(&data, &criteria);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text("brand_id").as_deref(), Some("B1"));
    }

    #[test]
    fn test_missing_field_does_not_match() {
        let data = dataset();
        let criteria = FilterCriteria {
            pillar: Some("F&B".to_string()),
            ..Default::default()
        };

        // The record without a pillar is excluded
        assert_eq!(filter(&data, &criteria).len(), 2);
    }

    #[test]
    fn test_numeric_brand_id_matches_text_criterion() {
        let data = dataset();
        let criteria = FilterCriteria {
            brand_id: Some("7".to_string()),
            ..Default::default()
        };
        assert_eq!(filter(&data, &criteria).len(), 1);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let data = dataset();
        let criteria = FilterCriteria::new(
            "Oct-24",
            Dimensions {
                product_type: Some("QRIS".to_string()),
                ..Default::default()
            },
        );

        let once = filter(&data, &criteria);
        let twice = filter(once.iter().copied(), &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_echo_lists_only_active_constraints() {
        let criteria = FilterCriteria::new(
            "Oct-24",
            Dimensions {
                brand_id: Some("B1".to_string()),
                ..Default::default()
            },
        );

        let echo = criteria.echo();
        assert_eq!(echo.len(), 2);
        assert_eq!(echo["month"], "Oct-24");
        assert_eq!(echo["brand_id"], "B1");
    }
}
