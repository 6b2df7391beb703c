//! Aggregation over filtered records.
//!
//! Sums, partitions and the percentage formatting used in every envelope.

use crate::filter::fold_case;
use crate::models::{fields, Record};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Bucket for records that lack the grouping field
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Growth reported when the baseline is zero and the new value is positive
pub const UNBOUNDED_GROWTH: &str = "Inf";

/// TPV and TPT summed together
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub tpv: f64,
    pub tpt: f64,
}

pub fn totals(records: &[&Record]) -> Totals {
    Totals {
        tpv: sum(records, fields::TPV),
        tpt: sum(records, fields::TPT),
    }
}

pub fn sum(records: &[&Record], field: &str) -> f64 {
    records.iter().map(|r| r.number(field)).sum()
}

/// Partition records by the text value of `key_field`.
///
/// Values differing only in case share a bucket, labelled with the first
/// spelling seen. Records without the field go to `default_key`. Buckets keep
/// input order.
pub fn group_by<'a>(
    records: &[&'a Record],
    key_field: &str,
    default_key: &str,
) -> BTreeMap<String, Vec<&'a Record>> {
    let mut labels: HashMap<String, String> = HashMap::new();
    let mut grouped: BTreeMap<String, Vec<&'a Record>> = BTreeMap::new();

    for record in records {
        let value = record.text(key_field);
        let value = value.as_deref().unwrap_or(default_key);

        let label = labels
            .entry(fold_case(value))
            .or_insert_with(|| value.to_string());

        grouped.entry(label.clone()).or_default().push(*record);
    }

    grouped
}

/// Distinct present values of `field` ignoring case, in first-seen order and
/// spelling
pub fn distinct_values(records: &[&Record], field: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    records
        .iter()
        .filter_map(|r| r.text(field))
        .filter(|v| seen.insert(fold_case(v)))
        .map(|v| v.into_owned())
        .collect()
}

pub fn percentage_of(part: f64, whole: f64) -> String {
    if whole == 0.0 {
        return format_pct(0.0);
    }
    format_pct(part / whole * 100.0)
}

/// Percentage change from `before` to `after`.
///
/// A positive `after` over a zero baseline has no finite growth and reports
/// [`UNBOUNDED_GROWTH`].
pub fn growth_percentage(before: f64, after: f64) -> String {
    if before > 0.0 {
        format_pct((after - before) / before * 100.0)
    } else if after > 0.0 {
        UNBOUNDED_GROWTH.to_string()
    } else {
        format_pct(0.0)
    }
}

fn format_pct(value: f64) -> String {
    format!("{:.2}%", value)
}
