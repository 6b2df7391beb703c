//! Record store
//!
//! Immutable snapshot of the merchant dataset, loaded once at startup.
//! Cloning is cheap; every clone reads the same records.

use crate::error::AnalyticsError;
use crate::models::{fields, Record};
use crate::normalize::month_key;
use crate::Result;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[Record]>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Load the dataset from a JSON file.
    ///
    /// Never fails: a missing or malformed file yields an empty store, and the
    /// tools then answer with zeroed results.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read dataset; serving an empty store"
                );
                return Self::empty();
            }
        };

        match Self::from_json_slice(&bytes) {
            Ok(store) => {
                if store.is_empty() {
                    warn!(
                        path = %path.display(),
                        "Dataset is empty; tools will return placeholder results"
                    );
                } else {
                    info!(path = %path.display(), records = store.len(), "Dataset loaded");
                    debug!(first = ?store.records[0], "First dataset entry");
                }
                store
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to parse dataset; serving an empty store"
                );
                Self::empty()
            }
        }
    }

    /// Parse a JSON array of objects. Non-object elements are skipped.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;

        let Value::Array(items) = value else {
            return Err(AnalyticsError::DatasetError(
                "top level of the dataset must be a JSON array".to_string(),
            ));
        };

        let total = items.len();
        let records: Vec<Record> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(Record::new(map)),
                _ => None,
            })
            .collect();

        if records.len() < total {
            warn!(
                skipped = total - records.len(),
                "Skipped dataset entries that are not JSON objects"
            );
        }

        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest month present in the data.
    ///
    /// Months are ordered by calendar position. When no token parses, the
    /// lexicographic maximum of the raw tokens is returned instead.
    pub fn latest_month(&self) -> Option<String> {
        let months: Vec<_> = self
            .records
            .iter()
            .filter_map(|r| r.text(fields::MONTH))
            .collect();

        months
            .iter()
            .filter_map(|m| month_key(m).map(|key| (key, m)))
            .max_by_key(|(key, _)| *key)
            .map(|(_, m)| m.to_string())
            .or_else(|| months.iter().max().map(|m| m.to_string()))
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
