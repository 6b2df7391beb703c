//! Payments analytics façade
//!
//! One method per analytics question. Each resolves its month(s), filters the
//! record store, aggregates, and shapes a report. Only invalid caller input
//! fails; bad data degrades the numbers instead.

use crate::aggregate::{
    distinct_values, group_by, growth_percentage, percentage_of, totals, UNKNOWN_GROUP,
};
use crate::filter::{eq_ignore_case, filter, fold_case, Dimensions, FilterCriteria};
use crate::models::{fields, Record};
use crate::normalize::{require_month, resolve_month};
use crate::store::RecordStore;
use crate::Result;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

pub mod reports;

pub use reports::*;

/// `Churn_Prediction` label of merchants most likely to churn
pub const CRITICAL_RISK: &str = "Critical Risk";

/// `Churn_Status` label of churn candidates
pub const RISK_STATUS: &str = "RISK";

/// `Transaction_Type` label of profit-bearing transactions
pub const PROFIT_TYPE: &str = "PROFIT";

/// Maximum critical-risk merchants listed by the churn analysis
pub const TOP_CRITICAL_MERCHANTS: usize = 5;

const WELCOME_TEXT: &str =
    "Hello! Welcome to SMIRE (Smart Merchant Insight & Recommendation Engine).\n\n\
I can help you understand how your merchants are doing:\n\
- Transaction value (TPV) and count (TPT) for any month\n\
- Month-over-month growth\n\
- Product mix and pillar breakdowns\n\
- Merchants at risk of churning\n\n\
Ask a question to get started.";

pub struct PaymentsAnalytics {
    store: RecordStore,
}

impl PaymentsAnalytics {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    fn select(&self, criteria: &FilterCriteria) -> Vec<&Record> {
        let records = filter(&self.store, criteria);
        debug!(
            filters = ?criteria.echo(),
            matched = records.len(),
            scanned = self.store.len(),
            "Filtered records"
        );
        records
    }

    /// Total TPV and TPT for a month
    pub fn summary(&self, month: &str, dimensions: Dimensions) -> Result<SummaryReport> {
        let month = require_month("month", month)?;
        let criteria = FilterCriteria::new(month, dimensions);
        let records = self.select(&criteria);
        let totals = totals(&records);

        Ok(SummaryReport {
            metric: "Transaction Summary".to_string(),
            filters: criteria.echo(),
            total_tpv: totals.tpv,
            total_tpt: totals.tpt,
            record_count: records.len(),
        })
    }

    /// TPV/TPT change from `month_a` to `month_b` under the same filters
    pub fn monthly_growth(
        &self,
        month_a: &str,
        month_b: &str,
        dimensions: Dimensions,
    ) -> Result<MonthlyGrowthReport> {
        let month_a = require_month("month_a", month_a)?;
        let month_b = require_month("month_b", month_b)?;

        let before_criteria = FilterCriteria::new(month_a.clone(), dimensions.clone());
        let before = totals(&self.select(&before_criteria));
        let after_criteria = FilterCriteria::new(month_b.clone(), dimensions);
        let after = totals(&self.select(&after_criteria));

        let mut filters = after_criteria.echo();
        filters.remove(fields::MONTH);
        filters.insert("month_a".to_string(), month_a.clone());
        filters.insert("month_b".to_string(), month_b.clone());

        Ok(MonthlyGrowthReport {
            metric: format!("Monthly Change ({} -> {})", month_a, month_b),
            filters,
            tpv_a: before.tpv,
            tpv_b: after.tpv,
            tpv_growth_pct: growth_percentage(before.tpv, after.tpv),
            tpt_a: before.tpt,
            tpt_b: after.tpt,
            tpt_growth_pct: growth_percentage(before.tpt, after.tpt),
        })
    }

    /// Share of TPV and TPT contributed by each product type
    pub fn product_mix(&self, month: &str, mut dimensions: Dimensions) -> Result<ProductMixReport> {
        let month = require_month("month", month)?;
        release_grouped(fields::PRODUCT_TYPE, &mut dimensions.product_type);

        let criteria = FilterCriteria::new(month, dimensions);
        let records = self.select(&criteria);
        let overall = totals(&records);

        let mix_by_product = group_by(&records, fields::PRODUCT_TYPE, UNKNOWN_GROUP)
            .into_iter()
            .map(|(product, group)| {
                let t = totals(&group);
                let contribution = ProductContribution {
                    tpv_value: t.tpv,
                    tpt_value: t.tpt,
                    tpv_contribution_pct: percentage_of(t.tpv, overall.tpv),
                    tpt_contribution_pct: percentage_of(t.tpt, overall.tpt),
                };
                (product, contribution)
            })
            .collect();

        Ok(ProductMixReport {
            metric: "Product Mix Contribution".to_string(),
            filters: criteria.echo(),
            total_tpv_all: overall.tpv,
            total_tpt_all: overall.tpt,
            mix_by_product,
        })
    }

    pub fn data_by_pillar(
        &self,
        month: &str,
        mut dimensions: Dimensions,
    ) -> Result<BreakdownReport> {
        release_grouped(fields::PILLAR, &mut dimensions.pillar);
        self.breakdown("Data by Pillar", month, dimensions, fields::PILLAR)
    }

    pub fn data_by_product_type(
        &self,
        month: &str,
        mut dimensions: Dimensions,
    ) -> Result<BreakdownReport> {
        release_grouped(fields::PRODUCT_TYPE, &mut dimensions.product_type);
        self.breakdown("Data by Product Type", month, dimensions, fields::PRODUCT_TYPE)
    }

    fn breakdown(
        &self,
        metric: &str,
        month: &str,
        dimensions: Dimensions,
        dimension: &'static str,
    ) -> Result<BreakdownReport> {
        let month = require_month("month", month)?;
        let criteria = FilterCriteria::new(month, dimensions);
        let records = self.select(&criteria);

        let breakdown = group_by(&records, dimension, UNKNOWN_GROUP)
            .into_iter()
            .map(|(key, group)| {
                let t = totals(&group);
                (
                    key,
                    GroupMetrics {
                        tpv_value: t.tpv,
                        tpt_value: t.tpt,
                    },
                )
            })
            .collect();

        Ok(BreakdownReport {
            metric: metric.to_string(),
            filters: criteria.echo(),
            dimension: dimension.to_string(),
            breakdown,
        })
    }

    /// Churn-prediction categories and the highest-TPV critical-risk merchants
    pub fn churn_prediction_analysis(&self, month: Option<&str>) -> Result<ChurnPredictionReport> {
        let month = resolve_month(month, &self.store)?;
        let criteria = FilterCriteria::for_month(month);
        let records = self.select(&criteria);

        let summary = group_by(&records, fields::CHURN_PREDICTION, UNKNOWN_GROUP)
            .into_iter()
            .map(|(category, group)| (category, group.len()))
            .collect();

        Ok(ChurnPredictionReport {
            metric: "Merchant Churn Potential Analysis".to_string(),
            filters: criteria.echo(),
            total_merchant_count: distinct_values(&records, fields::BRAND_ID).len(),
            summary,
            potentially_churning_merchants: critical_risk_merchants(&records),
        })
    }

    /// Distinct brand ids whose churn status is `RISK`
    pub fn churn_candidates(
        &self,
        month: Option<&str>,
        product_type: Option<&str>,
    ) -> Result<ChurnCandidatesReport> {
        let month = resolve_month(month, &self.store)?;
        let criteria = FilterCriteria::new(
            month,
            Dimensions {
                product_type: product_type.map(str::to_string),
                ..Default::default()
            },
        );

        let at_risk: Vec<&Record> = self
            .select(&criteria)
            .into_iter()
            .filter(|r| has_label(r, fields::CHURN_STATUS, RISK_STATUS))
            .collect();
        let brand_ids = distinct_values(&at_risk, fields::BRAND_ID);

        Ok(ChurnCandidatesReport {
            metric: "Churn Candidates".to_string(),
            filters: criteria.echo(),
            total_candidates: brand_ids.len(),
            brand_ids,
        })
    }

    /// TPV of transactions labelled as profit
    pub fn profit_total(
        &self,
        month: Option<&str>,
        dimensions: Dimensions,
    ) -> Result<ProfitReport> {
        let month = resolve_month(month, &self.store)?;
        let criteria = FilterCriteria::new(month, dimensions);

        let profitable: Vec<&Record> = self
            .select(&criteria)
            .into_iter()
            .filter(|r| has_label(r, fields::TRANSACTION_TYPE, PROFIT_TYPE))
            .collect();

        Ok(ProfitReport {
            metric: "Profit TPV".to_string(),
            filters: criteria.echo(),
            grand_total: totals(&profitable).tpv,
            record_count: profitable.len(),
        })
    }

    pub fn welcome_message(&self) -> WelcomeMessage {
        WelcomeMessage {
            metric: "Welcome".to_string(),
            message: WELCOME_TEXT.to_string(),
        }
    }
}

/// Grouping and filtering on the same dimension are exclusive
fn release_grouped(dimension: &'static str, value: &mut Option<String>) {
    if let Some(ignored) = value.take() {
        debug!(dimension, ignored = %ignored, "Ignoring filter on grouped dimension");
    }
}

fn has_label(record: &Record, field: &str, label: &str) -> bool {
    record
        .text(field)
        .is_some_and(|value| eq_ignore_case(&value, label))
}

/// One entry per critical-risk brand, ranked by TPV, capped at
/// [`TOP_CRITICAL_MERCHANTS`]
fn critical_risk_merchants(records: &[&Record]) -> Vec<ChurnRiskMerchant> {
    let mut merchants: Vec<ChurnRiskMerchant> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();

    for record in records {
        let Some(prediction) = record.text(fields::CHURN_PREDICTION) else {
            continue;
        };
        if !eq_ignore_case(&prediction, CRITICAL_RISK) {
            continue;
        }
        let Some(brand_id) = record.text(fields::BRAND_ID) else {
            continue;
        };

        let tpv = record.number(fields::TPV);
        let key = fold_case(&brand_id);
        match position.get(&key) {
            Some(&i) => merchants[i].tpv_value += tpv,
            None => {
                position.insert(key, merchants.len());
                merchants.push(ChurnRiskMerchant {
                    brand_id: brand_id.into_owned(),
                    merchant_name: record.text(fields::MERCHANT_NAME).map(|n| n.into_owned()),
                    churn_prediction: prediction.into_owned(),
                    tpv_value: tpv,
                });
            }
        }
    }

    // Stable sort: equal TPV keeps first-seen order
    merchants.sort_by(|a, b| {
        b.tpv_value
            .partial_cmp(&a.tpv_value)
            .unwrap_or(Ordering::Equal)
    });
    merchants.truncate(TOP_CRITICAL_MERCHANTS);
    merchants
}
