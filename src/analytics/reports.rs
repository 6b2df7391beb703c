//! Response envelopes returned by the analytics tools.
//!
//! Field names are part of the contract with the agent runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolved month(s) and applied dimension filters
pub type FilterEcho = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub metric: String,
    pub filters: FilterEcho,
    #[serde(rename = "Total_TPV")]
    pub total_tpv: f64,
    #[serde(rename = "Total_TPT")]
    pub total_tpt: f64,
    #[serde(rename = "Record_Count")]
    pub record_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyGrowthReport {
    pub metric: String,
    pub filters: FilterEcho,
    #[serde(rename = "TPV_A")]
    pub tpv_a: f64,
    #[serde(rename = "TPV_B")]
    pub tpv_b: f64,
    #[serde(rename = "TpvGrowthPct")]
    pub tpv_growth_pct: String,
    #[serde(rename = "TPT_A")]
    pub tpt_a: f64,
    #[serde(rename = "TPT_B")]
    pub tpt_b: f64,
    #[serde(rename = "TptGrowthPct")]
    pub tpt_growth_pct: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductContribution {
    #[serde(rename = "TPV_Value")]
    pub tpv_value: f64,
    #[serde(rename = "TPT_Value")]
    pub tpt_value: f64,
    #[serde(rename = "TPV_Contribution_Pct")]
    pub tpv_contribution_pct: String,
    #[serde(rename = "TPT_Contribution_Pct")]
    pub tpt_contribution_pct: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMixReport {
    pub metric: String,
    pub filters: FilterEcho,
    #[serde(rename = "Total_TPV_All")]
    pub total_tpv_all: f64,
    #[serde(rename = "Total_TPT_All")]
    pub total_tpt_all: f64,
    pub mix_by_product: BTreeMap<String, ProductContribution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    #[serde(rename = "TPV_Value")]
    pub tpv_value: f64,
    #[serde(rename = "TPT_Value")]
    pub tpt_value: f64,
}

/// TPV/TPT broken down along one dimension (pillar or product type)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownReport {
    pub metric: String,
    pub filters: FilterEcho,
    pub dimension: String,
    pub breakdown: BTreeMap<String, GroupMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnRiskMerchant {
    pub brand_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    #[serde(rename = "Churn_Prediction")]
    pub churn_prediction: String,
    #[serde(rename = "TPV_Value")]
    pub tpv_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnPredictionReport {
    pub metric: String,
    pub filters: FilterEcho,
    #[serde(rename = "Total_Merchant_Count")]
    pub total_merchant_count: usize,
    #[serde(rename = "Summary")]
    pub summary: BTreeMap<String, usize>,
    #[serde(rename = "Potentially_Churning_Merchants")]
    pub potentially_churning_merchants: Vec<ChurnRiskMerchant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnCandidatesReport {
    pub metric: String,
    pub filters: FilterEcho,
    pub total_candidates: usize,
    pub brand_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitReport {
    pub metric: String,
    pub filters: FilterEcho,
    pub grand_total: f64,
    #[serde(rename = "Record_Count")]
    pub record_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    pub metric: String,
    pub message: String,
}
