//! Payments analytics tools
//!
//! Thin adapters: parse the JSON parameters, call the façade, wrap the report.

use super::{
    optional_str, optional_str_any, parameter_object, required_str, string_schema, Tool,
};
use crate::analytics::PaymentsAnalytics;
use crate::filter::Dimensions;
use crate::models::{fields, ToolInput, ToolOutput};
use crate::Result;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Older clients send `product` for the product type
const PRODUCT_ALIAS: &str = "product";

const MONTH_DESC: &str = "Month in Mon-YY format, e.g. Oct-24";
const OPTIONAL_MONTH_DESC: &str =
    "Month in Mon-YY format, e.g. Oct-24. Defaults to the latest month in the data";

fn describe(field: &str) -> &'static str {
    match field {
        fields::PILLAR => "Business pillar (merchant category)",
        fields::PRODUCT_TYPE => "Payment product type",
        fields::BRAND_ID => "Merchant brand id",
        fields::MERCHANT_NAME => "Merchant name (case-insensitive)",
        _ => "",
    }
}

fn schema(
    months: &[(&'static str, &'static str)],
    dimensions: &[&'static str],
    required: &[&str],
) -> Value {
    let properties: Vec<(&str, &str)> = months
        .iter()
        .copied()
        .chain(dimensions.iter().map(|d| (*d, describe(d))))
        .collect();
    string_schema(&properties, required)
}

/// Read the dimension filters a tool accepts; anything else is ignored.
fn read_dimensions(params: &Map<String, Value>, accepted: &[&str]) -> Result<Dimensions> {
    let read = |key: &str| -> Result<Option<String>> {
        if !accepted.iter().any(|a| *a == key) {
            return Ok(None);
        }
        if key == fields::PRODUCT_TYPE {
            optional_str_any(&params, &[fields::PRODUCT_TYPE, PRODUCT_ALIAS])
        } else {
            optional_str(&params, key)
        }
    };

    Ok(Dimensions {
        pillar: read(fields::PILLAR)?,
        product_type: read(fields::PRODUCT_TYPE)?,
        brand_id: read(fields::BRAND_ID)?,
        merchant_name: read(fields::MERCHANT_NAME)?,
    })
}

const ALL_DIMENSIONS: &[&str] = &[
    fields::PILLAR,
    fields::PRODUCT_TYPE,
    fields::BRAND_ID,
    fields::MERCHANT_NAME,
];

//
// ================= Welcome =================
//

pub struct WelcomeMessageTool {
    analytics: Arc<PaymentsAnalytics>,
}

impl WelcomeMessageTool {
    pub fn new(analytics: Arc<PaymentsAnalytics>) -> Self {
        Self { analytics }
    }
}

#[async_trait::async_trait]
impl Tool for WelcomeMessageTool {
    fn name(&self) -> &'static str {
        "welcome_message"
    }

    fn description(&self) -> &'static str {
        "Greeting shown when the user says hello or asks for help; lists what can be asked"
    }

    fn parameters(&self) -> Value {
        string_schema(&[], &[])
    }

    async fn execute(&self, _input: &ToolInput) -> Result<ToolOutput> {
        ToolOutput::ok(&self.analytics.welcome_message())
    }
}

//
// ================= Summary =================
//

pub struct SummaryTool {
    analytics: Arc<PaymentsAnalytics>,
}

impl SummaryTool {
    pub fn new(analytics: Arc<PaymentsAnalytics>) -> Self {
        Self { analytics }
    }
}

#[async_trait::async_trait]
impl Tool for SummaryTool {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn description(&self) -> &'static str {
        "Total TPV and TPT for a month; filters: pillar, product_type, brand_id, merchant_name"
    }

    fn parameters(&self) -> Value {
        schema(&[("month", MONTH_DESC)], ALL_DIMENSIONS, &["month"])
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let params = parameter_object(input)?;
        let month = required_str(&params, "month")?;
        let dimensions = read_dimensions(&params, ALL_DIMENSIONS)?;

        ToolOutput::ok(&self.analytics.summary(&month, dimensions)?)
    }
}

//
// ================= Monthly growth =================
//

pub struct MonthlyGrowthTool {
    analytics: Arc<PaymentsAnalytics>,
}

impl MonthlyGrowthTool {
    pub fn new(analytics: Arc<PaymentsAnalytics>) -> Self {
        Self { analytics }
    }
}

#[async_trait::async_trait]
impl Tool for MonthlyGrowthTool {
    fn name(&self) -> &'static str {
        "monthly_growth"
    }

    fn description(&self) -> &'static str {
        "Percentage growth or decline of TPV/TPT from month_a to month_b; filters: pillar, product_type, brand_id, merchant_name"
    }

    fn parameters(&self) -> Value {
        schema(
            &[
                ("month_a", "Baseline month in Mon-YY format"),
                ("month_b", "Comparison month in Mon-YY format"),
            ],
            ALL_DIMENSIONS,
            &["month_a", "month_b"],
        )
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let params = parameter_object(input)?;
        let month_a = required_str(&params, "month_a")?;
        let month_b = required_str(&params, "month_b")?;
        let dimensions = read_dimensions(&params, ALL_DIMENSIONS)?;

        ToolOutput::ok(&self.analytics.monthly_growth(&month_a, &month_b, dimensions)?)
    }
}

//
// ================= Product mix =================
//

pub struct ProductMixTool {
    analytics: Arc<PaymentsAnalytics>,
}

impl ProductMixTool {
    const DIMENSIONS: &'static [&'static str] =
        &[fields::PILLAR, fields::BRAND_ID, fields::MERCHANT_NAME];

    pub fn new(analytics: Arc<PaymentsAnalytics>) -> Self {
        Self { analytics }
    }
}

#[async_trait::async_trait]
impl Tool for ProductMixTool {
    fn name(&self) -> &'static str {
        "product_mix"
    }

    fn description(&self) -> &'static str {
        "Contribution (percentage) of TPV and TPT from each product_type in a month; filters: pillar, brand_id, merchant_name"
    }

    fn parameters(&self) -> Value {
        schema(&[("month", MONTH_DESC)], Self::DIMENSIONS, &["month"])
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let params = parameter_object(input)?;
        let month = required_str(&params, "month")?;
        let dimensions = read_dimensions(&params, Self::DIMENSIONS)?;

        ToolOutput::ok(&self.analytics.product_mix(&month, dimensions)?)
    }
}

//
// ================= Breakdowns =================
//

pub struct DataByPillarTool {
    analytics: Arc<PaymentsAnalytics>,
}

impl DataByPillarTool {
    const DIMENSIONS: &'static [&'static str] =
        &[fields::BRAND_ID, fields::PRODUCT_TYPE, fields::MERCHANT_NAME];

    pub fn new(analytics: Arc<PaymentsAnalytics>) -> Self {
        Self { analytics }
    }
}

#[async_trait::async_trait]
impl Tool for DataByPillarTool {
    fn name(&self) -> &'static str {
        "data_by_pillar"
    }

    fn description(&self) -> &'static str {
        "TPV and TPT per pillar for a month; filters: brand_id, product_type, merchant_name"
    }

    fn parameters(&self) -> Value {
        schema(&[("month", MONTH_DESC)], Self::DIMENSIONS, &["month"])
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let params = parameter_object(input)?;
        let month = required_str(&params, "month")?;
        let dimensions = read_dimensions(&params, Self::DIMENSIONS)?;

        ToolOutput::ok(&self.analytics.data_by_pillar(&month, dimensions)?)
    }
}

pub struct DataByProductTypeTool {
    analytics: Arc<PaymentsAnalytics>,
}

impl DataByProductTypeTool {
    const DIMENSIONS: &'static [&'static str] =
        &[fields::PILLAR, fields::BRAND_ID, fields::MERCHANT_NAME];

    pub fn new(analytics: Arc<PaymentsAnalytics>) -> Self {
        Self { analytics }
    }
}

#[async_trait::async_trait]
impl Tool for DataByProductTypeTool {
    fn name(&self) -> &'static str {
        "data_by_product_type"
    }

    fn description(&self) -> &'static str {
        "TPV and TPT per product_type for a month; filters: pillar, brand_id, merchant_name"
    }

    fn parameters(&self) -> Value {
        schema(&[("month", MONTH_DESC)], Self::DIMENSIONS, &["month"])
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let params = parameter_object(input)?;
        let month = required_str(&params, "month")?;
        let dimensions = read_dimensions(&params, Self::DIMENSIONS)?;

        ToolOutput::ok(&self.analytics.data_by_product_type(&month, dimensions)?)
    }
}

//
// ================= Churn =================
//

pub struct ChurnPredictionAnalysisTool {
    analytics: Arc<PaymentsAnalytics>,
}

impl ChurnPredictionAnalysisTool {
    pub fn new(analytics: Arc<PaymentsAnalytics>) -> Self {
        Self { analytics }
    }
}

#[async_trait::async_trait]
impl Tool for ChurnPredictionAnalysisTool {
    fn name(&self) -> &'static str {
        "churn_prediction_analysis"
    }

    fn description(&self) -> &'static str {
        "Churn potential for a month: merchant count, count per churn prediction category, and the top critical-risk merchants"
    }

    fn parameters(&self) -> Value {
        schema(&[("month", OPTIONAL_MONTH_DESC)], &[], &[])
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let params = parameter_object(input)?;
        let month = optional_str(&params, "month")?;

        ToolOutput::ok(&self.analytics.churn_prediction_analysis(month.as_deref())?)
    }
}

pub struct ChurnCandidatesTool {
    analytics: Arc<PaymentsAnalytics>,
}

impl ChurnCandidatesTool {
    pub fn new(analytics: Arc<PaymentsAnalytics>) -> Self {
        Self { analytics }
    }
}

#[async_trait::async_trait]
impl Tool for ChurnCandidatesTool {
    fn name(&self) -> &'static str {
        "churn_candidates"
    }

    fn description(&self) -> &'static str {
        "Brand ids of merchants flagged as churn risk; filters: month, product_type"
    }

    fn parameters(&self) -> Value {
        schema(&[("month", OPTIONAL_MONTH_DESC)], &[fields::PRODUCT_TYPE], &[])
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let params = parameter_object(input)?;
        let month = optional_str(&params, "month")?;
        let product_type = optional_str_any(&params, &[fields::PRODUCT_TYPE, PRODUCT_ALIAS])?;

        ToolOutput::ok(
            &self
                .analytics
                .churn_candidates(month.as_deref(), product_type.as_deref())?,
        )
    }
}

//
// ================= Profit =================
//

pub struct ProfitTotalTool {
    analytics: Arc<PaymentsAnalytics>,
}

impl ProfitTotalTool {
    const DIMENSIONS: &'static [&'static str] =
        &[fields::PRODUCT_TYPE, fields::BRAND_ID, fields::MERCHANT_NAME];

    pub fn new(analytics: Arc<PaymentsAnalytics>) -> Self {
        Self { analytics }
    }
}

#[async_trait::async_trait]
impl Tool for ProfitTotalTool {
    fn name(&self) -> &'static str {
        "profit_total"
    }

    fn description(&self) -> &'static str {
        "Total TPV of transactions labelled PROFIT; filters: month, product_type, brand_id, merchant_name"
    }

    fn parameters(&self) -> Value {
        schema(&[("month", OPTIONAL_MONTH_DESC)], Self::DIMENSIONS, &[])
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let params = parameter_object(input)?;
        let month = optional_str(&params, "month")?;
        let dimensions = read_dimensions(&params, Self::DIMENSIONS)?;

        ToolOutput::ok(&self.analytics.profit_total(month.as_deref(), dimensions)?)
    }
}
