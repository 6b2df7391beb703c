//! Tool trait and registry
//!
//! Tools are deterministic, read-only operations over the record store.
//! The registry is what the agent runtime (HTTP or CLI) dispatches through.

use crate::analytics::PaymentsAnalytics;
use crate::error::AnalyticsError;
use crate::models::{ToolInput, ToolOutput};
use crate::Result;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub mod payments;

pub use payments::*;

/// Trait for a single tool
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON Schema of the accepted parameters
    fn parameters(&self) -> Value;
    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput>;
}

/// Tool definition as advertised to the agent runtime
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                tool_type: "function".to_string(),
                function: FunctionDefinition {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    parameters: tool.parameters(),
                },
            })
            .collect()
    }

    /// Look up and run a tool
    pub async fn invoke(&self, input: &ToolInput) -> Result<ToolOutput> {
        let tool = self
            .get(&input.tool_name)
            .ok_or_else(|| AnalyticsError::ToolNotFound(input.tool_name.clone()))?;

        debug!(tool_name = %input.tool_name, parameters = %input.parameters, "Executing tool");
        let start = Instant::now();

        let result = tool.execute(input).await;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(tool_name = %input.tool_name, execution_time_ms, "Tool completed"),
            Err(e) => warn!(
                tool_name = %input.tool_name,
                execution_time_ms,
                error = %e,
                "Tool failed"
            ),
        }

        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a registry holding every analytics tool over one shared façade.
pub fn create_default_registry(analytics: Arc<PaymentsAnalytics>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(WelcomeMessageTool::new(analytics.clone())));
    registry.register(Arc::new(SummaryTool::new(analytics.clone())));
    registry.register(Arc::new(MonthlyGrowthTool::new(analytics.clone())));
    registry.register(Arc::new(ProductMixTool::new(analytics.clone())));
    registry.register(Arc::new(DataByPillarTool::new(analytics.clone())));
    registry.register(Arc::new(DataByProductTypeTool::new(analytics.clone())));
    registry.register(Arc::new(ChurnPredictionAnalysisTool::new(analytics.clone())));
    registry.register(Arc::new(ChurnCandidatesTool::new(analytics.clone())));
    registry.register(Arc::new(ProfitTotalTool::new(analytics)));

    registry
}

//
// ================= Parameter helpers =================
//

/// Tool parameters as an object; `null` counts as no parameters.
fn parameter_object(input: &ToolInput) -> Result<Cow<'_, Map<String, Value>>> {
    match &input.parameters {
        Value::Object(map) => Ok(Cow::Borrowed(map)),
        Value::Null => Ok(Cow::Owned(Map::new())),
        _ => Err(AnalyticsError::InvalidToolInput(
            "tool_input must be a JSON object".to_string(),
        )),
    }
}

/// Optional string parameter. Numbers are rendered as text; null and blank
/// strings are absent.
fn optional_str(params: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(AnalyticsError::InvalidToolInput(format!(
            "'{}' must be a string, got {}",
            key, other
        ))),
    }
}

/// First present value among `keys` (canonical name first, then aliases)
fn optional_str_any(params: &Map<String, Value>, keys: &[&str]) -> Result<Option<String>> {
    for key in keys {
        if let Some(value) = optional_str(params, key)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn required_str(params: &Map<String, Value>, key: &str) -> Result<String> {
    optional_str(params, key)?.ok_or_else(|| {
        AnalyticsError::InvalidArgument(format!("Expected '{}' in tool_input", key))
    })
}

/// JSON Schema for an object of string properties
fn string_schema(properties: &[(&str, &str)], required: &[&str]) -> Value {
    let properties: Map<String, Value> = properties
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({
                    "type": "string",
                    "description": description
                }),
            )
        })
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}
