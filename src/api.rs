//! REST API Server for the payments analytics tools
//!
//! Exposes tool discovery and invocation over HTTP, plus the chat home page.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::error::AnalyticsError;
use crate::models::ToolInput;
use crate::tools::{ToolDefinition, ToolRegistry};

/// Placeholder replaced in the home page template
pub const WEBHOOK_PLACEHOLDER: &str = "{{CHAT_WEBHOOK_URL}}";

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

/// Home page template and the webhook URL substituted into it
#[derive(Debug, Clone)]
pub struct HomePage {
    pub template_path: PathBuf,
    pub chat_webhook_url: String,
}

impl HomePage {
    pub fn new(template_path: impl Into<PathBuf>, chat_webhook_url: impl Into<String>) -> Self {
        Self {
            template_path: template_path.into(),
            chat_webhook_url: chat_webhook_url.into(),
        }
    }

    /// Read the template and fill in the webhook URL
    pub async fn render(&self) -> crate::Result<String> {
        let html = tokio::fs::read_to_string(&self.template_path).await?;
        Ok(html.replace(WEBHOOK_PLACEHOLDER, &self.chat_webhook_url))
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<ToolRegistry>,
    pub home: Arc<HomePage>,
    /// Records in the loaded dataset, reported by `/health`
    pub record_count: usize,
}

fn status_for(err: &AnalyticsError) -> StatusCode {
    match err {
        AnalyticsError::ToolNotFound(_) => StatusCode::NOT_FOUND,
        e if e.is_caller_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// =============================
/// Home Page
/// =============================

async fn home(State(state): State<ApiState>) -> (StatusCode, Html<String>) {
    match state.home.render().await {
        Ok(html) => {
            info!(chat_webhook_url = %state.home.chat_webhook_url, "Serving home page");
            (StatusCode::OK, Html(html))
        }
        Err(e) => {
            warn!(
                template = %state.home.template_path.display(),
                error = %e,
                "Home page template unavailable"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Home page unavailable</h1>".to_string()),
            )
        }
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "records": state.record_count,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Tool Endpoints
/// =============================

async fn list_tools(State(state): State<ApiState>) -> Json<Vec<ToolDefinition>> {
    Json(state.registry.definitions())
}

/// An empty body means no parameters; anything else must be JSON,
/// whatever the content type says.
fn parse_parameters(body: &[u8]) -> crate::Result<serde_json::Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }

    serde_json::from_slice(body).map_err(|e| {
        AnalyticsError::InvalidToolInput(format!("request body is not valid JSON: {}", e))
    })
}

async fn invoke_tool(
    State(state): State<ApiState>,
    Path(tool_name): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<ApiResponse>) {
    info!(tool_name = %tool_name, "Received tool invocation");

    let parameters = match parse_parameters(&body) {
        Ok(parameters) => parameters,
        Err(e) => {
            warn!(tool_name = %tool_name, error = %e, "Rejected tool invocation body");
            return (status_for(&e), Json(ApiResponse::error(e.to_string())));
        }
    };

    let input = ToolInput::new(tool_name, parameters);

    match state.registry.invoke(&input).await {
        Ok(output) => (StatusCode::OK, Json(ApiResponse::success(output.data))),
        Err(e) => (status_for(&e), Json(ApiResponse::error(e.to_string()))),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/:name", post(invoke_tool))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    address: &str,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(address).await?;

    info!("API Server listening on http://{}", address);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&AnalyticsError::InvalidArgument("m".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AnalyticsError::InvalidToolInput("m".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AnalyticsError::ToolNotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&AnalyticsError::DatasetError("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_parse_parameters() {
        assert_eq!(parse_parameters(b"").unwrap(), serde_json::Value::Null);
        assert_eq!(parse_parameters(b"  \n").unwrap(), serde_json::Value::Null);
        assert_eq!(
            parse_parameters(br#"{"month": "Oct-24"}"#).unwrap()["month"],
            "Oct-24"
        );

        let err = parse_parameters(br#"{"month": "Oct-24""#).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidToolInput(_)));
    }

    #[tokio::test]
    async fn test_home_page_missing_template() {
        let page = HomePage::new("/no/such/index.html", "https://hooks.example/chat");
        assert!(page.render().await.is_err());
    }
}
