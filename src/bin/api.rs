use smire_analytics::{
    api::{start_server, ApiState, HomePage},
    create_default_registry, Config, PaymentsAnalytics, RecordStore,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    if config.chat_webhook_url.is_empty() {
        warn!("CHAT_WEBHOOK_URL not set; the home page chat widget will have no endpoint");
    }

    info!("SMIRE Payments Analytics - API Server");
    info!(dataset = %config.dataset_path.display(), "Loading dataset");

    // Create components
    let store = RecordStore::load(&config.dataset_path);
    let record_count = store.len();
    let analytics = Arc::new(PaymentsAnalytics::new(store));
    let registry = create_default_registry(analytics);

    info!(tools = ?registry.list(), "Tool registry initialized");

    let state = ApiState {
        registry: Arc::new(registry),
        home: Arc::new(HomePage::new(
            config.home_page_path.clone(),
            config.chat_webhook_url.clone(),
        )),
        record_count,
    };

    // Start API server
    start_server(state, &config.bind_address()).await?;

    Ok(())
}
