use clap::Parser;
use smire_analytics::{
    config::DEFAULT_DATASET_PATH, create_default_registry, PaymentsAnalytics, RecordStore,
    ToolInput,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run a single analytics tool against a dataset file
#[derive(Parser, Debug)]
#[command(name = "smire", version, about)]
struct Cli {
    /// JSON array of merchant records
    #[arg(long, env = "DATASET_PATH", default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Print the tool definitions and exit
    #[arg(long)]
    list: bool,

    /// Tool to invoke, e.g. `summary`
    tool: Option<String>,

    /// Tool parameters as a JSON object
    #[arg(long, short, default_value = "{}")]
    params: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = RecordStore::load(&cli.dataset);
    let registry = create_default_registry(Arc::new(PaymentsAnalytics::new(store)));

    if cli.list {
        println!("{}", serde_json::to_string_pretty(&registry.definitions())?);
        return Ok(());
    }

    let Some(tool) = cli.tool else {
        eprintln!("No tool given. Available tools: {}", registry.list().join(", "));
        std::process::exit(2);
    };

    let parameters: serde_json::Value = serde_json::from_str(&cli.params)?;
    info!(tool = %tool, "Invoking tool");

    let output = registry.invoke(&ToolInput::new(tool, parameters)).await?;
    println!("{}", serde_json::to_string_pretty(&output.data)?);

    Ok(())
}
