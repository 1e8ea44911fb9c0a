use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tracing::warn;

use pondo_config::Config;
use pondo_context::ContextAggregator;
use pondo_core::{ExtractModel, OcrProvider};
use pondo_gateway::{build_router, start_server, AppState};
use pondo_notify::NotificationTrigger;
use pondo_receipt::providers::{GeminiModel, MockModel, MockOcr, OcrSpaceProvider};
use pondo_receipt::ReceiptScanner;
use pondo_store::SqliteStore;
use rates::RateProvider;

/// OCR text the mock provider answers with when no OCR key is configured.
const MOCK_OCR_TEXT: &str = "JOLLIBEE Ayala Triangle\nChickenjoy w/ Rice 110.00\nCoke Float 75.50\nTOTAL 185.50\nGCASH";

/// Model output the mock structuring provider answers with.
const MOCK_MODEL_JSON: &str = r#"{
  "merchant": "Jollibee Ayala Triangle",
  "amount": 185.50,
  "date": "2025-06-02",
  "items": ["Chickenjoy w/ Rice", "Coke Float"],
  "category": "Food & Dining",
  "paymentMethod": "GCash"
}"#;

#[derive(Parser)]
#[command(name = "pondo")]
#[command(about = "Pondo personal finance assistant backend")]
#[command(version)]
struct Cli {
    /// Path to a pondo.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Pondo HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current server status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = pondo_config::load(cli.config.as_deref())?;

    logging::init_logger(&config.logging.dir, &config.logging.level);

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.server.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!(
                        "pondo is not running on port {}",
                        config.server.port
                    );
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    let store = Arc::new(SqliteStore::open(&config.database.path)?);

    let ocr: Arc<dyn OcrProvider> = match &config.providers.ocrspace_api_key {
        Some(key) => Arc::new(OcrSpaceProvider::new(key)),
        None => {
            warn!("no OCR.space API key configured, using mock OCR provider");
            Arc::new(MockOcr::with_text(MOCK_OCR_TEXT))
        }
    };
    let model: Arc<dyn ExtractModel> = match &config.providers.gemini_api_key {
        Some(key) => {
            let mut gemini = GeminiModel::new(key);
            if let Some(model) = &config.providers.gemini_model {
                gemini = gemini.with_model(model);
            }
            Arc::new(gemini)
        }
        None => {
            warn!("no Gemini API key configured, using mock structuring model");
            Arc::new(MockModel::with_response(MOCK_MODEL_JSON))
        }
    };

    let mut rate_provider = RateProvider::new();
    if let Some(url) = &config.rates.base_url {
        rate_provider = rate_provider.with_base_url(url);
    }

    let state = Arc::new(AppState {
        store: store.clone(),
        scanner: ReceiptScanner::new(ocr, model),
        aggregator: ContextAggregator::new(store.clone()),
        trigger: NotificationTrigger::new(store),
        rates: rate_provider,
    });

    let app = build_router(state).layer(CorsLayer::permissive());
    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()?;

    start_server(addr, app).await
}
