use std::sync::Arc;

use tracing::{error, info};

use modhub::{AppState, Config, Database, FileStorage, ModService, WebServer};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = modhub::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        modhub::logging::init_console_only(&config.logging.level);
    }

    info!("modhub - mod package hosting service");

    if let Err(e) = run(config).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> modhub::Result<()> {
    let db = Database::open(&config.database.path).await?;
    let storage = FileStorage::new(&config.files.storage_path).await?;
    info!("File storage initialized at: {}", config.files.storage_path);

    ModService::new(&db, &storage).setup().await?;

    let server = WebServer::new(&config, AppState::new(Arc::new(db), storage))?;
    info!("Server configured on {}", server.addr());

    server.run().await?;
    Ok(())
}
