use std::process::ExitCode;

use tracing::{error, info};

use listgate::{engine, Config, ListSettings, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = listgate::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        listgate::logging::init_console_only(&config.logging.level);
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("listgate stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> listgate::Result<()> {
    config.validate()?;

    info!("listgate - mailing list gateway");
    info!(
        backend = %config.engine.backend,
        site_list = %config.engine.site_list,
        "Server configured on {}:{}",
        config.server.host,
        config.server.port
    );

    let engine = engine::open(&config.engine).await?;
    let settings = ListSettings::from_config(&config.engine)?;

    WebServer::new(&config.server, engine, settings)?.run().await
}
