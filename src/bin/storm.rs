use clap::Parser;
use galley_backend::utils::{logger, validation::Validate};
use galley_backend::StormConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = StormConfig::parse();

    logger::init_server_logger(config.verbose);

    tracing::info!("Starting storm server");
    if config.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    galley_backend::serve_storm(config).await
}
