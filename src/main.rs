use clap::Parser;
use galley_backend::utils::{logger, validation::Validate};
use galley_backend::CateringConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CateringConfig::parse();

    logger::init_server_logger(config.verbose);

    tracing::info!("Starting catering server");
    if config.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    galley_backend::serve_catering(config).await
}
