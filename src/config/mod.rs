pub mod snapshot;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::utils::validation::{
    validate_path, validate_positive_number, validate_url, Validate,
};
use crate::Result;

/// Configuration for the catering inventory server.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "catering-server")]
#[command(about = "Flight catering inventory API")]
pub struct CateringConfig {
    #[arg(long, env = "CATERING_PORT", default_value = "8000")]
    pub port: u16,

    /// Directory holding the CSV datasets.
    #[arg(long, env = "CATERING_DATA_DIR", default_value = "./data")]
    pub data_dir: String,

    /// Origin allowed by the CORS layer (the React dev server).
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:3000")]
    pub allowed_origin: String,

    /// Boosting rounds for the consumption model trained at startup.
    #[arg(long, default_value = "50")]
    pub model_iterations: usize,

    /// Tree depth for the consumption model.
    #[arg(long, default_value = "3")]
    pub model_depth: u32,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CateringConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_url("allowed_origin", &self.allowed_origin)?;
        validate_positive_number("model_iterations", self.model_iterations, 1)?;
        validate_positive_number("model_depth", self.model_depth as usize, 1)?;
        Ok(())
    }
}

/// Configuration for the storm monitoring server.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "storm-server")]
#[command(about = "Tropical storm monitoring and weather grid API")]
pub struct StormConfig {
    #[arg(long, env = "STORM_PORT", default_value = "8010")]
    pub port: u16,

    /// Root of the timestamped snapshot tree written by the external storm tool.
    #[arg(long, env = "STORM_DATA_DIR", default_value = "./Data")]
    pub data_dir: String,

    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:3000")]
    pub allowed_origin: String,

    /// Base URL of the Open-Meteo forecast API.
    #[arg(long, env = "OPEN_METEO_URL", default_value = "https://api.open-meteo.com")]
    pub open_meteo_url: String,

    /// Upper bound on in-flight forecast requests during a grid fan-out.
    #[arg(long, default_value = "5")]
    pub concurrent_requests: usize,

    #[arg(long, default_value = "30")]
    pub request_timeout_secs: u64,

    /// Optional TOML file configuring the snapshot refresh scheduler.
    #[arg(long, env = "SNAPSHOT_CONFIG")]
    pub snapshot_config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for StormConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_url("allowed_origin", &self.allowed_origin)?;
        validate_url("open_meteo_url", &self.open_meteo_url)?;
        validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        validate_positive_number("request_timeout_secs", self.request_timeout_secs as usize, 1)?;
        if let Some(path) = &self.snapshot_config {
            validate_path("snapshot_config", path)?;
        }
        Ok(())
    }
}
