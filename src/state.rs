use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::{CateringConfig, StormConfig};
use crate::core::predictor::ConsumptionModel;
use crate::store;

/// Shared state of the catering server. Datasets are re-read per request;
/// only the trained model lives here, behind a lock so requests arriving
/// during startup see "not ready" instead of racing a half-trained model.
pub struct CateringState {
    pub config: CateringConfig,
    pub model: RwLock<Option<ConsumptionModel>>,
}

impl CateringState {
    pub fn new(config: CateringConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            model: RwLock::new(None),
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.data_dir)
    }

    /// Trains the consumption model in the background and publishes it once
    /// done. A missing or empty history file leaves the model slot empty
    /// and the prediction endpoint answering 503.
    pub fn spawn_model_training(self: &Arc<Self>) {
        let state = self.clone();

        tokio::spawn(async move {
            tracing::info!("Training consumption model...");

            let records = match store::load_consumption_history(&state.data_dir()).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("Consumption history unavailable, predictions disabled: {}", e);
                    return;
                }
            };

            let iterations = state.config.model_iterations;
            let depth = state.config.model_depth;
            let trained = tokio::task::spawn_blocking(move || {
                ConsumptionModel::train(&records, iterations, depth)
            })
            .await;

            match trained {
                Ok(Ok(model)) => {
                    *state.model.write().await = Some(model);
                    tracing::info!("Consumption model ready");
                }
                Ok(Err(e)) => tracing::warn!("Consumption model training failed: {}", e),
                Err(e) => tracing::warn!("Consumption model training panicked: {}", e),
            }
        });
    }
}

/// Shared state of the storm server: config plus the reqwest client reused
/// across grid fan-outs.
pub struct StormState {
    pub config: StormConfig,
    pub http: reqwest::Client,
}

impl StormState {
    pub fn new(config: StormConfig) -> Arc<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Arc::new(Self { config, http })
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.data_dir)
    }
}
