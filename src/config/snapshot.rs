use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;
use crate::utils::validation::validate_positive_number;
use crate::Result;

/// TOML configuration for the snapshot refresh scheduler. The command is the
/// external meteorological tool that writes a new timestamped snapshot
/// directory on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotToml {
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub refresh_minutes: u64,
    pub command: Vec<String>,
    pub working_dir: Option<String>,
}

impl SnapshotToml {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        let config: Self =
            toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;
        config.validate_config()?;
        Ok(config)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number(
            "scheduler.refresh_minutes",
            self.scheduler.refresh_minutes as usize,
            1,
        )?;

        if self.scheduler.enabled && self.scheduler.command.is_empty() {
            return Err(AppError::MissingConfig {
                field: "scheduler.command".to_string(),
            });
        }

        Ok(())
    }
}

/// Replaces `${VAR_NAME}` placeholders with environment values; unknown
/// variables are left as-is so the error surfaces at command spawn time.
fn substitute_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}
