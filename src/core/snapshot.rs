use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use glob::glob;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::snapshot::SchedulerConfig;
use crate::utils::error::AppError;
use crate::Result;

/// Subdirectory names inside a snapshot, fixed by the external storm tool.
pub const MAPS_SUBDIR: &str = "Mapas";
pub const JSON_SUBDIR: &str = "JSON";

/// Snapshot directories are named `YYYYMMDD_HHMMSS`. The name is only a
/// filter; freshness is decided by modification time.
static SNAPSHOT_DIR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{8}_\d{6}$").expect("snapshot dir pattern is valid"));

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub dir: PathBuf,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct SnapshotInfo {
    pub timestamp: String,
    pub maps: usize,
    pub json_files: usize,
}

/// Resolves the most recently written snapshot under `data_dir`: glob the
/// tree, keep timestamp-named directories, take the max modification time.
/// Unreadable entries are skipped with a warning.
pub fn latest_snapshot(data_dir: &Path) -> Result<Snapshot> {
    let pattern = format!("{}/*", data_dir.display());
    let mut best: Option<(SystemTime, Snapshot)> = None;

    for entry in glob(&pattern).map_err(|e| AppError::ConfigError {
        message: format!("invalid snapshot glob pattern: {}", e),
    })? {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Cannot read snapshot entry: {}", e);
                continue;
            }
        };

        if !path.is_dir() {
            continue;
        }

        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        if !SNAPSHOT_DIR_PATTERN.is_match(name) {
            continue;
        }

        let modified = match path.metadata().and_then(|m| m.modified()) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Cannot stat snapshot {}: {}", path.display(), e);
                continue;
            }
        };

        let candidate = Snapshot {
            timestamp: name.to_string(),
            dir: path,
        };

        match &best {
            Some((current, _)) if modified <= *current => {}
            _ => best = Some((modified, candidate)),
        }
    }

    best.map(|(_, snapshot)| snapshot)
        .ok_or(AppError::NoSnapshots)
}

impl Snapshot {
    pub fn summary_path(&self) -> PathBuf {
        self.dir
            .join(JSON_SUBDIR)
            .join(format!("tormentas{}.json", self.timestamp))
    }

    pub fn storm_json_path(&self, storm_id: &str) -> PathBuf {
        self.dir
            .join(JSON_SUBDIR)
            .join(format!("tormenta_{}.json", storm_id))
    }

    pub fn map_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(MAPS_SUBDIR).join(file_name)
    }

    /// File names of every rendered map in this snapshot, sorted.
    pub fn map_files(&self) -> Vec<String> {
        list_files(&self.dir.join(MAPS_SUBDIR), "png")
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            timestamp: self.timestamp.clone(),
            maps: self.map_files().len(),
            json_files: list_files(&self.dir.join(JSON_SUBDIR), "json").len(),
        }
    }
}

fn list_files(dir: &Path, extension: &str) -> Vec<String> {
    let pattern = format!("{}/*.{}", dir.display(), extension);
    let mut names: Vec<String> = match glob(&pattern) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(String::from)
            })
            .collect(),
        Err(e) => {
            tracing::warn!("Invalid listing pattern for {}: {}", dir.display(), e);
            Vec::new()
        }
    };
    names.sort();
    names
}

/// Rejects file name parameters that could walk out of the snapshot tree.
pub fn validate_file_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(AppError::BadRequest {
            message: format!("invalid file name: {}", name),
        });
    }
    Ok(())
}

pub fn read_summary(snapshot: &Snapshot) -> Result<serde_json::Value> {
    read_json(&snapshot.summary_path(), "Storm summary", &snapshot.timestamp)
}

pub fn read_storm(snapshot: &Snapshot, storm_id: &str) -> Result<serde_json::Value> {
    validate_file_name(storm_id)?;
    read_json(&snapshot.storm_json_path(storm_id), "Storm", storm_id)
}

fn read_json(path: &Path, what: &'static str, id: &str) -> Result<serde_json::Value> {
    if !path.exists() {
        return Err(AppError::NotFound {
            what,
            id: id.to_string(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn read_map(snapshot: &Snapshot, file_name: &str) -> Result<Vec<u8>> {
    validate_file_name(file_name)?;

    let path = snapshot.map_path(file_name);
    if !path.exists() {
        return Err(AppError::NotFound {
            what: "Map",
            id: file_name.to_string(),
        });
    }

    Ok(std::fs::read(path)?)
}

/// Periodically shells out to the external meteorological tool that writes
/// a fresh snapshot directory. Failures are logged, never propagated; the
/// serving path keeps working from whatever snapshots already exist.
pub async fn run_refresher(scheduler: SchedulerConfig) {
    let period = Duration::from_secs(scheduler.refresh_minutes * 60);
    let mut interval = tokio::time::interval(period);

    tracing::info!(
        "Snapshot refresher running `{}` every {} minutes",
        scheduler.command.join(" "),
        scheduler.refresh_minutes
    );

    loop {
        interval.tick().await;

        let mut command = tokio::process::Command::new(&scheduler.command[0]);
        command.args(&scheduler.command[1..]);
        if let Some(dir) = &scheduler.working_dir {
            command.current_dir(dir);
        }

        match command.output().await {
            Ok(output) if output.status.success() => {
                tracing::info!("Snapshot refresh completed");
            }
            Ok(output) => {
                tracing::warn!(
                    "Snapshot refresh exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
            }
            Err(e) => {
                tracing::warn!("Snapshot refresh failed to start: {}", e);
            }
        }
    }
}
