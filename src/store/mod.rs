use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::domain::model::{ConsumptionRecord, Flight, Product, Session};
use crate::utils::error::AppError;
use crate::Result;

pub const FLIGHTS_CSV: &str = "flight_data.csv";
pub const PRODUCTS_CSV: &str = "products_data_augmented.csv";
pub const PRODUCTIVITY_CSV: &str = "productivity_data.csv";
pub const CONSUMPTION_CSV: &str = "consumption_history.csv";

/// Reads a whole CSV file into typed rows. Datasets are small enough that
/// every handler re-reads its file per request, so edits to the CSVs are
/// visible on the next call without a restart.
fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(AppError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("dataset not found: {}", path.display()),
        )));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }

    tracing::debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

async fn read_csv_blocking<T: DeserializeOwned + Send + 'static>(path: PathBuf) -> Result<Vec<T>> {
    tokio::task::spawn_blocking(move || read_csv(&path))
        .await
        .map_err(|e| AppError::Internal(format!("dataset read task failed: {}", e)))?
}

pub async fn load_flights(data_dir: &Path) -> Result<Vec<Flight>> {
    read_csv_blocking(data_dir.join(FLIGHTS_CSV)).await
}

pub async fn load_products(data_dir: &Path) -> Result<Vec<Product>> {
    let rows: Vec<Product> = read_csv_blocking(data_dir.join(PRODUCTS_CSV)).await?;
    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(index, product)| product.with_generated_fields(index))
        .collect())
}

pub async fn load_sessions(data_dir: &Path) -> Result<Vec<Session>> {
    read_csv_blocking(data_dir.join(PRODUCTIVITY_CSV)).await
}

pub async fn load_consumption_history(data_dir: &Path) -> Result<Vec<ConsumptionRecord>> {
    read_csv_blocking(data_dir.join(CONSUMPTION_CSV)).await
}

pub fn flights_by_id(flights: Vec<Flight>) -> BTreeMap<String, Flight> {
    flights
        .into_iter()
        .map(|flight| (flight.flight_id.clone(), flight))
        .collect()
}

pub fn sessions_by_id(sessions: Vec<Session>) -> BTreeMap<String, Session> {
    sessions
        .into_iter()
        .map(|session| (session.id.clone(), session))
        .collect()
}
