use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::core::snapshot::{self, Snapshot, SnapshotInfo};
use crate::state::StormState;
use crate::utils::error::AppError;
use crate::Result;

/// Resolves the latest snapshot and runs a filesystem read against it on
/// the blocking pool. Every storm endpoint serves pre-rendered files; the
/// handlers never interpret storm data.
async fn with_latest<T, F>(state: &StormState, read: F) -> Result<T>
where
    F: FnOnce(&Snapshot) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let data_dir = state.data_dir();
    tokio::task::spawn_blocking(move || {
        let latest = snapshot::latest_snapshot(&data_dir)?;
        read(&latest)
    })
    .await
    .map_err(|e| AppError::Internal(format!("snapshot read task failed: {}", e)))?
}

pub async fn latest_info(State(state): State<Arc<StormState>>) -> Result<Json<SnapshotInfo>> {
    let info = with_latest(&state, |latest| Ok(latest.info())).await?;
    Ok(Json(info))
}

pub async fn summary(State(state): State<Arc<StormState>>) -> Result<Json<Value>> {
    let summary = with_latest(&state, snapshot::read_summary).await?;
    Ok(Json(summary))
}

pub async fn storm_details(
    State(state): State<Arc<StormState>>,
    Path(storm_id): Path<String>,
) -> Result<Json<Value>> {
    let details = with_latest(&state, move |latest| {
        snapshot::read_storm(latest, &storm_id)
    })
    .await?;
    Ok(Json(details))
}

pub async fn images(State(state): State<Arc<StormState>>) -> Result<Json<Value>> {
    let names = with_latest(&state, |latest| Ok(latest.map_files())).await?;

    let urls: Vec<String> = names
        .into_iter()
        .map(|name| format!("/storms/maps/{}", name))
        .collect();

    Ok(Json(json!({ "images": urls })))
}

pub async fn map_image(
    State(state): State<Arc<StormState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    let bytes = with_latest(&state, move |latest| snapshot::read_map(latest, &name)).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}
