use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::core::weather::fetch_grid;
use crate::state::StormState;
use crate::utils::error::AppError;
use crate::utils::validation::validate_range;

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub grid_size: Option<usize>,
}

/// Current weather over the Mexico grid. Upstream failures come back as a
/// 200 with an `error` body rather than a transport error, so the map
/// screen can render its fallback.
pub async fn weather_grid(
    State(state): State<Arc<StormState>>,
    Query(query): Query<GridQuery>,
) -> Response {
    let grid_size = query.grid_size.unwrap_or(15);
    if let Err(e) = validate_range("grid_size", grid_size, 1, 40) {
        return e.into_response();
    }

    let result = fetch_grid(
        &state.http,
        &state.config.open_meteo_url,
        grid_size,
        state.config.concurrent_requests,
    )
    .await;

    match result {
        Ok(forecast) => Json(forecast).into_response(),
        Err(AppError::ApiError(e)) => {
            tracing::warn!("Weather grid fan-out failed: {}", e);
            Json(json!({ "error": format!("Weather API request failed: {}", e) })).into_response()
        }
        Err(e) => {
            tracing::warn!("Weather grid failed: {}", e);
            Json(json!({ "error": format!("Unexpected error: {}", e) })).into_response()
        }
    }
}
