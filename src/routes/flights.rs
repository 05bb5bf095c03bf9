use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::domain::model::Flight;
use crate::state::CateringState;
use crate::utils::error::AppError;
use crate::{store, Result};

pub async fn list_flights(
    State(state): State<Arc<CateringState>>,
) -> Result<Json<BTreeMap<String, Flight>>> {
    let flights = store::load_flights(&state.data_dir()).await?;
    Ok(Json(store::flights_by_id(flights)))
}

pub async fn flight_details(
    State(state): State<Arc<CateringState>>,
    Path(flight_id): Path<String>,
) -> Result<Json<Flight>> {
    let flights = store::load_flights(&state.data_dir()).await?;

    store::flights_by_id(flights)
        .remove(&flight_id)
        .map(Json)
        .ok_or(AppError::NotFound {
            what: "Flight",
            id: flight_id,
        })
}
