use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::core::stats;
use crate::domain::model::Session;
use crate::state::CateringState;
use crate::utils::error::AppError;
use crate::{store, Result};

pub async fn all_sessions(
    State(state): State<Arc<CateringState>>,
) -> Result<Json<BTreeMap<String, Session>>> {
    let sessions = store::load_sessions(&state.data_dir()).await?;
    Ok(Json(store::sessions_by_id(sessions)))
}

pub async fn session_details(
    State(state): State<Arc<CateringState>>,
    Path(sesion_id): Path<String>,
) -> Result<Json<Session>> {
    let sessions = store::load_sessions(&state.data_dir()).await?;

    store::sessions_by_id(sessions)
        .remove(&sesion_id)
        .map(Json)
        .ok_or(AppError::NotFound {
            what: "Session",
            id: sesion_id,
        })
}

pub async fn operator_sessions(
    State(state): State<Arc<CateringState>>,
    Path(nombre_operario): Path<String>,
) -> Result<Json<BTreeMap<String, Session>>> {
    let sessions = store::load_sessions(&state.data_dir()).await?;

    let own: BTreeMap<String, Session> = sessions
        .into_iter()
        .filter(|s| s.operator_name == nombre_operario)
        .map(|s| (s.id.clone(), s))
        .collect();

    if own.is_empty() {
        return Err(AppError::NotFound {
            what: "Sessions for operator",
            id: nombre_operario,
        });
    }

    Ok(Json(own))
}

pub async fn general_stats(State(state): State<Arc<CateringState>>) -> Result<Json<Value>> {
    let sessions = store::load_sessions(&state.data_dir()).await?;

    if sessions.is_empty() {
        return Ok(Json(json!({ "message": "No hay datos disponibles" })));
    }

    let statistics = stats::general_statistics(&sessions);
    Ok(Json(serde_json::to_value(statistics)?))
}

pub async fn operator_location(
    State(state): State<Arc<CateringState>>,
    Path(nombre_operario): Path<String>,
) -> Result<Json<stats::OperatorLocation>> {
    let sessions = store::load_sessions(&state.data_dir()).await?;

    stats::operator_location(&sessions, &nombre_operario)
        .map(Json)
        .ok_or(AppError::NotFound {
            what: "Operator",
            id: nombre_operario,
        })
}

pub async fn city_stats(
    State(state): State<Arc<CateringState>>,
    Path(ciudad): Path<String>,
) -> Result<Json<stats::CityStatistics>> {
    let sessions = store::load_sessions(&state.data_dir()).await?;

    stats::city_statistics(&sessions, &ciudad)
        .map(Json)
        .ok_or(AppError::NotFound {
            what: "City",
            id: ciudad,
        })
}

pub async fn crew_recommendation(
    State(state): State<Arc<CateringState>>,
    Path(flight_id): Path<String>,
) -> Result<Json<stats::FlightCrewRecommendation>> {
    let flights = store::load_flights(&state.data_dir()).await?;
    let flight = flights
        .into_iter()
        .find(|f| f.flight_id == flight_id)
        .ok_or(AppError::NotFound {
            what: "Flight",
            id: flight_id,
        })?;

    let sessions = store::load_sessions(&state.data_dir()).await?;
    Ok(Json(stats::recommend_crew(&sessions, &flight)))
}
