use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::predictor;
use crate::domain::model::CateringProduct;
use crate::state::CateringState;
use crate::utils::error::AppError;
use crate::{store, Result};

pub async fn flight_recommendation(
    State(state): State<Arc<CateringState>>,
    Path(flight_id): Path<String>,
) -> Result<Json<predictor::FlightRecommendation>> {
    let flights = store::load_flights(&state.data_dir()).await?;
    let flight = flights
        .into_iter()
        .find(|f| f.flight_id == flight_id)
        .ok_or(AppError::NotFound {
            what: "Flight",
            id: flight_id,
        })?;

    let guard = state.model.read().await;
    let model = guard.as_ref().ok_or(AppError::ModelNotReady)?;

    // The planned load is one unit per sold ticket.
    let predicted = model.predict_units(flight.duration, flight.tickets_sold, flight.tickets_sold);

    Ok(Json(predictor::flight_recommendation(
        &flight,
        predicted,
        model.confidence_level(),
    )))
}

/// Prototype consumption table from the demo days. Unknown flights fall
/// back to the default flight's products instead of a 404.
pub async fn flight_products(Path(flight_id): Path<String>) -> Json<Vec<CateringProduct>> {
    tracing::debug!("Serving prototype product table for flight {}", flight_id);
    Json(default_flight_products())
}

fn default_flight_products() -> Vec<CateringProduct> {
    vec![
        CateringProduct {
            product_id: "BEV001",
            product_name: "Coca-Cola",
            unit_cost: 1.5,
            reusable_flag: false,
            food_type: "beverage",
            standard_quantity: 350,
            units_returned: 45,
            units_consumed: 305,
            suggested_units: 320,
            overload_units: 30,
        },
        CateringProduct {
            product_id: "MEAL001",
            product_name: "Chicken Pasta",
            unit_cost: 8.5,
            reusable_flag: false,
            food_type: "main meal",
            standard_quantity: 280,
            units_returned: 35,
            units_consumed: 245,
            suggested_units: 260,
            overload_units: 20,
        },
        CateringProduct {
            product_id: "SNK001",
            product_name: "Pretzels",
            unit_cost: 2.0,
            reusable_flag: false,
            food_type: "snack",
            standard_quantity: 300,
            units_returned: 55,
            units_consumed: 245,
            suggested_units: 270,
            overload_units: 30,
        },
        CateringProduct {
            product_id: "BEV002",
            product_name: "Coffee",
            unit_cost: 2.5,
            reusable_flag: true,
            food_type: "beverage",
            standard_quantity: 400,
            units_returned: 120,
            units_consumed: 280,
            suggested_units: 300,
            overload_units: 20,
        },
    ]
}
