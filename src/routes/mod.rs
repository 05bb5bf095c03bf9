pub mod flights;
pub mod prediction;
pub mod products;
pub mod productivity;
pub mod storms;
pub mod weather;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::{CateringState, StormState};

async fn catering_root() -> Json<Value> {
    Json(json!({ "message": "Backend funcionando correctamente 🚀" }))
}

async fn storm_root() -> Json<Value> {
    Json(json!({ "message": "Weather API running" }))
}

async fn health_check() -> String {
    "ok".to_string()
}

pub fn catering_router(state: Arc<CateringState>) -> Router {
    Router::new()
        .route("/", get(catering_root))
        .route("/health", get(health_check))
        .route("/data/", get(flights::list_flights))
        .route("/data/{flight_id}", get(flights::flight_details))
        .route("/products/", get(products::products_root))
        .route("/products/all", get(products::all_products))
        .route("/products/alerts/expiration", get(products::expiration_alerts))
        .route("/products/analysis/category", get(products::analysis_by_category))
        .route("/products/analysis/airline", get(products::analysis_by_airline))
        .route("/products/priority/rotation", get(products::rotation_priority))
        .route("/products/dashboard/stats", get(products::dashboard_stats))
        .route("/products/{product_id}", get(products::product_details))
        .route("/productivity/", get(productivity::all_sessions))
        .route(
            "/productivity/estadisticas/generales",
            get(productivity::general_stats),
        )
        .route(
            "/productivity/operario/{nombre_operario}",
            get(productivity::operator_sessions),
        )
        .route(
            "/productivity/operario/{nombre_operario}/ubicacion",
            get(productivity::operator_location),
        )
        .route(
            "/productivity/ciudad/{ciudad}/estadisticas",
            get(productivity::city_stats),
        )
        .route(
            "/productivity/recomendacion/vuelo/{flight_id}",
            get(productivity::crew_recommendation),
        )
        .route("/productivity/{sesion_id}", get(productivity::session_details))
        .route(
            "/prediction/flight-recommendation/{flight_id}",
            get(prediction::flight_recommendation),
        )
        .route("/enfoque2/{flight_id}/products", get(prediction::flight_products))
        .with_state(state)
}

pub fn storm_router(state: Arc<StormState>) -> Router {
    Router::new()
        .route("/", get(storm_root))
        .route("/health", get(health_check))
        .route("/predict", get(weather::weather_grid))
        .route("/rainmap", get(weather::weather_grid))
        .route("/storms/latest", get(storms::latest_info))
        .route("/storms/json", get(storms::summary))
        .route("/storms/images", get(storms::images))
        .route("/storms/maps/{name}", get(storms::map_image))
        .route("/storms/{storm_id}/json", get(storms::storm_details))
        .with_state(state)
}
