use std::fs;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use clap::Parser;
use httpmock::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use galley_backend::routes;
use galley_backend::state::StormState;
use galley_backend::StormConfig;

fn make_snapshot(root: &Path, timestamp: &str) -> PathBuf {
    let dir = root.join(timestamp);
    fs::create_dir_all(dir.join("Mapas")).unwrap();
    fs::create_dir_all(dir.join("JSON")).unwrap();

    fs::write(
        dir.join("JSON").join(format!("tormentas{}.json", timestamp)),
        json!({
            "0": {
                "id": "al052025",
                "name": "ALEX",
                "basin": "north_atlantic",
                "max_wind": 120,
                "min_pressure": 952
            }
        })
        .to_string(),
    )
    .unwrap();
    fs::write(
        dir.join("JSON").join("tormenta_al052025.json"),
        json!({ "id": "al052025", "name": "ALEX", "ace": 14.2 }).to_string(),
    )
    .unwrap();

    fs::write(
        dir.join("Mapas").join(format!("mapa_{}.png", timestamp)),
        b"overview-map-bytes",
    )
    .unwrap();
    fs::write(dir.join("Mapas").join("al052025.png"), b"storm-map-bytes").unwrap();

    dir
}

fn test_app_with(data_dir: &Path, open_meteo_url: &str) -> Router {
    let config = StormConfig::parse_from([
        "storm-server",
        "--data-dir",
        data_dir.to_str().unwrap(),
        "--open-meteo-url",
        open_meteo_url,
        "--concurrent-requests",
        "4",
        "--request-timeout-secs",
        "5",
    ]);
    routes::storm_router(StormState::new(config))
}

fn test_app(data_dir: &Path) -> Router {
    test_app_with(data_dir, "https://api.open-meteo.com")
}

async fn get_response(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get_response(app, uri).await;
    let json = serde_json::from_slice(&bytes)
        .unwrap_or(Value::String(String::from_utf8_lossy(&bytes).to_string()));
    (status, json)
}

#[tokio::test]
async fn test_root_message() {
    let dir = TempDir::new().unwrap();
    let app = test_app(dir.path());

    let (status, body) = get_json(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Weather API running");
}

#[tokio::test]
async fn test_latest_snapshot_info() {
    let dir = TempDir::new().unwrap();
    make_snapshot(dir.path(), "20251020_120000");
    std::thread::sleep(std::time::Duration::from_millis(20));
    make_snapshot(dir.path(), "20251021_090000");

    let app = test_app(dir.path());
    let (status, body) = get_json(&app, "/storms/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timestamp"], "20251021_090000");
    assert_eq!(body["maps"], 2);
    assert_eq!(body["json_files"], 2);
}

#[tokio::test]
async fn test_summary_served_from_latest_snapshot() {
    let dir = TempDir::new().unwrap();
    make_snapshot(dir.path(), "20251020_120000");

    let app = test_app(dir.path());
    let (status, body) = get_json(&app, "/storms/json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["0"]["name"], "ALEX");
    assert_eq!(body["0"]["max_wind"], 120);
}

#[tokio::test]
async fn test_storm_details_and_404() {
    let dir = TempDir::new().unwrap();
    make_snapshot(dir.path(), "20251020_120000");

    let app = test_app(dir.path());
    let (status, body) = get_json(&app, "/storms/al052025/json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ace"], 14.2);

    let (status, _) = get_json(&app, "/storms/ep999999/json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_images_list_urls() {
    let dir = TempDir::new().unwrap();
    make_snapshot(dir.path(), "20251020_120000");

    let app = test_app(dir.path());
    let (status, body) = get_json(&app, "/storms/images").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["images"],
        json!([
            "/storms/maps/al052025.png",
            "/storms/maps/mapa_20251020_120000.png"
        ])
    );
}

#[tokio::test]
async fn test_map_bytes_with_png_content_type() {
    let dir = TempDir::new().unwrap();
    make_snapshot(dir.path(), "20251020_120000");

    let app = test_app(dir.path());
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/storms/maps/al052025.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"storm-map-bytes");

    let (status, _) = get_response(&app, "/storms/maps/missing.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_no_snapshots_is_404() {
    let dir = TempDir::new().unwrap();
    let app = test_app(dir.path());

    for uri in ["/storms/latest", "/storms/json", "/storms/images"] {
        let (status, _) = get_response(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {}", uri);
    }
}

fn forecast_body(temperature: f64, rain: f64, cloud_cover: f64) -> Value {
    json!({
        "hourly": {
            "time": ["2025-10-24T00:00", "2025-10-24T01:00"],
            "temperature_2m": [temperature, temperature + 1.0],
            "rain": [rain, 0.0],
            "cloud_cover": [cloud_cover, cloud_cover]
        }
    })
}

#[tokio::test]
async fn test_weather_grid_fan_out() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let forecast_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/forecast");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(forecast_body(24.5, 2.5, 80.0));
    });

    let app = test_app_with(dir.path(), &server.base_url());
    let (status, body) = get_json(&app, "/rainmap?grid_size=2").await;

    assert_eq!(status, StatusCode::OK);
    forecast_mock.assert_hits(4);

    assert_eq!(body["grid_size"], 2);
    assert_eq!(body["total_points"], 4);
    assert_eq!(body["bounds"]["southwest"], json!([-118.0, 14.5]));

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    // Row-major order is preserved regardless of completion order.
    assert_eq!(data[0]["id"], "Grid_0_0");
    assert_eq!(data[3]["id"], "Grid_1_1");
    assert_eq!(data[0]["temperature"], 24.5);
    assert_eq!(data[0]["rain"], 2.5);
    assert_eq!(data[0]["status"], "Light rain");
    assert_eq!(data[0]["icon"], "🌧️");
}

#[tokio::test]
async fn test_weather_grid_served_on_predict_too() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/v1/forecast");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(forecast_body(18.0, 0.0, 10.0));
    });

    let app = test_app_with(dir.path(), &server.base_url());
    let (status, body) = get_json(&app, "/predict?grid_size=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_points"], 1);
    assert_eq!(body["data"][0]["status"], "Clear");
    assert_eq!(body["data"][0]["icon"], "☀️");
}

#[tokio::test]
async fn test_weather_grid_skips_points_without_hourly_data() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/v1/forecast");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({ "hourly": { "time": [] } }));
    });

    let app = test_app_with(dir.path(), &server.base_url());
    let (status, body) = get_json(&app, "/rainmap?grid_size=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_points"], 4);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_weather_upstream_failure_is_error_body() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/v1/forecast");
        then.status(500);
    });

    let app = test_app_with(dir.path(), &server.base_url());
    let (status, body) = get_json(&app, "/rainmap?grid_size=2").await;

    // Upstream failure surfaces as a 200 with an error body, not a 5xx.
    assert_eq!(status, StatusCode::OK);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Weather API request failed"));
}

#[tokio::test]
async fn test_weather_grid_size_validated() {
    let dir = TempDir::new().unwrap();
    let app = test_app(dir.path());

    let (status, _) = get_response(&app, "/rainmap?grid_size=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_response(&app, "/rainmap?grid_size=41").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
