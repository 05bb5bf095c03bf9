use chrono::Utc;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Grid bounds covering Mexico, as [lon, lat] corners.
pub const MEXICO_SW: [f64; 2] = [-118.0, 14.5];
pub const MEXICO_NE: [f64; 2] = [-86.5, 32.75];

#[derive(Debug, Clone)]
pub struct GridPoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Evenly spaced `grid_size` x `grid_size` points over the Mexico bounds,
/// row-major from the southwest corner. A 1x1 grid degenerates to the SW
/// corner itself.
pub fn generate_grid_points(grid_size: usize) -> Vec<GridPoint> {
    let [min_lon, min_lat] = MEXICO_SW;
    let [max_lon, max_lat] = MEXICO_NE;

    let (lon_step, lat_step) = if grid_size > 1 {
        let steps = (grid_size - 1) as f64;
        ((max_lon - min_lon) / steps, (max_lat - min_lat) / steps)
    } else {
        (0.0, 0.0)
    };

    let mut points = Vec::with_capacity(grid_size * grid_size);
    for row in 0..grid_size {
        for col in 0..grid_size {
            points.push(GridPoint {
                name: format!("Grid_{}_{}", row, col),
                lat: round4(min_lat + row as f64 * lat_step),
                lon: round4(min_lon + col as f64 * lon_step),
            });
        }
    }

    points
}

pub fn weather_status(rain: f64, cloud_cover: f64) -> &'static str {
    if rain > 5.0 {
        "Heavy rain"
    } else if rain > 1.0 {
        "Light rain"
    } else if rain > 0.0 {
        "Drizzle"
    } else if cloud_cover > 70.0 {
        "Cloudy"
    } else if cloud_cover > 30.0 {
        "Partly cloudy"
    } else {
        "Clear"
    }
}

pub fn weather_icon(status: &str) -> &'static str {
    let lower = status.to_lowercase();
    if lower.contains("rain") || lower.contains("drizzle") {
        "🌧️"
    } else if lower.contains("thunder") {
        "⛈️"
    } else if lower.contains("cloud") {
        if status == "Cloudy" {
            "☁️"
        } else {
            "⛅"
        }
    } else if lower.contains("clear") {
        "☀️"
    } else {
        "❓"
    }
}

#[derive(Debug, Serialize)]
pub struct GridPointWeather {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
    pub rain: f64,
    pub cloud_cover: f64,
    pub status: &'static str,
    pub icon: &'static str,
    pub display_text: String,
    pub last_updated: String,
}

#[derive(Debug, Serialize)]
pub struct Bounds {
    pub southwest: [f64; 2],
    pub northeast: [f64; 2],
}

#[derive(Debug, Serialize)]
pub struct GridForecast {
    pub grid_size: usize,
    pub total_points: usize,
    pub bounds: Bounds,
    pub data: Vec<GridPointWeather>,
}

/// Subset of the Open-Meteo forecast response this server reads.
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: Option<Hourly>,
}

#[derive(Debug, Deserialize, Default)]
struct Hourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<f64>,
    #[serde(default)]
    rain: Vec<f64>,
    #[serde(default)]
    cloud_cover: Vec<f64>,
}

/// Fetches the first forecast hour for every grid point. Points without
/// hourly data are skipped; any transport or HTTP failure aborts the whole
/// fan-out. Output keeps row-major grid order regardless of completion
/// order.
pub async fn fetch_grid(
    client: &Client,
    base_url: &str,
    grid_size: usize,
    concurrent_requests: usize,
) -> Result<GridForecast> {
    let points = generate_grid_points(grid_size);
    let total_points = points.len();
    let last_updated = Utc::now().to_rfc3339();

    let requests = points.into_iter().map(|point| {
        let client = client.clone();
        let base_url = base_url.to_string();
        let last_updated = last_updated.clone();
        async move { fetch_point(&client, &base_url, point, &last_updated).await }
    });

    let results: Vec<Result<Option<GridPointWeather>>> = futures::stream::iter(requests)
        .buffered(concurrent_requests.max(1))
        .collect()
        .await;

    let mut data = Vec::with_capacity(total_points);
    for result in results {
        if let Some(weather) = result? {
            data.push(weather);
        }
    }

    tracing::debug!(
        "Weather grid fetched: {}/{} points reported data",
        data.len(),
        total_points
    );

    Ok(GridForecast {
        grid_size,
        total_points,
        bounds: Bounds {
            southwest: MEXICO_SW,
            northeast: MEXICO_NE,
        },
        data,
    })
}

async fn fetch_point(
    client: &Client,
    base_url: &str,
    point: GridPoint,
    last_updated: &str,
) -> Result<Option<GridPointWeather>> {
    let url = format!("{}/v1/forecast", base_url.trim_end_matches('/'));

    let response = client
        .get(&url)
        .query(&[
            ("latitude", point.lat.to_string()),
            ("longitude", point.lon.to_string()),
            ("hourly", "temperature_2m,rain,cloud_cover".to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", "1".to_string()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let forecast: ForecastResponse = response.json().await?;

    let hourly = match forecast.hourly {
        Some(hourly) if !hourly.time.is_empty() => hourly,
        _ => {
            tracing::debug!("No hourly data for point {}", point.name);
            return Ok(None);
        }
    };

    // First entry is the current hour.
    let temperature = hourly.temperature_2m.first().copied().unwrap_or(0.0);
    let rain = hourly.rain.first().copied().unwrap_or(0.0);
    let cloud_cover = hourly.cloud_cover.first().copied().unwrap_or(0.0);

    let status = weather_status(rain, cloud_cover);
    let icon = weather_icon(status);

    Ok(Some(GridPointWeather {
        display_text: format!("{} {}: {}°C - {}", icon, point.name, temperature, status),
        id: point.name,
        latitude: point.lat,
        longitude: point.lon,
        temperature,
        rain,
        cloud_cover,
        status,
        icon,
        last_updated: last_updated.to_string(),
    }))
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
