use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::freshness::round2;
use crate::domain::model::{Flight, Session};

#[derive(Debug, Serialize)]
pub struct GeneralStatistics {
    #[serde(rename = "estadisticas_generales")]
    pub general: GeneralBlock,
    #[serde(rename = "top_operarios")]
    pub top_operators: Vec<OperatorSummary>,
    #[serde(rename = "distribucion_turnos")]
    pub shift_distribution: ShiftDistribution,
}

#[derive(Debug, Serialize)]
pub struct GeneralBlock {
    #[serde(rename = "total_sesiones")]
    pub total_sessions: usize,
    #[serde(rename = "total_items_recolectados")]
    pub total_items: i64,
    #[serde(rename = "eficiencia_promedio")]
    pub avg_efficiency: f64,
    #[serde(rename = "tasa_items_promedio_por_minuto")]
    pub avg_items_per_minute: f64,
    #[serde(rename = "precision_promedio_deteccion")]
    pub avg_precision: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperatorSummary {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "eficiencia_promedio")]
    pub avg_efficiency: f64,
    #[serde(rename = "total_sesiones")]
    pub total_sessions: usize,
    #[serde(rename = "total_items")]
    pub total_items: i64,
    #[serde(rename = "areas_trabajo")]
    pub work_areas: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ShiftDistribution {
    pub matutino: usize,
    pub vespertino: usize,
}

#[derive(Debug, Serialize)]
pub struct CityStatistics {
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "estadisticas_generales")]
    pub general: CityBlock,
}

#[derive(Debug, Serialize)]
pub struct CityBlock {
    #[serde(rename = "total_operarios")]
    pub total_operators: usize,
    #[serde(rename = "total_sesiones")]
    pub total_sessions: usize,
    #[serde(rename = "eficiencia_promedio")]
    pub avg_efficiency: f64,
}

#[derive(Debug, Serialize)]
pub struct OperatorLocation {
    #[serde(rename = "nombre_operario")]
    pub operator_name: String,
    #[serde(rename = "ciudad")]
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "camaras")]
    pub cameras: Vec<CameraSighting>,
}

#[derive(Debug, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CameraSighting {
    #[serde(rename = "camara_id")]
    pub camera_id: String,
    #[serde(rename = "ubicacion_camara")]
    pub camera_location: String,
}

#[derive(Debug, Serialize)]
pub struct FlightCrewRecommendation {
    pub flight_id: String,
    pub crew_type: &'static str,
    #[serde(rename = "operarios_recomendados")]
    pub recommended_operators: Vec<OperatorSummary>,
}

/// Staffing tier implied by flight duration, in hours. Same thresholds the
/// dashboard uses to label the crew.
pub fn crew_tier(duration_hours: f64) -> &'static str {
    if duration_hours > 3.0 {
        "high"
    } else if duration_hours > 1.5 {
        "medium"
    } else {
        "low"
    }
}

struct OperatorAccumulator {
    total_sessions: usize,
    total_items: i64,
    efficiency_sum: f64,
    work_areas: BTreeSet<String>,
}

/// Per-operator averages over all sessions, best first. Ties keep
/// alphabetical order since the accumulation map is ordered.
pub fn rank_operators(sessions: &[Session]) -> Vec<OperatorSummary> {
    let mut operators: BTreeMap<String, OperatorAccumulator> = BTreeMap::new();

    for session in sessions {
        let entry = operators
            .entry(session.operator_name.clone())
            .or_insert_with(|| OperatorAccumulator {
                total_sessions: 0,
                total_items: 0,
                efficiency_sum: 0.0,
                work_areas: BTreeSet::new(),
            });

        entry.total_sessions += 1;
        entry.total_items += session.total_items;
        entry.efficiency_sum += session.efficiency;
        entry.work_areas.insert(session.work_area.clone());
    }

    let mut ranked: Vec<OperatorSummary> = operators
        .into_iter()
        .map(|(name, acc)| OperatorSummary {
            name,
            avg_efficiency: round2(acc.efficiency_sum / acc.total_sessions as f64),
            total_sessions: acc.total_sessions,
            total_items: acc.total_items,
            work_areas: acc.work_areas.into_iter().collect(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.avg_efficiency
            .partial_cmp(&a.avg_efficiency)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Aggregates every session into the dashboard's general statistics block.
/// Caller guarantees `sessions` is non-empty.
pub fn general_statistics(sessions: &[Session]) -> GeneralStatistics {
    let total_sessions = sessions.len();
    let total_items: i64 = sessions.iter().map(|s| s.total_items).sum();
    let efficiency_sum: f64 = sessions.iter().map(|s| s.efficiency).sum();
    let rate_sum: f64 = sessions.iter().map(|s| s.items_per_minute).sum();
    let precision_sum: f64 = sessions.iter().map(|s| s.avg_precision).sum();

    let mut top_operators = rank_operators(sessions);
    top_operators.truncate(5);

    GeneralStatistics {
        general: GeneralBlock {
            total_sessions,
            total_items,
            avg_efficiency: round2(efficiency_sum / total_sessions as f64),
            avg_items_per_minute: round2(rate_sum / total_sessions as f64),
            avg_precision: round2(precision_sum / total_sessions as f64),
        },
        top_operators,
        shift_distribution: ShiftDistribution {
            matutino: sessions.iter().filter(|s| s.shift == "Matutino").count(),
            vespertino: sessions.iter().filter(|s| s.shift == "Vespertino").count(),
        },
    }
}

/// Statistics for every session recorded in one city, or None when the
/// city never appears.
pub fn city_statistics(sessions: &[Session], city: &str) -> Option<CityStatistics> {
    let in_city: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.city.as_deref() == Some(city))
        .collect();

    if in_city.is_empty() {
        return None;
    }

    let operators: BTreeSet<&str> = in_city.iter().map(|s| s.operator_name.as_str()).collect();
    let efficiency_sum: f64 = in_city.iter().map(|s| s.efficiency).sum();

    Some(CityStatistics {
        city: city.to_string(),
        general: CityBlock {
            total_operators: operators.len(),
            total_sessions: in_city.len(),
            avg_efficiency: round2(efficiency_sum / in_city.len() as f64),
        },
    })
}

/// Where an operator works: city/country from their first session, plus
/// every distinct camera they appeared on.
pub fn operator_location(sessions: &[Session], operator_name: &str) -> Option<OperatorLocation> {
    let own: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.operator_name == operator_name)
        .collect();

    let first = own.first()?;
    let cameras: BTreeSet<CameraSighting> = own
        .iter()
        .map(|s| CameraSighting {
            camera_id: s.camera_id.clone(),
            camera_location: s.camera_location.clone(),
        })
        .collect();

    Some(OperatorLocation {
        operator_name: operator_name.to_string(),
        city: first.city.clone(),
        country: first.country.clone(),
        cameras: cameras.into_iter().collect(),
    })
}

/// Operators recommended for a flight: the longer the flight, the larger
/// and more efficient the crew pulled from the ranking.
pub fn recommend_crew(sessions: &[Session], flight: &Flight) -> FlightCrewRecommendation {
    let crew_type = crew_tier(flight.duration);
    let crew_size = match crew_type {
        "high" => 4,
        "medium" => 3,
        _ => 2,
    };

    let mut recommended_operators = rank_operators(sessions);
    recommended_operators.truncate(crew_size);

    FlightCrewRecommendation {
        flight_id: flight.flight_id.clone(),
        crew_type,
        recommended_operators,
    }
}
