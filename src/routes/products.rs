use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::freshness::{enrich, round2, EnrichedProduct, FreshnessStatus};
use crate::state::CateringState;
use crate::utils::error::AppError;
use crate::{store, Result};

async fn load_enriched(state: &CateringState) -> Result<Vec<EnrichedProduct>> {
    let now = Utc::now();
    let products = store::load_products(&state.data_dir()).await?;
    Ok(products.into_iter().map(|p| enrich(p, now)).collect())
}

pub async fn products_root() -> Json<Value> {
    Json(json!({ "message": "Ruta Products Management funcionando correctamente" }))
}

pub async fn all_products(State(state): State<Arc<CateringState>>) -> Result<Json<Value>> {
    let enriched = load_enriched(&state).await?;

    Ok(Json(json!({
        "total_products": enriched.len(),
        "products": enriched,
    })))
}

pub async fn product_details(
    State(state): State<Arc<CateringState>>,
    Path(product_id): Path<String>,
) -> Result<Json<EnrichedProduct>> {
    let enriched = load_enriched(&state).await?;

    enriched
        .into_iter()
        .find(|p| p.product.product_id == product_id)
        .map(Json)
        .ok_or(AppError::NotFound {
            what: "Producto",
            id: product_id,
        })
}

#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    pub threshold_days: Option<i64>,
    pub estado: Option<String>,
    pub categoria: Option<String>,
}

pub async fn expiration_alerts(
    State(state): State<Arc<CateringState>>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<Value>> {
    let threshold_days = query.threshold_days.unwrap_or(7);

    let mut alerts: Vec<EnrichedProduct> = load_enriched(&state)
        .await?
        .into_iter()
        .filter(|p| p.expiration.days_remaining <= threshold_days as f64)
        .filter(|p| {
            query
                .estado
                .as_deref()
                .map_or(true, |estado| p.expiration.status == estado)
        })
        .filter(|p| {
            query
                .categoria
                .as_deref()
                .map_or(true, |categoria| p.product.category == categoria)
        })
        .collect();

    // Most urgent first.
    alerts.sort_by(|a, b| {
        a.expiration
            .days_remaining
            .partial_cmp(&b.expiration.days_remaining)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(Json(json!({
        "threshold_days": threshold_days,
        "total_alerts": alerts.len(),
        "alerts": alerts,
    })))
}

#[derive(Debug, Serialize)]
struct GroupStats {
    total_products: usize,
    avg_freshness_score: f64,
    products_at_risk: usize,
    products_expired: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    products: Vec<EnrichedProduct>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    categories: BTreeSet<String>,
}

impl GroupStats {
    fn new() -> Self {
        Self {
            total_products: 0,
            avg_freshness_score: 0.0,
            products_at_risk: 0,
            products_expired: 0,
            products: Vec::new(),
            categories: BTreeSet::new(),
        }
    }

    fn add(&mut self, product: &EnrichedProduct) {
        let status = FreshnessStatus::from_score(product.product.freshness_score);
        self.total_products += 1;
        self.avg_freshness_score += product.expiration.shelf_life_pct;
        if status.is_at_risk() {
            self.products_at_risk += 1;
        }
        if status == FreshnessStatus::Expirado {
            self.products_expired += 1;
        }
    }

    fn finish(&mut self) {
        if self.total_products > 0 {
            self.avg_freshness_score = round2(self.avg_freshness_score / self.total_products as f64);
        }
    }
}

pub async fn analysis_by_category(
    State(state): State<Arc<CateringState>>,
) -> Result<Json<Value>> {
    let enriched = load_enriched(&state).await?;
    let total_products = enriched.len();

    let mut categories: BTreeMap<String, GroupStats> = BTreeMap::new();
    for product in enriched {
        let entry = categories
            .entry(product.product.category.clone())
            .or_insert_with(GroupStats::new);
        entry.add(&product);
        entry.products.push(product);
    }

    for stats in categories.values_mut() {
        stats.finish();
    }

    let total_at_risk: usize = categories.values().map(|c| c.products_at_risk).sum();
    let total_expired: usize = categories.values().map(|c| c.products_expired).sum();

    Ok(Json(json!({
        "analysis_by_category": categories,
        "summary": {
            "total_categories": categories.len(),
            "total_products": total_products,
            "total_at_risk": total_at_risk,
            "total_expired": total_expired,
        },
    })))
}

pub async fn analysis_by_airline(State(state): State<Arc<CateringState>>) -> Result<Json<Value>> {
    let enriched = load_enriched(&state).await?;

    let mut airlines: BTreeMap<String, GroupStats> = BTreeMap::new();
    for product in enriched {
        let entry = airlines
            .entry(product.product.airline.clone())
            .or_insert_with(GroupStats::new);
        entry.add(&product);
        entry.categories.insert(product.product.category.clone());
    }

    for stats in airlines.values_mut() {
        stats.finish();
    }

    let highest = airlines
        .iter()
        .max_by(|a, b| {
            a.1.avg_freshness_score
                .partial_cmp(&b.1.avg_freshness_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(name, _)| name.clone());
    let lowest = airlines
        .iter()
        .min_by(|a, b| {
            a.1.avg_freshness_score
                .partial_cmp(&b.1.avg_freshness_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(name, _)| name.clone());

    Ok(Json(json!({
        "analysis_by_airline": airlines,
        "summary": {
            "total_airlines": airlines.len(),
            "highest_freshness_airline": highest,
            "lowest_freshness_airline": lowest,
        },
    })))
}

pub async fn rotation_priority(State(state): State<Arc<CateringState>>) -> Result<Json<Value>> {
    let mut enriched = load_enriched(&state).await?;

    // Lowest freshness first, so each bucket leads with its most critical
    // products.
    enriched.sort_by(|a, b| {
        a.product
            .freshness_score
            .partial_cmp(&b.product.freshness_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut high: Vec<EnrichedProduct> = Vec::new();
    let mut medium: Vec<EnrichedProduct> = Vec::new();
    let mut low: Vec<EnrichedProduct> = Vec::new();
    for product in enriched {
        let score = product.product.freshness_score;
        if score < 60.0 {
            high.push(product);
        } else if score < 80.0 {
            medium.push(product);
        } else {
            low.push(product);
        }
    }

    let (high_count, medium_count, low_count) = (high.len(), medium.len(), low.len());
    high.truncate(10);
    medium.truncate(10);
    low.truncate(10);

    Ok(Json(json!({
        "rotation_priority": {
            "high_priority": { "count": high_count, "products": high },
            "medium_priority": { "count": medium_count, "products": medium },
            "low_priority": { "count": low_count, "products": low },
        },
        "recommendations": {
            "immediate_action": format!("Rotar {} productos de alta prioridad", high_count),
            "monitor": format!("Vigilar {} productos de prioridad media", medium_count),
            "stable": format!("{} productos en estado estable", low_count),
        },
    })))
}

pub async fn dashboard_stats(State(state): State<Arc<CateringState>>) -> Result<Json<Value>> {
    let products = store::load_products(&state.data_dir()).await?;

    let total_products = products.len();
    let categories: BTreeSet<&str> = products.iter().map(|p| p.category.as_str()).collect();
    let airlines: BTreeSet<&str> = products.iter().map(|p| p.airline.as_str()).collect();

    let mut status_counts: BTreeMap<&'static str, usize> = BTreeMap::from([
        ("OPTIMO", 0),
        ("ATENCION", 0),
        ("CRITICO", 0),
        ("EXPIRADO", 0),
    ]);
    let mut freshness_sum = 0.0;
    for product in &products {
        let status = FreshnessStatus::from_score(product.freshness_score);
        *status_counts.entry(status.as_str()).or_insert(0) += 1;
        freshness_sum += product.freshness_score;
    }

    let avg_freshness = if total_products > 0 {
        round2(freshness_sum / total_products as f64)
    } else {
        0.0
    };
    let immediate_attention = status_counts["CRITICO"] + status_counts["EXPIRADO"];

    Ok(Json(json!({
        "overview": {
            "total_products": total_products,
            "total_categories": categories.len(),
            "total_airlines": airlines.len(),
            "avg_freshness_score": avg_freshness,
        },
        "status_distribution": status_counts,
        "alerts": {
            "immediate_attention": immediate_attention,
            "attention_required": status_counts["ATENCION"],
            "stable": status_counts["OPTIMO"],
        },
    })))
}
