use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::model::Product;

/// Expiration state bucket derived from a 0-100 freshness score.
/// Thresholds are inclusive lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessStatus {
    Optimo,
    Atencion,
    Critico,
    Expirado,
}

impl FreshnessStatus {
    pub fn from_score(freshness_score: f64) -> Self {
        if freshness_score >= 80.0 {
            FreshnessStatus::Optimo
        } else if freshness_score >= 60.0 {
            FreshnessStatus::Atencion
        } else if freshness_score >= 40.0 {
            FreshnessStatus::Critico
        } else {
            FreshnessStatus::Expirado
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FreshnessStatus::Optimo => "OPTIMO",
            FreshnessStatus::Atencion => "ATENCION",
            FreshnessStatus::Critico => "CRITICO",
            FreshnessStatus::Expirado => "EXPIRADO",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            FreshnessStatus::Optimo => "green",
            FreshnessStatus::Atencion => "yellow",
            FreshnessStatus::Critico => "orange",
            FreshnessStatus::Expirado => "red",
        }
    }

    /// CRITICO and EXPIRADO products count as at-risk in the analysis
    /// endpoints.
    pub fn is_at_risk(&self) -> bool {
        matches!(self, FreshnessStatus::Critico | FreshnessStatus::Expirado)
    }
}

/// Derived expiration fields merged into every product payload. Wire keys
/// are the dashboard's contract.
#[derive(Debug, Clone, Serialize)]
pub struct ExpirationMetrics {
    #[serde(rename = "dias_restantes")]
    pub days_remaining: f64,
    #[serde(rename = "estado_expiracion")]
    pub status: &'static str,
    #[serde(rename = "color_estado")]
    pub color: &'static str,
    #[serde(rename = "fecha_estimada_expiracion")]
    pub estimated_expiration: String,
    #[serde(rename = "porcentaje_vida_util")]
    pub shelf_life_pct: f64,
}

/// Linear decay: the freshness score is the remaining fraction of shelf
/// life, so days remaining is score/100 of the full shelf life. The wire
/// value is rounded to one decimal; the expiration date offset uses the
/// unrounded value.
pub fn expiration_metrics(
    freshness_score: f64,
    shelf_life_days: f64,
    now: DateTime<Utc>,
) -> ExpirationMetrics {
    let days_remaining = (freshness_score / 100.0) * shelf_life_days;
    let status = FreshnessStatus::from_score(freshness_score);

    let estimated_expiration = now + Duration::seconds((days_remaining * 86_400.0) as i64);

    ExpirationMetrics {
        days_remaining: round1(days_remaining),
        status: status.as_str(),
        color: status.color(),
        estimated_expiration: estimated_expiration.format("%Y-%m-%d").to_string(),
        shelf_life_pct: freshness_score,
    }
}

/// Product with its derived expiration fields flattened alongside, the
/// `{**product, **metrics}` merge the dashboard expects.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(flatten)]
    pub expiration: ExpirationMetrics,
}

pub fn enrich(product: Product, now: DateTime<Utc>) -> EnrichedProduct {
    let expiration = expiration_metrics(product.freshness_score, product.shelf_life_days, now);
    EnrichedProduct {
        product,
        expiration,
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_bucket_boundaries() {
        assert_eq!(FreshnessStatus::from_score(100.0), FreshnessStatus::Optimo);
        assert_eq!(FreshnessStatus::from_score(80.0), FreshnessStatus::Optimo);
        assert_eq!(FreshnessStatus::from_score(79.9), FreshnessStatus::Atencion);
        assert_eq!(FreshnessStatus::from_score(60.0), FreshnessStatus::Atencion);
        assert_eq!(FreshnessStatus::from_score(59.9), FreshnessStatus::Critico);
        assert_eq!(FreshnessStatus::from_score(40.0), FreshnessStatus::Critico);
        assert_eq!(FreshnessStatus::from_score(39.9), FreshnessStatus::Expirado);
        assert_eq!(FreshnessStatus::from_score(0.0), FreshnessStatus::Expirado);
    }

    #[test]
    fn test_at_risk_classification() {
        assert!(!FreshnessStatus::Optimo.is_at_risk());
        assert!(!FreshnessStatus::Atencion.is_at_risk());
        assert!(FreshnessStatus::Critico.is_at_risk());
        assert!(FreshnessStatus::Expirado.is_at_risk());
    }

    #[test]
    fn test_days_remaining_arithmetic() {
        let now = Utc.with_ymd_and_hms(2025, 10, 24, 12, 0, 0).unwrap();

        let metrics = expiration_metrics(50.0, 10.0, now);
        assert_eq!(metrics.days_remaining, 5.0);
        assert_eq!(metrics.status, "CRITICO");
        assert_eq!(metrics.color, "orange");
        assert_eq!(metrics.estimated_expiration, "2025-10-29");
        assert_eq!(metrics.shelf_life_pct, 50.0);
    }

    #[test]
    fn test_days_remaining_is_rounded_to_one_decimal() {
        let now = Utc.with_ymd_and_hms(2025, 10, 24, 12, 0, 0).unwrap();

        // 33.333% of 7 days = 2.333... -> 2.3 on the wire.
        let metrics = expiration_metrics(33.333, 7.0, now);
        assert_eq!(metrics.days_remaining, 2.3);
    }

    #[test]
    fn test_zero_shelf_life_expires_today() {
        let now = Utc.with_ymd_and_hms(2025, 10, 24, 12, 0, 0).unwrap();

        let metrics = expiration_metrics(90.0, 0.0, now);
        assert_eq!(metrics.days_remaining, 0.0);
        assert_eq!(metrics.estimated_expiration, "2025-10-24");
    }

    #[test]
    fn test_fractional_days_shift_the_expiration_date() {
        // 23:00 + 0.1 * 10 days = one day later, crossing midnight.
        let now = Utc.with_ymd_and_hms(2025, 10, 24, 23, 0, 0).unwrap();

        let metrics = expiration_metrics(10.0, 10.0, now);
        assert_eq!(metrics.days_remaining, 1.0);
        assert_eq!(metrics.estimated_expiration, "2025-10-25");
    }
}
