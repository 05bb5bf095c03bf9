use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::Serialize;

use crate::core::freshness::round2;
use crate::domain::model::{ConsumptionRecord, Flight};
use crate::utils::error::AppError;
use crate::Result;

/// Margin applied on top of the predicted consumption when suggesting how
/// many units to load.
const OVERLOAD_MARGIN: f64 = 1.05;

/// Gradient-boosted regression over past flight services: features are
/// flight duration, tickets sold and planned quantity; the label is how
/// many units were actually consumed. Fitting is entirely the library's
/// job; this type only shapes the data.
pub struct ConsumptionModel {
    model: GBDT,
    samples: usize,
}

impl ConsumptionModel {
    pub fn train(records: &[ConsumptionRecord], iterations: usize, depth: u32) -> Result<Self> {
        if records.is_empty() {
            return Err(AppError::ConfigError {
                message: "consumption history is empty, cannot train".to_string(),
            });
        }

        let mut cfg = Config::new();
        cfg.set_feature_size(3);
        cfg.set_max_depth(depth);
        cfg.set_iterations(iterations);
        cfg.set_shrinkage(0.1);
        cfg.set_loss("SquaredError");
        cfg.set_training_optimization_level(2);

        let mut training: DataVec = records
            .iter()
            .map(|r| {
                Data::new_training_data(
                    vec![r.flight_duration, r.tickets_sold, r.standard_quantity],
                    1.0,
                    r.units_consumed,
                    None,
                )
            })
            .collect();

        let mut model = GBDT::new(&cfg);
        model.fit(&mut training);

        tracing::info!("Consumption model trained on {} flight services", records.len());

        Ok(Self {
            model,
            samples: records.len(),
        })
    }

    pub fn predict_units(&self, duration: f64, tickets_sold: u32, standard_quantity: u32) -> f64 {
        let test = Data::new_test_data(
            vec![
                duration as f32,
                tickets_sold as f32,
                standard_quantity as f32,
            ],
            None,
        );

        let predictions = self.model.predict(&vec![test]);
        f64::from(predictions.first().copied().unwrap_or(0.0)).max(0.0)
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn confidence_level(&self) -> &'static str {
        if self.samples >= 200 {
            "alto"
        } else if self.samples >= 50 {
            "medio"
        } else {
            "bajo"
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlightRecommendation {
    pub flight_id: String,
    pub prediction: PredictionBlock,
    pub metrics: MetricsBlock,
    pub recommendations: RecommendationBlock,
}

#[derive(Debug, Serialize)]
pub struct PredictionBlock {
    pub predicted_consumption: f64,
    pub suggested_units: u32,
    pub overload_units: u32,
    pub total_required: u32,
}

#[derive(Debug, Serialize)]
pub struct MetricsBlock {
    pub acceptance_rate: f64,
    pub efficiency_score: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationBlock {
    pub confidence_level: &'static str,
    pub restock_note: String,
}

/// Shapes a raw unit prediction into the payload the flight summary reads:
/// suggested units carry the overload margin, acceptance relates predicted
/// to suggested, efficiency relates predicted to the planned load.
pub fn flight_recommendation(
    flight: &Flight,
    predicted: f64,
    confidence_level: &'static str,
) -> FlightRecommendation {
    let predicted_units = predicted.round().max(0.0) as u32;
    let suggested_units = (predicted * OVERLOAD_MARGIN).ceil().max(0.0) as u32;
    let overload_units = suggested_units.saturating_sub(predicted_units);

    let planned = flight.tickets_sold.max(1);
    let acceptance_rate = round2(predicted / f64::from(suggested_units.max(1)) * 100.0);
    let efficiency_score = round2((predicted / f64::from(planned) * 100.0).min(100.0));

    let restock_note = format!(
        "Cargar {} unidades ({} de margen) para el vuelo {}",
        suggested_units, overload_units, flight.flight_id
    );

    FlightRecommendation {
        flight_id: flight.flight_id.clone(),
        prediction: PredictionBlock {
            predicted_consumption: round2(predicted),
            suggested_units,
            overload_units,
            total_required: suggested_units,
        },
        metrics: MetricsBlock {
            acceptance_rate,
            efficiency_score,
        },
        recommendations: RecommendationBlock {
            confidence_level,
            restock_note,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(tickets_sold: u32) -> Flight {
        Flight {
            flight_id: "CTL395".to_string(),
            airline: "AeroMexico".to_string(),
            airline_icon: "am.png".to_string(),
            aircraft: "B737".to_string(),
            max_capacity: 180,
            tickets_sold,
            duration: 2.5,
            origin: "MEX".to_string(),
            destination: "CUN".to_string(),
            departure_date: "2025-10-25".to_string(),
            departure_time: "08:30".to_string(),
        }
    }

    fn history(n: usize) -> Vec<ConsumptionRecord> {
        // Consumption roughly tracks tickets sold, with a duration bump.
        (0..n)
            .map(|i| {
                let tickets = 100.0 + (i % 80) as f32;
                let duration = 1.0 + (i % 5) as f32;
                ConsumptionRecord {
                    flight_duration: duration,
                    tickets_sold: tickets,
                    standard_quantity: tickets,
                    units_consumed: tickets * 0.8 + duration * 10.0,
                }
            })
            .collect()
    }

    #[test]
    fn test_train_rejects_empty_history() {
        assert!(ConsumptionModel::train(&[], 10, 2).is_err());
    }

    #[test]
    fn test_trained_model_predicts_in_label_range() {
        let records = history(60);
        let max_label = records
            .iter()
            .map(|r| r.units_consumed)
            .fold(0.0f32, f32::max);

        let model = ConsumptionModel::train(&records, 30, 3).unwrap();
        let predicted = model.predict_units(2.0, 140, 140);

        assert!(predicted > 0.0);
        assert!(predicted < f64::from(max_label) * 1.5);
        assert_eq!(model.samples(), 60);
        assert_eq!(model.confidence_level(), "medio");
    }

    #[test]
    fn test_confidence_levels() {
        let model = ConsumptionModel::train(&history(10), 5, 2).unwrap();
        assert_eq!(model.confidence_level(), "bajo");

        let model = ConsumptionModel::train(&history(250), 5, 2).unwrap();
        assert_eq!(model.confidence_level(), "alto");
    }

    #[test]
    fn test_recommendation_arithmetic() {
        let rec = flight_recommendation(&flight(150), 200.0, "medio");

        assert_eq!(rec.prediction.predicted_consumption, 200.0);
        assert_eq!(rec.prediction.suggested_units, 210);
        assert_eq!(rec.prediction.overload_units, 10);
        assert_eq!(rec.prediction.total_required, 210);
        assert_eq!(rec.metrics.acceptance_rate, 95.24);
        // Predicted above the planned load caps at 100.
        assert_eq!(rec.metrics.efficiency_score, 100.0);
        assert_eq!(rec.recommendations.confidence_level, "medio");
        assert!(rec.recommendations.restock_note.contains("210"));
    }

    #[test]
    fn test_recommendation_with_zero_prediction() {
        let rec = flight_recommendation(&flight(150), 0.0, "bajo");

        assert_eq!(rec.prediction.suggested_units, 0);
        assert_eq!(rec.prediction.overload_units, 0);
        assert_eq!(rec.metrics.acceptance_rate, 0.0);
        assert_eq!(rec.metrics.efficiency_score, 0.0);
    }
}
