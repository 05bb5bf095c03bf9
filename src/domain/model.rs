use serde::{Deserialize, Serialize};

/// Row of `flight_data.csv`. CSV headers are snake_case; clients receive
/// camelCase keys, keyed by flight id at the collection level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Flight {
    #[serde(skip_serializing)]
    pub flight_id: String,
    pub airline: String,
    pub airline_icon: String,
    pub aircraft: String,
    pub max_capacity: u32,
    pub tickets_sold: u32,
    pub duration: f64,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub departure_time: String,
}

/// Row of `products_data_augmented.csv`. Column names are part of the
/// frontend contract and stay as-is on the wire; `product_id` and the name
/// fields are generated at load time, never stored in the CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "aerolinea")]
    pub airline: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    pub freshness_score: f64,
    #[serde(rename = "vida_util_dias")]
    pub shelf_life_days: f64,
    pub standard_quantity: u32,
    pub suggested_units: u32,
    pub overload_units: u32,
    pub unit_cost: f64,
    pub reusable_flag: bool,
    pub units_returned: u32,
    pub units_consumed: u32,

    #[serde(skip_deserializing)]
    pub product_id: String,
    #[serde(skip_deserializing)]
    pub product_name: String,
    #[serde(skip_deserializing)]
    pub nombre_producto: String,
    #[serde(skip_deserializing)]
    pub id: String,
}

impl Product {
    /// Attaches the synthetic id and display name generated per row:
    /// `prod-{index:03}-{airline}` and `{category} {kind} - {airline}`.
    pub fn with_generated_fields(mut self, index: usize) -> Self {
        let airline_slug = self.airline.replace(' ', "").to_lowercase();
        let product_id = format!("prod-{:03}-{}", index, airline_slug);
        let product_name = format!("{} {} - {}", self.category, self.kind, self.airline);

        self.id = product_id.clone();
        self.product_id = product_id;
        self.nombre_producto = product_name.clone();
        self.product_name = product_name;
        self
    }
}

/// Row of `productivity_data.csv`, keyed by `sesion_id`. The Spanish wire
/// keys are what the dashboard frontend reads; only the key casing of the
/// Rust fields differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "sesion_id", skip_serializing)]
    pub id: String,
    #[serde(rename = "nombre_operario")]
    pub operator_name: String,
    #[serde(rename = "puesto")]
    pub role: String,
    #[serde(rename = "turno")]
    pub shift: String,
    #[serde(rename = "area_trabajo")]
    pub work_area: String,
    #[serde(rename = "fecha_inicio")]
    pub started_at: String,
    #[serde(rename = "fecha_fin")]
    pub ended_at: String,
    #[serde(rename = "duracion_sesion_seg")]
    pub duration_secs: f64,
    #[serde(rename = "duracion_sesion_min")]
    pub duration_mins: f64,
    #[serde(rename = "conteo_total_items")]
    pub total_items: i64,
    #[serde(rename = "tasa_items_por_minuto")]
    pub items_per_minute: f64,
    #[serde(rename = "eficiencia_operario")]
    pub efficiency: f64,
    #[serde(rename = "fps_promedio")]
    pub avg_fps: f64,
    #[serde(rename = "frames_procesados")]
    pub frames_processed: i64,
    #[serde(rename = "fuente_video")]
    pub video_source: String,
    #[serde(rename = "camara_id")]
    pub camera_id: String,
    #[serde(rename = "ubicacion_camara")]
    pub camera_location: String,
    #[serde(rename = "estado_sesion")]
    pub session_state: String,
    #[serde(rename = "errores_deteccion")]
    pub detection_errors: i64,
    #[serde(rename = "precision_promedio")]
    pub avg_precision: f64,
    #[serde(rename = "brazo_dominante")]
    pub dominant_arm: String,
    #[serde(rename = "uso_brazo_izquierdo")]
    pub left_arm_usage: f64,
    #[serde(rename = "uso_brazo_derecho")]
    pub right_arm_usage: f64,
    #[serde(rename = "movimientos_eficientes")]
    pub efficient_movements: f64,
    #[serde(rename = "ciudad", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Row of `consumption_history.csv`, the training set for the consumption
/// model. One row per past flight service.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsumptionRecord {
    pub flight_duration: f32,
    pub tickets_sold: f32,
    pub standard_quantity: f32,
    pub units_consumed: f32,
}

/// Entry of the per-flight product consumption table served by the
/// `/enfoque2` prototype endpoint. camelCase on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CateringProduct {
    pub product_id: &'static str,
    pub product_name: &'static str,
    pub unit_cost: f64,
    pub reusable_flag: bool,
    pub food_type: &'static str,
    pub standard_quantity: u32,
    pub units_returned: u32,
    pub units_consumed: u32,
    pub suggested_units: u32,
    pub overload_units: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_serializes_camel_case_without_id() {
        let flight = Flight {
            flight_id: "CTL395".to_string(),
            airline: "AeroMexico".to_string(),
            airline_icon: "am.png".to_string(),
            aircraft: "B737".to_string(),
            max_capacity: 180,
            tickets_sold: 150,
            duration: 2.5,
            origin: "MEX".to_string(),
            destination: "CUN".to_string(),
            departure_date: "2025-10-25".to_string(),
            departure_time: "08:30".to_string(),
        };

        let json = serde_json::to_value(&flight).unwrap();
        assert!(json.get("flight_id").is_none());
        assert_eq!(json["maxCapacity"], 180);
        assert_eq!(json["departureDate"], "2025-10-25");
    }

    #[test]
    fn test_product_generated_fields() {
        let product = Product {
            airline: "Aero Connect".to_string(),
            category: "Bebida".to_string(),
            kind: "beverage".to_string(),
            freshness_score: 90.0,
            shelf_life_days: 10.0,
            standard_quantity: 300,
            suggested_units: 280,
            overload_units: 20,
            unit_cost: 1.5,
            reusable_flag: false,
            units_returned: 30,
            units_consumed: 250,
            product_id: String::new(),
            product_name: String::new(),
            nombre_producto: String::new(),
            id: String::new(),
        }
        .with_generated_fields(7);

        assert_eq!(product.product_id, "prod-007-aeroconnect");
        assert_eq!(product.id, product.product_id);
        assert_eq!(product.product_name, "Bebida beverage - Aero Connect");
        assert_eq!(product.nombre_producto, product.product_name);
    }

    #[test]
    fn test_session_wire_keys_are_spanish() {
        let session = Session {
            id: "S001".to_string(),
            operator_name: "Laura Mendez".to_string(),
            role: "Picker".to_string(),
            shift: "Matutino".to_string(),
            work_area: "Zona A".to_string(),
            started_at: "2025-10-24 08:00:00".to_string(),
            ended_at: "2025-10-24 09:00:00".to_string(),
            duration_secs: 3600.0,
            duration_mins: 60.0,
            total_items: 240,
            items_per_minute: 4.0,
            efficiency: 92.5,
            avg_fps: 29.7,
            frames_processed: 106_920,
            video_source: "cam01.mp4".to_string(),
            camera_id: "CAM-01".to_string(),
            camera_location: "Pasillo 1".to_string(),
            session_state: "completada".to_string(),
            detection_errors: 2,
            avg_precision: 97.1,
            dominant_arm: "derecho".to_string(),
            left_arm_usage: 38.0,
            right_arm_usage: 62.0,
            efficient_movements: 88.0,
            city: Some("Monterrey".to_string()),
            country: Some("Mexico".to_string()),
        };

        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("sesion_id").is_none());
        assert_eq!(json["nombre_operario"], "Laura Mendez");
        assert_eq!(json["conteo_total_items"], 240);
        assert_eq!(json["eficiencia_operario"], 92.5);
        assert_eq!(json["ciudad"], "Monterrey");
    }
}
