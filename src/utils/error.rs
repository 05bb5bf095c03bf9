use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Weather API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid {field} value '{value}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration field: {field}")]
    MissingConfig { field: String },

    #[error("Consumption model is still training, try again shortly")]
    ModelNotReady,

    #[error("No storm snapshots available yet")]
    NoSnapshots,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound { .. } | AppError::NoSnapshots => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } | AppError::InvalidConfigValue { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::ModelNotReady => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
