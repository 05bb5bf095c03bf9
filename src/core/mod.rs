pub mod freshness;
pub mod predictor;
pub mod snapshot;
pub mod stats;
pub mod weather;
