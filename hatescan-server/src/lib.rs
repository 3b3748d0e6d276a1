//! Prediction server for the hatescan classifier.
//!
//! Loads the fitted vocabulary, forwards encoded text to an external model
//! runtime and logs every prediction so users can confirm or reject it.

pub mod config;
pub mod routes;
pub mod runtime;
pub mod service;
pub mod store;

pub use config::ServerConfig;
pub use routes::{build_router, AppState};
pub use runtime::{ModelRuntime, RestModelRuntime};
pub use service::PredictionService;
pub use store::{PgPredictionStore, PredictionRecord, PredictionStore, StoreError};
