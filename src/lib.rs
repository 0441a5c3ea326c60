// src/lib.rs
// Modules principaux
pub mod api;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod utils;

// Ré-exports pour faciliter l'utilisation
pub use crate::core::{ModelRegistry, PredictionPipeline};
pub use domain::{City, PredictionResponse, PropertyType};
pub use infrastructure::{AppError, AppResult};
pub use utils::Config;

// Version de l'application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "API Prédiction Prix Immobilier";
