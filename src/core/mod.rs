// core/mod.rs
pub mod prediction;

// Ré-exports pour faciliter l'import
pub use prediction::{ModelBundle, ModelRegistry, PredictionPipeline};
