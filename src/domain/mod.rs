//! # Domain Models Module
//!
//! Types métier partagés par l'API et le pipeline de prédiction.
//!
//! ## Structure
//! - `property.rs`: villes et types de bien supportés
//! - `prediction.rs`: requête validée, résultat et réponses JSON
//!
//! ## Conventions
//! - Les énumérations sont fermées: toute autre valeur est une erreur de validation
//! - Les noms de champs JSON restent ceux du format d'échange (`surface_bati`, ...)

pub mod property;
pub mod prediction;

pub use property::{City, PropertyType};
pub use prediction::{fields, ModelSummary, PredictionRequest, PredictionResponse, PredictionResult};
