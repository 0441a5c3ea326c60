use serde::{Deserialize, Serialize};

use super::property::{City, PropertyType};
use crate::utils::helpers::round_to;

/// Noms des champs du format d'échange JSON
pub mod fields {
    pub const SURFACE_BATI: &str = "surface_bati";
    pub const NOMBRE_PIECES: &str = "nombre_pieces";
    pub const TYPE_LOCAL: &str = "type_local";
    pub const SURFACE_TERRAIN: &str = "surface_terrain";
    pub const NOMBRE_LOTS: &str = "nombre_lots";
    pub const VILLE: &str = "ville";
    pub const FEATURES: &str = "features";
}

/// Caractéristiques d'un bien, validées et complétées par leurs valeurs par défaut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRequest {
    /// Surface bâtie en m² (0 < x <= 10000)
    pub built_area: f64,
    /// Nombre de pièces: validé mais jamais transmis au modèle
    pub room_count: u32,
    pub property_type: PropertyType,
    /// Surface du terrain en m² (0 <= x <= 10000)
    pub land_area: f64,
    /// Nombre de lots (0 <= x <= 100)
    pub lot_count: u32,
}

impl PredictionRequest {
    pub const FEATURE_COUNT: usize = 3;

    /// Vecteur d'entrée dans l'ordre des colonnes d'entraînement:
    /// surface bâtie, surface terrain, nombre de lots.
    pub fn feature_vector(&self) -> [f64; Self::FEATURE_COUNT] {
        [self.built_area, self.land_area, f64::from(self.lot_count)]
    }
}

/// Résultat brut du pipeline, sans arrondi
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub estimated_price_per_sqm: f64,
    pub city: City,
    pub model_name: String,
}

impl PredictionResult {
    pub fn city_label(&self) -> &'static str {
        self.city.label()
    }
}

/// Réponse JSON des endpoints de prédiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prix_m2_estime: f64,
    pub ville_modele: String,
    pub model: String,
}

impl From<&PredictionResult> for PredictionResponse {
    fn from(result: &PredictionResult) -> Self {
        Self {
            prix_m2_estime: round_to(result.estimated_price_per_sqm, 2),
            ville_modele: result.city_label().to_string(),
            model: result.model_name.clone(),
        }
    }
}

/// Entrée du catalogue des modèles chargés
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub ville: City,
    pub type_local: PropertyType,
    pub model: String,
}
