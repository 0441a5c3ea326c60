//! # Prediction
//!
//! Chaîne complète d'estimation du prix au m²:
//! 1. Validation du type de bien, de la ville et des champs (`validation`)
//! 2. Sélection du jeu de modèles par (ville, type de bien) (`registry`)
//! 3. Construction du vecteur [surface bâtie, surface terrain, nombre de lots]
//! 4. Mise à l'échelle, prédiction, remise à l'échelle (`pipeline`)
//!
//! ## Gestion des erreurs
//! - `ValidationError`: faute du client, jamais rejouée
//! - `ArtifactError`: fatale au démarrage, le serveur ne démarre pas
//! - `PredictionError::ServerFault`: état serveur incohérent (dimensions, valeurs non finies)
//!
//! Les estimateurs et scalers sont des objets pré-entraînés vus à travers les
//! traits `Estimator` et `Scaler`; aucun entraînement n'a lieu ici.

pub mod validation;
pub mod registry;
pub mod pipeline;

pub use pipeline::PredictionPipeline;
pub use registry::{ModelBundle, ModelRegistry};

use crate::domain::{City, PropertyType};

/// Estimateur de régression pré-entraîné
pub trait Estimator: Send + Sync {
    /// Libellé statique du modèle, renvoyé dans les réponses
    fn name(&self) -> &str;

    /// Nombre de colonnes attendues en entrée
    fn n_features(&self) -> usize;

    /// Prédiction sur une ligne déjà mise à l'échelle
    fn predict(&self, row: &[f64]) -> Result<f64, TransformError>;
}

/// Transformation pré-ajustée, réversible, appliquée colonne par colonne
pub trait Scaler: Send + Sync {
    fn n_features(&self) -> usize;

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, TransformError>;

    fn inverse_transform(&self, row: &[f64]) -> Result<Vec<f64>, TransformError>;
}

/// Erreurs des transformations numériques
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("Dimensions incompatibles: {expected} colonne(s) attendue(s), {actual} reçue(s)")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Valeur non finie produite par {0}")]
    NonFinite(String),
    #[error("Paramètres invalides: {0}")]
    InvalidParameters(String),
}

/// Erreurs de validation des requêtes (faute du client)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Features requises manquantes : {0}")]
    MissingField(String),
    #[error("Le champ {field} doit être {expected}")]
    TypeMismatch { field: String, expected: &'static str },
    #[error("Les valeurs ne peuvent pas être négatives ({0})")]
    NegativeValue(String),
    #[error("La surface bâtie ne peut pas être nulle")]
    ZeroBuiltArea,
    #[error("La valeur de {0} doit être strictement positive")]
    NotPositive(String),
    #[error("La valeur de {field} ne peut pas dépasser {max}")]
    RangeExceeded { field: String, max: f64 },
    #[error("Type de local invalide: '{0}'. Valeurs acceptées : Appartement, Maison")]
    InvalidPropertyType(String),
    #[error("Ville invalide: '{0}'. Valeurs acceptées : lille, bordeaux")]
    InvalidCity(String),
}

impl ValidationError {
    /// Identifiant stable du type d'erreur
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::TypeMismatch { .. } => "type_mismatch",
            ValidationError::NegativeValue(_) => "negative_value",
            ValidationError::ZeroBuiltArea => "zero_built_area",
            ValidationError::NotPositive(_) => "not_positive",
            ValidationError::RangeExceeded { .. } => "range_exceeded",
            ValidationError::InvalidPropertyType(_) => "invalid_property_type",
            ValidationError::InvalidCity(_) => "invalid_city",
        }
    }
}

/// Erreurs de chargement des artefacts au démarrage
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Fichiers manquants : {}", .paths.join(", "))]
    MissingArtifact { paths: Vec<String> },
    #[error("Lecture impossible de {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Artefact invalide {path}: {reason}")]
    Malformed { path: String, reason: String },
}

/// Erreur de sélection de modèle
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Aucun modèle chargé pour {city} / {property_type}")]
    UnknownCombination { city: City, property_type: PropertyType },
}

/// Erreurs du pipeline, séparant la faute du client de celle du serveur
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Erreur serveur lors de la prédiction: {0}")]
    ServerFault(String),
}

impl PredictionError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictionError::Validation(_))
    }
}

impl From<TransformError> for PredictionError {
    fn from(error: TransformError) -> Self {
        PredictionError::ServerFault(error.to_string())
    }
}

impl From<RegistryError> for PredictionError {
    fn from(error: RegistryError) -> Self {
        PredictionError::ServerFault(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_taxonomy_separates_faults() {
        let client: PredictionError = ValidationError::ZeroBuiltArea.into();
        assert!(client.is_client_error());

        let shape: PredictionError = TransformError::ShapeMismatch { expected: 3, actual: 4 }.into();
        assert!(!shape.is_client_error());

        let lookup: PredictionError = RegistryError::UnknownCombination {
            city: City::Lille,
            property_type: PropertyType::House,
        }
        .into();
        assert!(!lookup.is_client_error());
        assert!(lookup.to_string().contains("Lille / Maison"));
    }

    #[test]
    fn test_validation_messages_name_the_field() {
        let err = ValidationError::RangeExceeded {
            field: "nombre_lots".to_string(),
            max: 100.0,
        };
        assert_eq!(err.to_string(), "La valeur de nombre_lots ne peut pas dépasser 100");
        assert_eq!(err.kind(), "range_exceeded");
    }

    #[test]
    fn test_missing_artifact_lists_files() {
        let err = ArtifactError::MissingArtifact {
            paths: vec!["models/a.json".to_string(), "models/b.json".to_string()],
        };
        assert_eq!(err.to_string(), "Fichiers manquants : models/a.json, models/b.json");
    }
}
