//! # Prediction Pipeline
//!
//! Orchestration: validation → sélection du modèle → vecteur de features →
//! scaler d'entrée → estimateur → scaler de sortie inverse.
//!
//! Le pipeline ne détient aucun état mutable: le registre est partagé en
//! lecture seule entre toutes les requêtes concurrentes. Les calculs restent en
//! double précision; aucun arrondi n'est appliqué ici.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{debug, error, info};

use super::registry::{ModelBundle, ModelRegistry};
use super::validation;
use super::{PredictionError, TransformError, ValidationError};
use crate::domain::fields::TYPE_LOCAL;
use crate::domain::{City, PredictionRequest, PredictionResult};
use crate::utils::helpers::elapsed_ms;

/// Pipeline de prédiction du prix au m²
#[derive(Debug, Clone)]
pub struct PredictionPipeline {
    registry: Arc<ModelRegistry>,
}

impl PredictionPipeline {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Chaîne complète à partir des champs bruts de la requête
    pub fn predict(
        &self,
        city: &str,
        mut fields: Map<String, Value>,
    ) -> Result<PredictionResult, PredictionError> {
        let (city, request) = self.validate(city, &mut fields)?;
        self.predict_validated(city, &request)
    }

    /// Étapes de validation, dans l'ordre: ville, type de bien, caractéristiques
    pub fn validate(
        &self,
        city: &str,
        fields: &mut Map<String, Value>,
    ) -> Result<(City, PredictionRequest), ValidationError> {
        let outcome = validation::validate_city(city).and_then(|city| {
            validation::validate_property_type(validation::string_field(fields, TYPE_LOCAL)?)?;
            let request = validation::validate_features(fields)?;
            Ok((city, request))
        });
        if let Err(e) = &outcome {
            info!(city = %city, kind = e.kind(), "Requête rejetée: {}", e);
        }
        outcome
    }

    /// Prédiction sur une requête déjà validée
    pub fn predict_validated(
        &self,
        city: City,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionError> {
        let start = Instant::now();
        debug!(city = %city, property_type = %request.property_type, "Démarrage de la prédiction");

        let bundle = self.registry.resolve(city, request.property_type).map_err(|e| {
            error!(city = %city, property_type = %request.property_type, error = %e, "Modèle introuvable");
            PredictionError::from(e)
        })?;

        let features = request.feature_vector();
        let estimate = run_bundle(bundle, &features).map_err(|e| {
            error!(
                city = %city,
                property_type = %request.property_type,
                model = bundle.model_name(),
                features = ?features,
                error = %e,
                "Échec de la prédiction"
            );
            PredictionError::from(e)
        })?;

        debug!(
            city = %city,
            estimate,
            duration_ms = elapsed_ms(start),
            "Prédiction terminée"
        );

        Ok(PredictionResult {
            estimated_price_per_sqm: estimate,
            city,
            model_name: bundle.model_name().to_string(),
        })
    }
}

/// Mise à l'échelle, prédiction puis remise à l'échelle d'une ligne
pub fn run_bundle(bundle: &ModelBundle, features: &[f64]) -> Result<f64, TransformError> {
    let scaled = bundle.input_scaler().transform(features)?;
    debug!(scaled = ?scaled, "Features mises à l'échelle");

    let prediction = bundle.estimator().predict(&scaled)?;
    debug!(prediction, "Prédiction brute");

    let restored = bundle.output_scaler().inverse_transform(&[prediction])?;
    let value = match restored.as_slice() {
        [value] => *value,
        other => {
            return Err(TransformError::ShapeMismatch {
                expected: 1,
                actual: other.len(),
            })
        }
    };

    if !value.is_finite() {
        return Err(TransformError::NonFinite(bundle.model_name().to_string()));
    }
    Ok(value)
}
