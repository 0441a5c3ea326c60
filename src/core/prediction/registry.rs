use std::collections::HashMap;
use std::fmt;

use super::{Estimator, RegistryError, Scaler, TransformError};
use crate::domain::{City, ModelSummary, PropertyType};

/// Estimateur et scalers d'entrée/sortie pour une (ville, type de bien)
pub struct ModelBundle {
    model_name: String,
    estimator: Box<dyn Estimator>,
    input_scaler: Box<dyn Scaler>,
    output_scaler: Box<dyn Scaler>,
}

impl ModelBundle {
    /// Le libellé du modèle est fixé à la construction à partir de l'estimateur
    pub fn new(
        estimator: Box<dyn Estimator>,
        input_scaler: Box<dyn Scaler>,
        output_scaler: Box<dyn Scaler>,
    ) -> Self {
        Self {
            model_name: estimator.name().to_string(),
            estimator,
            input_scaler,
            output_scaler,
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn estimator(&self) -> &dyn Estimator {
        self.estimator.as_ref()
    }

    pub fn input_scaler(&self) -> &dyn Scaler {
        self.input_scaler.as_ref()
    }

    pub fn output_scaler(&self) -> &dyn Scaler {
        self.output_scaler.as_ref()
    }

    /// Cohérence des dimensions entre les trois artefacts
    pub fn check_dimensions(&self, n_inputs: usize) -> Result<(), TransformError> {
        let chain = [
            (n_inputs, self.input_scaler.n_features()),
            (self.input_scaler.n_features(), self.estimator.n_features()),
            (1, self.output_scaler.n_features()),
        ];
        for (expected, actual) in chain {
            if expected != actual {
                return Err(TransformError::ShapeMismatch { expected, actual });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBundle")
            .field("model_name", &self.model_name)
            .field("n_features", &self.estimator.n_features())
            .finish()
    }
}

/// Jeux de modèles chargés au démarrage, en lecture seule ensuite
#[derive(Debug, Default)]
pub struct ModelRegistry {
    bundles: HashMap<(City, PropertyType), ModelBundle>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistrer un jeu de modèles (construction uniquement)
    pub fn insert(
        &mut self,
        city: City,
        property_type: PropertyType,
        bundle: ModelBundle,
    ) -> Option<ModelBundle> {
        self.bundles.insert((city, property_type), bundle)
    }

    pub fn with_bundle(mut self, city: City, property_type: PropertyType, bundle: ModelBundle) -> Self {
        self.insert(city, property_type, bundle);
        self
    }

    /// Sélection du jeu de modèles, sans effet de bord
    pub fn resolve(&self, city: City, property_type: PropertyType) -> Result<&ModelBundle, RegistryError> {
        self.bundles
            .get(&(city, property_type))
            .ok_or(RegistryError::UnknownCombination { city, property_type })
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Liste des modèles chargés, triée par ville puis type de bien
    pub fn catalog(&self) -> Vec<ModelSummary> {
        let mut entries: Vec<ModelSummary> = self
            .bundles
            .iter()
            .map(|((city, property_type), bundle)| ModelSummary {
                ville: *city,
                type_local: *property_type,
                model: bundle.model_name().to_string(),
            })
            .collect();
        entries.sort_by_key(|entry| (entry.ville, entry.type_local));
        entries
    }
}
