//! # Model Artifacts
//!
//! Lecture des artefacts pré-entraînés depuis le disque.
//!
//! ## Organisation des fichiers
//! Pour chaque type de bien, trois fichiers JSON:
//! - `model_<suffixe>.json`: estimateur de régression
//! - `scaler_x_<suffixe>.json`: scaler des features d'entrée
//! - `scaler_y_<suffixe>.json`: scaler du prix au m²
//!
//! avec `<suffixe>` = `appartements` ou `maisons`. Une ville dispose de ses
//! propres artefacts dans `<racine>/<ville>/`; sans ce sous-dossier, les
//! fichiers placés à la racine sont partagés par toutes les villes.
//!
//! Le chargement a lieu une seule fois au démarrage; tout fichier manquant ou
//! invalide, ou un jeu dont les dimensions ne s'enchaînent pas, empêche le
//! serveur de démarrer.

pub mod estimator;
pub mod scaler;

pub use estimator::{EstimatorArtifact, TreeNodes};
pub use scaler::ScalerArtifact;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::core::prediction::{ArtifactError, ModelBundle, ModelRegistry, TransformError};
use crate::domain::{City, PredictionRequest, PropertyType};

/// Chemins des trois artefacts d'un jeu de modèles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundlePaths {
    pub estimator: PathBuf,
    pub input_scaler: PathBuf,
    pub output_scaler: PathBuf,
}

impl BundlePaths {
    pub fn in_dir(dir: &Path, property_type: PropertyType) -> Self {
        let suffix = property_type.artifact_suffix();
        Self {
            estimator: dir.join(format!("model_{}.json", suffix)),
            input_scaler: dir.join(format!("scaler_x_{}.json", suffix)),
            output_scaler: dir.join(format!("scaler_y_{}.json", suffix)),
        }
    }

    pub fn files(&self) -> [&Path; 3] {
        [&self.estimator, &self.input_scaler, &self.output_scaler]
    }
}

/// Répertoire racine des artefacts de modèles
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Répertoire utilisé pour une ville: sous-dossier dédié s'il existe, sinon la racine
    pub fn city_dir(&self, city: City) -> PathBuf {
        let dedicated = self.root.join(city.slug());
        if dedicated.is_dir() {
            dedicated
        } else {
            self.root.clone()
        }
    }

    /// Artefacts attendus pour chaque (ville, type de bien)
    pub fn layout(&self) -> Vec<(City, PropertyType, BundlePaths)> {
        City::ALL
            .into_iter()
            .flat_map(|city| {
                let dir = self.city_dir(city);
                PropertyType::ALL
                    .into_iter()
                    .map(move |property_type| (city, property_type, BundlePaths::in_dir(&dir, property_type)))
            })
            .collect()
    }

    /// Vérifier que tous les fichiers attendus sont présents
    pub fn check(&self) -> Result<(), ArtifactError> {
        if !self.root.is_dir() {
            return Err(ArtifactError::MissingArtifact {
                paths: vec![self.root.display().to_string()],
            });
        }

        let mut missing: Vec<String> = Vec::new();
        for (_, _, paths) in self.layout() {
            for file in paths.files() {
                let shown = file.display().to_string();
                if !file.is_file() && !missing.contains(&shown) {
                    missing.push(shown);
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ArtifactError::MissingArtifact { paths: missing })
        }
    }

    /// Charger le registre complet (2 villes × 2 types de bien)
    pub fn load_registry(&self) -> Result<ModelRegistry, ArtifactError> {
        self.check()?;

        let mut registry = ModelRegistry::new();
        for (city, property_type, paths) in self.layout() {
            let bundle = Self::load_bundle(&paths)?;
            let dir = paths.estimator.parent().unwrap_or(self.root.as_path()).display().to_string();
            if let Err(e) = bundle.check_dimensions(PredictionRequest::FEATURE_COUNT) {
                error!(city = %city, property_type = %property_type, error = %e, "❌ Dimensions incohérentes");
                return Err(ArtifactError::Malformed {
                    path: dir,
                    reason: e.to_string(),
                });
            }
            info!(
                city = %city,
                property_type = %property_type,
                model = bundle.model_name(),
                dir = %dir,
                "✅ Modèle chargé"
            );
            registry.insert(city, property_type, bundle);
        }

        Ok(registry)
    }

    /// Charger un estimateur et ses deux scalers
    pub fn load_bundle(paths: &BundlePaths) -> Result<ModelBundle, ArtifactError> {
        let estimator: EstimatorArtifact = read_json(&paths.estimator)?;
        checked(&paths.estimator, estimator.check())?;

        let input_scaler: ScalerArtifact = read_json(&paths.input_scaler)?;
        checked(&paths.input_scaler, input_scaler.check())?;

        let output_scaler: ScalerArtifact = read_json(&paths.output_scaler)?;
        checked(&paths.output_scaler, output_scaler.check())?;

        Ok(ModelBundle::new(
            Box::new(estimator),
            Box::new(input_scaler),
            Box::new(output_scaler),
        ))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|e| ArtifactError::Malformed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn checked(path: &Path, result: Result<(), TransformError>) -> Result<(), ArtifactError> {
    result.map_err(|e| ArtifactError::Malformed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
