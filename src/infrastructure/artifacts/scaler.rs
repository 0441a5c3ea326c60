use serde::{Deserialize, Serialize};

use crate::core::prediction::{Scaler, TransformError};

/// Paramètres exportés d'un scaler ajusté
///
/// - `standard`: `(x - mean) / scale`
/// - `min_max`: `x * scale + min`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalerArtifact {
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl ScalerArtifact {
    fn params(&self) -> (&[f64], &[f64]) {
        match self {
            ScalerArtifact::Standard { mean, scale } => (mean, scale),
            ScalerArtifact::MinMax { min, scale } => (min, scale),
        }
    }

    /// Contrôle structurel effectué au chargement
    pub fn check(&self) -> Result<(), TransformError> {
        let (offset, scale) = self.params();
        if offset.is_empty() {
            return Err(TransformError::InvalidParameters("scaler sans colonne".to_string()));
        }
        if offset.len() != scale.len() {
            return Err(TransformError::ShapeMismatch {
                expected: offset.len(),
                actual: scale.len(),
            });
        }
        if offset.iter().chain(scale).any(|v| !v.is_finite()) {
            return Err(TransformError::InvalidParameters("paramètre non fini".to_string()));
        }
        if scale.iter().any(|s| *s == 0.0) {
            return Err(TransformError::InvalidParameters("échelle nulle".to_string()));
        }
        Ok(())
    }

    fn ensure_width(&self, row: &[f64]) -> Result<(), TransformError> {
        let expected = self.n_features();
        if row.len() != expected {
            return Err(TransformError::ShapeMismatch {
                expected,
                actual: row.len(),
            });
        }
        Ok(())
    }
}

impl Scaler for ScalerArtifact {
    fn n_features(&self) -> usize {
        self.params().0.len()
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, TransformError> {
        self.ensure_width(row)?;
        let out = match self {
            ScalerArtifact::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            ScalerArtifact::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        };
        Ok(out)
    }

    fn inverse_transform(&self, row: &[f64]) -> Result<Vec<f64>, TransformError> {
        self.ensure_width(row)?;
        let out = match self {
            ScalerArtifact::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
            ScalerArtifact::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
        };
        Ok(out)
    }
}
