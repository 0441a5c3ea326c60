use serde::{Deserialize, Serialize};

use crate::core::prediction::{Estimator, TransformError};

/// Marqueur de feuille (convention des arbres exportés)
const TREE_LEAF: i64 = -1;

/// Arbre de régression sous forme de tableaux parallèles.
///
/// Le noeud `i` descend à gauche quand `x[feature[i]] <= threshold[i]`;
/// une feuille a `children_left[i] == -1` et sa prédiction est `value[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNodes {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl TreeNodes {
    /// Les enfants ont toujours un indice supérieur au parent, ce qui exclut les cycles
    fn check(&self, n_features: usize) -> Result<(), TransformError> {
        let n_nodes = self.children_left.len();
        if n_nodes == 0 {
            return Err(TransformError::InvalidParameters("arbre vide".to_string()));
        }
        for len in [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ] {
            if len != n_nodes {
                return Err(TransformError::ShapeMismatch {
                    expected: n_nodes,
                    actual: len,
                });
            }
        }

        for node in 0..n_nodes {
            if !self.value[node].is_finite() {
                return Err(TransformError::InvalidParameters(format!("valeur non finie au noeud {}", node)));
            }
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF {
                continue;
            }
            let valid_child = |child: i64| child > node as i64 && (child as usize) < n_nodes;
            if !valid_child(left) || !valid_child(right) {
                return Err(TransformError::InvalidParameters(format!("enfant invalide au noeud {}", node)));
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(TransformError::InvalidParameters(format!(
                    "feature {} hors limites au noeud {}",
                    feature, node
                )));
            }
            if self.threshold[node].is_nan() {
                return Err(TransformError::InvalidParameters(format!("seuil invalide au noeud {}", node)));
            }
        }
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let x = row[self.feature[node] as usize];
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }
}

/// Paramètres exportés d'un estimateur de régression ajusté
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EstimatorArtifact {
    LinearRegression { coef: Vec<f64>, intercept: f64 },
    DecisionTree { n_features: usize, tree: TreeNodes },
    RandomForest { n_features: usize, trees: Vec<TreeNodes> },
}

impl EstimatorArtifact {
    /// Contrôle structurel effectué au chargement
    pub fn check(&self) -> Result<(), TransformError> {
        match self {
            EstimatorArtifact::LinearRegression { coef, intercept } => {
                if coef.is_empty() {
                    return Err(TransformError::InvalidParameters("aucun coefficient".to_string()));
                }
                if coef.iter().chain(std::iter::once(intercept)).any(|v| !v.is_finite()) {
                    return Err(TransformError::InvalidParameters("coefficient non fini".to_string()));
                }
                Ok(())
            }
            EstimatorArtifact::DecisionTree { n_features, tree } => tree.check(*n_features),
            EstimatorArtifact::RandomForest { n_features, trees } => {
                if trees.is_empty() {
                    return Err(TransformError::InvalidParameters("forêt sans arbre".to_string()));
                }
                trees.iter().try_for_each(|tree| tree.check(*n_features))
            }
        }
    }
}

impl Estimator for EstimatorArtifact {
    fn name(&self) -> &str {
        match self {
            EstimatorArtifact::LinearRegression { .. } => "LinearRegression",
            EstimatorArtifact::DecisionTree { .. } => "DecisionTreeRegressor",
            EstimatorArtifact::RandomForest { .. } => "RandomForestRegressor",
        }
    }

    fn n_features(&self) -> usize {
        match self {
            EstimatorArtifact::LinearRegression { coef, .. } => coef.len(),
            EstimatorArtifact::DecisionTree { n_features, .. }
            | EstimatorArtifact::RandomForest { n_features, .. } => *n_features,
        }
    }

    fn predict(&self, row: &[f64]) -> Result<f64, TransformError> {
        let expected = self.n_features();
        if row.len() != expected {
            return Err(TransformError::ShapeMismatch {
                expected,
                actual: row.len(),
            });
        }

        let prediction = match self {
            EstimatorArtifact::LinearRegression { coef, intercept } => {
                intercept + coef.iter().zip(row).map(|(c, x)| c * x).sum::<f64>()
            }
            EstimatorArtifact::DecisionTree { tree, .. } => tree.predict(row),
            EstimatorArtifact::RandomForest { trees, .. } => {
                trees.iter().map(|tree| tree.predict(row)).sum::<f64>() / trees.len() as f64
            }
        };

        if !prediction.is_finite() {
            return Err(TransformError::NonFinite(self.name().to_string()));
        }
        Ok(prediction)
    }
}
