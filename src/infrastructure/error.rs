use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::core::prediction::{PredictionError, ValidationError};

/// Type de résultat standard pour l'application
pub type AppResult<T> = Result<T, AppError>;

/// Erreurs principales de l'application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Champ manquant, mal typé ou hors limites (422 Unprocessable Entity)
    #[error("{0}")]
    ValidationError(ValidationError),

    /// Corps JSON illisible (422 Unprocessable Entity)
    #[error("Corps de requête invalide: {0}")]
    InvalidPayload(String),

    /// Échec inattendu pendant la prédiction (400 Bad Request)
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// Ressource non trouvée (404 Not Found)
    #[error("{0} not found")]
    NotFound(String),

    /// Erreur de configuration (500 Internal Server Error)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl AppError {
    /// Convertit l'erreur en code HTTP approprié
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PredictionFailed(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Code stable renvoyé dans le corps de la réponse
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::InvalidPayload(_) => "VALIDATION_ERROR",
            AppError::PredictionFailed(_) => "PREDICTION_FAILED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ConfigurationError(_) => "INTERNAL_ERROR",
        }
    }

    /// Message destiné au client: le détail des fautes serveur reste dans les logs
    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::ValidationError(_) | AppError::InvalidPayload(_) | AppError::NotFound(_) => {
                self.to_string()
            }
            AppError::PredictionFailed(_) => {
                "La prédiction a échoué. Veuillez réessayer plus tard.".to_string()
            }
            AppError::ConfigurationError(_) => "Une erreur interne est survenue.".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::ValidationError(_) | AppError::InvalidPayload(_) | AppError::NotFound(_) => {
                warn!(code = self.error_code(), "Requête refusée: {}", self);
            }
            _ => error!(code = self.error_code(), "Erreur serveur: {}", self),
        }

        let kind = match self {
            AppError::ValidationError(e) => Some(e.kind().to_string()),
            _ => None,
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.user_friendly_message(),
            code: self.error_code().to_string(),
            kind,
        })
    }
}

/// Structure de réponse d'erreur standardisée
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

// Implémentations From pour les conversions automatiques

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        AppError::ValidationError(error)
    }
}

impl From<PredictionError> for AppError {
    fn from(error: PredictionError) -> Self {
        match error {
            PredictionError::Validation(e) => AppError::ValidationError(e),
            PredictionError::ServerFault(msg) => AppError::PredictionFailed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        let validation: AppError = PredictionError::from(ValidationError::InvalidCity("paris".into())).into();
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let fault: AppError = PredictionError::ServerFault("shape".into()).into();
        assert_eq!(fault.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(fault.error_code(), "PREDICTION_FAILED");

        assert_eq!(AppError::NotFound("Route".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ConfigurationError("WORKERS".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_fault_detail_is_hidden() {
        let fault = AppError::PredictionFailed("Dimensions incompatibles: 3 / 4".into());
        assert!(!fault.user_friendly_message().contains("Dimensions"));
    }

    #[actix_web::test]
    async fn test_error_body() {
        let error = AppError::from(ValidationError::ZeroBuiltArea);
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            ErrorResponse {
                error: "La surface bâtie ne peut pas être nulle".to_string(),
                code: "VALIDATION_ERROR".to_string(),
                kind: Some("zero_built_area".to_string()),
            }
        );
    }
}
