//! # Prediction Routes
//!
//! - `POST /predict/lille` et `POST /predict/bordeaux`: ville fixée par la route
//! - `POST /predict`: `{"ville": "...", "features": {...}}`
//!
//! Toute erreur de validation (champ manquant, type, bornes, `type_local` ou
//! `ville` inconnus, JSON illisible) donne un 422. Une faute serveur pendant la
//! prédiction donne un 400 avec un message générique.
//!
//! `nombre_pieces` est exigé par le format d'échange, strictement positif, mais
//! n'entre pas dans le vecteur de features du modèle.

use actix_web::{error::JsonPayloadError, post, web, HttpRequest, HttpResponse};
use serde_json::{Map, Value};

use crate::api::AppState;
use crate::core::prediction::validation::{self, require_fields};
use crate::core::prediction::ValidationError;
use crate::domain::fields::{FEATURES, NOMBRE_LOTS, NOMBRE_PIECES, SURFACE_BATI, TYPE_LOCAL, VILLE};
use crate::domain::{City, PredictionResponse};
use crate::infrastructure::error::{AppError, AppResult};

/// Champs obligatoires du format d'échange
pub const WIRE_REQUIRED_FIELDS: [&str; 4] = [SURFACE_BATI, NOMBRE_PIECES, TYPE_LOCAL, NOMBRE_LOTS];

#[post("/predict/lille")]
pub async fn predict_lille(state: web::Data<AppState>, body: web::Json<Value>) -> AppResult<HttpResponse> {
    predict_for_city(&state, City::Lille.slug(), body.into_inner())
}

#[post("/predict/bordeaux")]
pub async fn predict_bordeaux(state: web::Data<AppState>, body: web::Json<Value>) -> AppResult<HttpResponse> {
    predict_for_city(&state, City::Bordeaux.slug(), body.into_inner())
}

/// Prédiction avec choix de la ville dans le corps de la requête
#[post("/predict")]
pub async fn predict_dynamic(state: web::Data<AppState>, body: web::Json<Value>) -> AppResult<HttpResponse> {
    let mut body = into_object(body.into_inner(), "corps de la requête")?;

    let ville = validation::string_field(&body, VILLE)?.to_string();
    validation::validate_city(&ville)?;

    let features = match body.remove(FEATURES) {
        None | Some(Value::Null) => return Err(ValidationError::MissingField(FEATURES.to_string()).into()),
        Some(value) => into_object(value, FEATURES)?,
    };

    respond(&state, &ville, features)
}

fn predict_for_city(state: &AppState, city: &str, body: Value) -> AppResult<HttpResponse> {
    let fields = into_object(body, "corps de la requête")?;
    respond(state, city, fields)
}

fn respond(state: &AppState, city: &str, mut fields: Map<String, Value>) -> AppResult<HttpResponse> {
    require_fields(&fields, &WIRE_REQUIRED_FIELDS)?;

    let (city, request) = state.pipeline.validate(city, &mut fields)?;
    if request.room_count == 0 {
        return Err(ValidationError::NotPositive(NOMBRE_PIECES.to_string()).into());
    }

    let result = state.pipeline.predict_validated(city, &request)?;
    Ok(HttpResponse::Ok().json(PredictionResponse::from(&result)))
}

fn into_object(value: Value, name: &str) -> Result<Map<String, Value>, ValidationError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::TypeMismatch {
            field: name.to_string(),
            expected: "un objet JSON",
        }),
    }
}

/// Un corps JSON illisible est une erreur de validation (422)
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidPayload(err.to_string()).into()
}
