pub mod routes;

use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};

use crate::core::prediction::PredictionPipeline;
use crate::infrastructure::error::AppError;
use crate::utils::Config;

/// État partagé par tous les workers HTTP
#[derive(Debug, Clone)]
pub struct AppState {
    pub pipeline: PredictionPipeline,
    pub environment: String,
    pub catalog_enabled: bool,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: PredictionPipeline, config: &Config) -> Self {
        Self {
            pipeline,
            environment: config.run_mode.clone(),
            catalog_enabled: config.enable_model_catalog,
            started_at: Utc::now(),
        }
    }
}

/// Configure toutes les routes de l'API
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(routes::predict::json_error_handler))
        // Prédiction
        .service(routes::predict::predict_lille)
        .service(routes::predict::predict_bordeaux)
        .service(routes::predict::predict_dynamic)
        // Catalogue des modèles
        .service(routes::models::list_models)
        // Routes publiques
        .service(web::resource("/").route(web::get().to(read_root)))
        .service(web::resource("/health").route(web::get().to(health_check)))
        .default_service(web::route().to(not_found));
}

/// Message d'accueil
async fn read_root() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Bienvenue sur l'API de prédiction immobilière"
    }))
}

/// Endpoint de santé pour les probes Kubernetes/Docker
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let uptime = (Utc::now() - state.started_at).num_seconds().max(0);
    let registry = state.pipeline.registry();
    let status = if registry.is_empty() { "degraded" } else { "healthy" };

    HttpResponse::Ok().json(serde_json::json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime": format!("{} seconds", uptime),
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.environment,
        "models_loaded": registry.len()
    }))
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound("Route".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_state;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_read_root() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body.get("message").is_some());
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(config),
        )
        .await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["models_loaded"], 4);
        assert_eq!(body["environment"], "test");
    }

    #[actix_web::test]
    async fn test_health_without_models_is_degraded() {
        use crate::core::prediction::ModelRegistry;
        use std::sync::Arc;

        let state = AppState::new(PredictionPipeline::new(Arc::new(ModelRegistry::new())), &Config::default());
        let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(config)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "degraded");
        assert_eq!(body["models_loaded"], 0);
    }

    #[actix_web::test]
    async fn test_unknown_route() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::get().uri("/estimate").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
