use actix_web::{get, web, HttpResponse};
use tracing::info;

use crate::api::AppState;
use crate::infrastructure::error::{AppError, AppResult};

/// Liste des modèles chargés par (ville, type de bien)
#[get("/models")]
pub async fn list_models(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    if !state.catalog_enabled {
        return Err(AppError::NotFound("Route".to_string()));
    }

    let models = state.pipeline.registry().catalog();
    let total = models.len();
    info!(count = total, "Catalogue des modèles demandé");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "models": models,
        "total": total
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_state;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_list_models() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .configure(crate::api::config),
        )
        .await;
        let req = test::TestRequest::get().uri("/models").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total"], 4);
        assert_eq!(
            body["models"][0],
            json!({ "ville": "lille", "type_local": "Appartement", "model": "LinearRegression" })
        );
        assert_eq!(body["models"][3]["ville"], "bordeaux");
    }

    #[actix_web::test]
    async fn test_catalog_can_be_disabled() {
        let mut state = test_state();
        state.catalog_enabled = false;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::api::config),
        )
        .await;
        let req = test::TestRequest::get().uri("/models").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
