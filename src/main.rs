use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prix_immo_api::api::{self, routes::middleware::RequestId, AppState};
use prix_immo_api::core::PredictionPipeline;
use prix_immo_api::infrastructure::ArtifactStore;
use prix_immo_api::utils::Config;
use prix_immo_api::NAME;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Chargement de la configuration
    let config = Config::from_env()?;

    // Initialisation du logging
    setup_tracing(&config);
    info!("🚀 Démarrage de {} v{}", NAME, prix_immo_api::VERSION);
    info!("🔧 Mode: {}", config.run_mode);
    if config.is_production() && !config.json_logs() {
        warn!("⚠️  Logs non JSON en production (LOGGING_FORMAT={})", config.logging_format);
    }

    // Chargement des modèles, une seule fois pour tous les workers
    let store = ArtifactStore::new(config.model_path());
    info!("📦 Chargement des modèles depuis {}", store.root().display());
    let registry = match store.load_registry() {
        Ok(registry) => registry,
        Err(e) => {
            error!("❌ Impossible de charger les modèles: {}", e);
            return Err(e.into());
        }
    };
    info!("✅ {} modèle(s) chargé(s)", registry.len());

    let pipeline = PredictionPipeline::new(Arc::new(registry));
    let app_state = web::Data::new(AppState::new(pipeline, &config));
    let cors_max_age = config.cors_max_age;

    // Configuration du serveur Actix-Web
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(cors_max_age);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(RequestId)
            .app_data(app_state.clone())
            .configure(api::config)
    })
    .bind(config.bind_address())?
    .workers(config.workers)
    .shutdown_timeout(10);

    info!("✅ Serveur démarré avec succès!");
    info!("🔗 API disponible sur http://{}", config.bind_address());

    server.run().await?;
    Ok(())
}

/// Configure le tracing pour le logging structuré
fn setup_tracing(config: &Config) {
    let log_level = config
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(log_level.into()),
        )
        .with(if config.json_logs() {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        } else {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_line_number(true)
                    .with_file(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        });

    subscriber.init();
}
