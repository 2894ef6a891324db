use std::sync::Arc;

use actix_cors::Cors;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, web};

use braincheck::artifact;
use braincheck::config::AppConfig;
use braincheck::model::{Classifier, OnnxClassifier};
use braincheck::routes::configure_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();

    artifact::ensure_model(&config.model_path, &config.model_url).await?;

    let classifier = OnnxClassifier::load(&config.model_path).map_err(|e| {
        log::error!("Failed to load classifier at startup: {e}");
        std::io::Error::other(e.to_string())
    })?;
    let classifier: Arc<dyn Classifier> = Arc::new(classifier);

    std::fs::create_dir_all(&config.uploads_dir)?;

    let session_key = match config.session_secret.as_deref() {
        Some(secret) if secret.len() >= 64 => Key::from(secret.as_bytes()),
        _ => {
            log::warn!("SESSION_SECRET unset or shorter than 64 bytes; using a random per-process key");
            Key::generate()
        }
    };

    let bind_address = format!("0.0.0.0:{}", config.port);
    log::info!("Starting server on {}", bind_address);

    let app_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(web::Data::from(classifier.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .configure(|cfg| configure_routes(cfg, app_config.uploads_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
