use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use actix_web::error::{Error, InternalError, JsonPayloadError, UrlencodedError};
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::json;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
mod blog_post;
mod blogs;
mod completion;
mod config;
mod db;
mod error;
mod extract;
mod generate;
use completion::{OpenAiClient, TextGenerator};
use config::Config;
use db::BlogStore;

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let resp = HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
    InternalError::from_response(err, resp).into()
}

fn form_error_handler(err: UrlencodedError, _req: &HttpRequest) -> Error {
    let resp = HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
    InternalError::from_response(err, resp).into()
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "msg": "Not Found" }))
}

fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate::generate_content)
        .service(blogs::list_blogs)
        .service(blogs::create_blog)
        .service(blogs::get_blog)
        .service(blogs::update_blog)
        .service(blogs::delete_blog)
        .app_data(
            web::JsonConfig::default()
                // register error_handler for JSON extractors.
                .error_handler(json_error_handler),
        )
        .app_data(web::FormConfig::default().error_handler(form_error_handler))
        .default_service(web::to(not_found));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            std::process::exit(1);
        }
    };

    let store: web::Data<dyn BlogStore> = match db::connect(&config.database_url).await {
        Ok(store) => web::Data::from(store),
        Err(e) => {
            tracing::error!("Database connection failed: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Database connected successfully");

    if config.generation.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; /generate-content will fail");
    }
    let generator: web::Data<dyn TextGenerator> = match OpenAiClient::new(&config.generation) {
        Ok(client) => {
            let client: Arc<dyn TextGenerator> = Arc::new(client);
            web::Data::from(client)
        }
        Err(e) => {
            tracing::error!("HTTP client creation failed: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server started running on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(TracingLogger::default())
            .app_data(store.clone())
            .app_data(generator.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
