use actix_cors::Cors;
use actix_web::middleware::{Compress, Logger};
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod invoice;
pub mod loadgen;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(crate::invoice::handlers::generate_invoice),
    components(schemas(invoice::models::InvoiceData, ErrorResponse)),
    tags((name = "Invoice", description = "Commercial invoice PDF generation."))
)]
pub struct ApiDoc;

fn cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600);

    if allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }
    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

/// Register every route of the service on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(invoice::handlers::config).service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
    );
}

pub async fn run() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "Failed to prepare invoice renderer. Check INVOICE_TEMPLATE_PATH and INVOICE_FONT_PATH. Error: {}",
                e
            );
            std::process::exit(1);
        }
    };

    match app_state.counter.peek() {
        Ok(next) => log::info!(
            "Next invoice number is {} (counter file: {})",
            next,
            config.counter_file.display()
        ),
        Err(e) => log::warn!("Invoice counter is not usable yet, requests will fail: {}", e),
    }

    let prometheus = PrometheusMetricsBuilder::new("proforma_invoice_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let json_limit = config.json_payload_limit;
    let allowed_origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors(&allowed_origins))
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .app_data(invoice::handlers::json_config(json_limit))
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
