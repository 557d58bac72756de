use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use opportunity_matcher::config::{LoggingSettings, Settings};
use opportunity_matcher::routes::{self, handle_json_payload_error, AppState};
use opportunity_matcher::services::ResultCache;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over LOG_LEVEL and the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&settings.logging.clone().with_env_overrides());

    info!("Starting opportunity matcher...");

    // Reject bad weights before serving anything
    let matcher = match settings.scoring.build_matcher() {
        Ok(matcher) => matcher,
        Err(e) => {
            error!("Failed to build matcher: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    info!(
        "Matcher initialized with weights: {:?}, thresholds: {:?}",
        matcher.weights(),
        matcher.thresholds()
    );

    let cache = if settings.cache.enabled {
        info!(
            "Result cache enabled ({} entries, TTL: {}s)",
            settings.cache.capacity, settings.cache.ttl_secs
        );
        Some(Arc::new(ResultCache::new(settings.cache.capacity, settings.cache.ttl_secs)))
    } else {
        info!("Result cache disabled");
        None
    };

    let app_state = AppState { matcher, cache };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
