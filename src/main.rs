use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use chavruta_match::config::{LoggingSettings, Settings};
use chavruta_match::core::MatchEngine;
use chavruta_match::routes::{self, AppState};
use chavruta_match::services::{
    CandidateSource, DemoCandidateSource, LoggingRatingSink, RatingSink, ReferenceCatalog,
    RemoteCandidateSource, RemoteRatingSink, ScheduleCache,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // LOG_LEVEL / LOG_FORMAT win over the [logging] section
    let logging = logging.overridden(
        std::env::var("LOG_LEVEL").ok(),
        std::env::var("LOG_FORMAT").ok(),
    );

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        )
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

fn build_candidate_source(
    settings: &Settings,
    catalog: &ReferenceCatalog,
) -> std::io::Result<Arc<dyn CandidateSource>> {
    match settings.candidates.source.as_str() {
        "demo" => {
            let demo = DemoCandidateSource::new(settings.demo.seed, settings.demo.pool_size)
                .with_simulated_delay(Duration::from_millis(settings.demo.simulated_delay_ms))
                .with_extra_topics(catalog.topic_ids().into_iter().collect());
            Ok(Arc::new(demo))
        }
        "remote" => {
            let endpoint = settings
                .candidates
                .endpoint
                .clone()
                .ok_or_else(|| io_error("candidates.endpoint is required for the remote source".into()))?;
            let timeout = Duration::from_secs(settings.candidates.timeout_secs.unwrap_or(10));
            let remote = RemoteCandidateSource::new(endpoint, settings.candidates.api_key.clone(), timeout)
                .map_err(|e| io_error(format!("Failed to build candidate client: {}", e)))?;
            Ok(Arc::new(remote))
        }
        other => Err(io_error(format!("Unknown candidate source: {}", other))),
    }
}

fn build_rating_sink(settings: &Settings) -> std::io::Result<Arc<dyn RatingSink>> {
    match settings.ratings.sink.as_str() {
        "log" => Ok(Arc::new(LoggingRatingSink::new())),
        "remote" => {
            let endpoint = settings
                .ratings
                .endpoint
                .clone()
                .ok_or_else(|| io_error("ratings.endpoint is required for the remote sink".into()))?;
            let timeout = Duration::from_secs(settings.ratings.timeout_secs.unwrap_or(10));
            let remote = RemoteRatingSink::new(endpoint, settings.ratings.api_key.clone(), timeout)
                .map_err(|e| io_error(format!("Failed to build rating client: {}", e)))?;
            Ok(Arc::new(remote))
        }
        other => Err(io_error(format!("Unknown rating sink: {}", other))),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();
    let default_logging = LoggingSettings::default();
    init_logging(
        settings
            .as_ref()
            .map(|s| &s.logging)
            .unwrap_or(&default_logging),
    );

    info!("Starting Chavruta matching service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io_error(format!("Configuration error: {}", e))
    })?;

    info!("Configuration loaded successfully");

    let catalog = match &settings.catalog.path {
        Some(path) => ReferenceCatalog::load(path).map_err(|e| {
            error!("Failed to load catalog from {}: {}", path, e);
            io_error(format!("Catalog error: {}", e))
        })?,
        None => ReferenceCatalog::builtin(),
    };

    info!(
        "Catalog ready ({} stations, {} topics)",
        catalog.stations().len(),
        catalog.topics().len()
    );

    let candidates = build_candidate_source(&settings, &catalog)?;
    let ratings = build_rating_sink(&settings)?;

    info!(
        "Collaborators initialized (candidates: {}, ratings: {})",
        candidates.name(),
        ratings.name()
    );

    let cache_capacity = settings.cache.capacity.unwrap_or(1000);
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(3600);
    let schedules = ScheduleCache::new(cache_capacity, cache_ttl);

    info!("Schedule cache initialized ({} entries, TTL: {}s)", cache_capacity, cache_ttl);

    let policy = settings.scoring.policy();
    if policy.base_floor > 100 {
        return Err(io_error(format!(
            "scoring.base_floor must be at most 100, got {}",
            policy.base_floor
        )));
    }
    let engine = MatchEngine::new(policy);

    info!("Match engine initialized with policy: {:?}", policy);

    let app_state = AppState {
        catalog: Arc::new(catalog),
        engine,
        schedules,
        candidates,
        ratings,
        matching: settings.matching.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .app_data(routes::query_config())
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
