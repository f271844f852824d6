//! HTTP server for constituency lookups.
//!
//! Loads the boundary and record data once on a blocking task and answers
//! lookups, constituency listings and boundary GeoJSON requests. Until the
//! data is published every data endpoint answers 503.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use constituency::config::{BoundsConfig, Config, DataConfig};
use constituency::loader::geojson::BoundaryFeatureCollection;
use constituency::loader::load_data_store;
use constituency::{ParentMapper, RepresentativeRecord, StoreError, StoreHandle};

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Constituency lookup server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory holding ac_bangalore.geojson, ac_data.json and pc_data.json
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    store: StoreHandle,
    bounds: BoundsConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(dir) = args.data_dir {
        config.data = DataConfig::in_dir(dir);
    }

    info!("Constituency Lookup Server");

    let state = Arc::new(AppState {
        store: StoreHandle::uninitialized(),
        bounds: config.bounds,
    });

    spawn_loader(Arc::clone(&state), config.data.clone());

    let app = router(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load the data set off the async runtime and publish it when done.
fn spawn_loader(state: Arc<AppState>, data: DataConfig) {
    tokio::task::spawn_blocking(move || {
        match load_data_store(&data, ParentMapper::bangalore()) {
            Ok((store, report)) => {
                if !report.is_clean() {
                    warn!(
                        "Loaded with {} skipped, {} unnamed and {} unmapped boundaries",
                        report.skipped.len(),
                        report.unnamed,
                        report.unmapped.len()
                    );
                }
                if let Err(e) = state.store.publish(store) {
                    error!("Failed to publish data store: {}", e);
                }
            }
            Err(e) => error!("Failed to load data, serving 503s: {:#}", e),
        }
    });
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/lookup", get(lookup_handler))
        .route("/api/v1/constituencies", get(constituencies_handler))
        .route(
            "/api/v1/constituencies/geojson/{ac_name}",
            get(boundary_geojson_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Errors surfaced to HTTP clients as `{"detail": ...}`
#[derive(Debug, Error)]
enum ApiError {
    #[error("Data store not initialised.")]
    NotReady,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Invalid(String),
}

impl From<StoreError> for ApiError {
    fn from(_: StoreError) -> Self {
        ApiError::NotReady
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Serialize)]
struct RootResponse {
    status: &'static str,
    message: &'static str,
}

/// Root health check, answers even before the data is loaded
async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok",
        message: "Constituency lookup API is running.",
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    ac_constituencies_loaded: usize,
    pc_constituencies_loaded: usize,
    loaded_at: String,
}

/// Detailed health check with loaded counts
async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let stats = state.store.get()?.stats();

    Ok(Json(HealthResponse {
        status: "ok",
        ac_constituencies_loaded: stats.boundaries,
        pc_constituencies_loaded: stats.parent_records,
        loaded_at: stats.loaded_at.to_rfc3339(),
    }))
}

#[derive(Deserialize)]
struct LookupParams {
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
struct LookupResponse {
    latitude: f64,
    longitude: f64,
    mla: RepresentativeRecord,
    mp: RepresentativeRecord,
}

/// Resolve a coordinate to its MLA and MP
async fn lookup_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Json<LookupResponse>, ApiError> {
    let Query(LookupParams { lat, lon }) =
        params.map_err(|e| ApiError::Invalid(e.body_text()))?;

    let bounds = &state.bounds;
    if !bounds.contains(lat, lon) {
        return Err(ApiError::Invalid(format!(
            "Coordinates ({}, {}) outside the supported range: lat {}..{}, lon {}..{}",
            lat, lon, bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
        )));
    }

    let store = state.store.get()?;

    let Some(resolution) = store.resolve(lat, lon) else {
        warn!("No representatives found for ({:.6}, {:.6})", lat, lon);
        return Err(ApiError::NotFound(format!(
            "No representatives found for coordinates ({}, {}). \
             Ensure the point falls within Bangalore city limits.",
            lat, lon
        )));
    };

    Ok(Json(LookupResponse {
        latitude: lat,
        longitude: lon,
        mla: resolution.boundary_record,
        mp: resolution.parent_record,
    }))
}

#[derive(Serialize)]
struct ConstituenciesResponse {
    assembly_constituencies: Vec<String>,
    parliamentary_constituencies: Vec<String>,
}

/// All loaded assembly and parliamentary constituency names
async fn constituencies_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConstituenciesResponse>, ApiError> {
    let names = state.store.get()?.known_names();

    Ok(Json(ConstituenciesResponse {
        assembly_constituencies: names.boundaries,
        parliamentary_constituencies: names.parents,
    }))
}

/// GeoJSON for a single assembly constituency (case-insensitive name)
async fn boundary_geojson_handler(
    State(state): State<Arc<AppState>>,
    Path(ac_name): Path<String>,
) -> Result<Response, ApiError> {
    let store = state.store.get()?;

    let boundary = store.boundary_geometry(&ac_name).ok_or_else(|| {
        ApiError::NotFound(format!("Assembly constituency '{}' not found.", ac_name))
    })?;

    Ok(Json(BoundaryFeatureCollection::from(&**boundary)).into_response())
}
