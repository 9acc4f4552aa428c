use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::bounds::GeoBounds;
use crate::map::render_map_page;
use crate::normalize::{GeoResult, QueryKind, StrikeRecord, TimeRange};
use crate::services::{BatchReport, BatchRunner, GeocodeService, LightningService, LightningSummary};
use crate::snapshot::{LightningSnapshot, SnapshotStore};

/// Upper limit for a caller-supplied batch delay
pub const MAX_BATCH_DELAY_MS: u64 = 5_000;

/// Largest batch accepted by `POST /api/geocode/batch`
pub const MAX_BATCH_QUERIES: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub lightning_service: LightningService,
    pub geocode_service: GeocodeService,
    pub batch_delay: Duration,
    pub snapshots: Arc<SnapshotStore>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub last_update: Option<DateTime<Utc>>,
    pub has_cached_data: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct RefreshResponse {
    pub success: bool,
    pub lightning_data: LightningSummary,
    pub map_html: String,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LightningParams {
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GeocodeParams {
    /// Postal code, address or building name
    pub q: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchGeocodeRequest {
    /// At most 100 queries
    pub queries: Vec<String>,
    /// Pause between lookups, capped at 5000 ms
    pub delay_ms: Option<u64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        index,
        map_only,
        health,
        get_lightning,
        refresh,
        status,
        geocode,
        batch_geocode
    ),
    components(schemas(
        HealthResponse,
        StatusResponse,
        RefreshResponse,
        LightningSummary,
        StrikeRecord,
        TimeRange,
        GeoBounds,
        GeoResult,
        QueryKind,
        BatchReport,
        BatchGeocodeRequest
    )),
    tags(
        (name = "lightning", description = "Real-time lightning observations"),
        (name = "geocoding", description = "Singapore postal code and address lookup"),
        (name = "system", description = "Health and status")
    )
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Write the document as pretty JSON and return how many paths it lists
pub fn write_openapi_spec(path: &Path) -> std::io::Result<usize> {
    let spec = generate_openapi_spec();
    fs::write(path, spec.to_pretty_json()?)?;
    Ok(spec.paths.paths.len())
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/lightning", get(get_lightning))
        .route("/refresh", get(refresh))
        .route("/status", get(status))
        .route("/geocode", get(geocode))
        .route("/geocode/batch", post(batch_geocode));

    Router::new()
        .route("/", get(index))
        .route("/map-only", get(map_only))
        .route("/health", get(health))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Map for a summary; a failed summary gets an empty map
fn render_summary_map(summary: &LightningSummary) -> String {
    if summary.success {
        render_map_page(&summary.coordinates, &summary.bounds)
    } else {
        render_map_page(&[], &summary.bounds)
    }
}

/// Failed summaries never replace the last good snapshot
fn publish_if_successful(state: &AppState, summary: &LightningSummary, map_html: &str) {
    if summary.success {
        state.snapshots.publish(LightningSnapshot {
            summary: summary.clone(),
            map_html: map_html.to_string(),
            updated_at: Utc::now(),
        });
        debug!("Published new lightning snapshot");
    } else {
        warn!(
            "Keeping previous snapshot, fetch failed: {}",
            summary.error.as_deref().unwrap_or("unknown error")
        );
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "lightning",
    responses((status = 200, description = "Lightning map page", content_type = "text/html", body = String))
)]
#[instrument(skip(state))]
async fn index(State(state): State<AppState>) -> Html<String> {
    debug!("Rendering lightning map page");
    let summary = state.lightning_service.get_lightning_summary(None).await;
    let map_html = render_summary_map(&summary);
    publish_if_successful(&state, &summary, &map_html);
    Html(map_html)
}

#[utoipa::path(
    get,
    path = "/map-only",
    tag = "lightning",
    responses((status = 200, description = "Most recent map, or a fresh one", content_type = "text/html", body = String))
)]
#[instrument(skip(state))]
async fn map_only(State(state): State<AppState>) -> Html<String> {
    if let Some(snapshot) = state.snapshots.latest() {
        debug!("Serving map from snapshot taken at {}", snapshot.updated_at);
        return Html(snapshot.map_html.clone());
    }

    debug!("No snapshot yet, rendering a fresh map");
    let summary = state.lightning_service.get_lightning_summary(None).await;
    Html(render_summary_map(&summary))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/lightning",
    tag = "lightning",
    params(LightningParams),
    responses((status = 200, description = "Lightning summary; check `success`", body = LightningSummary))
)]
#[instrument(skip(state))]
async fn get_lightning(
    State(state): State<AppState>,
    Query(params): Query<LightningParams>,
) -> Json<LightningSummary> {
    let summary = state
        .lightning_service
        .get_lightning_summary(params.date.as_deref())
        .await;

    if summary.success {
        info!("Returning {} lightning strikes", summary.total_strikes);
    } else {
        error!(
            "Lightning summary failed: {}",
            summary.error.as_deref().unwrap_or("unknown error")
        );
    }
    Json(summary)
}

#[utoipa::path(
    get,
    path = "/api/refresh",
    tag = "lightning",
    responses((status = 200, description = "Fresh summary and map", body = RefreshResponse))
)]
#[instrument(skip(state))]
async fn refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    let summary = state.lightning_service.get_lightning_summary(None).await;
    let map_html = render_summary_map(&summary);
    publish_if_successful(&state, &summary, &map_html);

    info!("Refresh completed, success: {}", summary.success);
    Json(RefreshResponse {
        success: summary.success,
        last_update: state.snapshots.last_update(),
        lightning_data: summary,
        map_html,
    })
}

#[utoipa::path(
    get,
    path = "/api/status",
    tag = "system",
    responses((status = 200, description = "Service status", body = StatusResponse))
)]
#[instrument(skip(state))]
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let last_update = state.snapshots.last_update();
    Json(StatusResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        has_cached_data: last_update.is_some(),
        last_update,
        timestamp: Utc::now(),
    })
}

#[utoipa::path(
    get,
    path = "/api/geocode",
    tag = "geocoding",
    params(GeocodeParams),
    responses((status = 200, description = "Geocoding result; check `success`", body = GeoResult))
)]
#[instrument(skip(state))]
async fn geocode(
    State(state): State<AppState>,
    Query(params): Query<GeocodeParams>,
) -> Json<GeoResult> {
    Json(state.geocode_service.geocode(&params.q).await)
}

#[utoipa::path(
    post,
    path = "/api/geocode/batch",
    tag = "geocoding",
    request_body = BatchGeocodeRequest,
    responses(
        (status = 200, description = "Results in input order with counts", body = BatchReport),
        (status = 400, description = "More than 100 queries")
    )
)]
#[instrument(skip(state, request), fields(count = request.queries.len()))]
async fn batch_geocode(
    State(state): State<AppState>,
    Json(request): Json<BatchGeocodeRequest>,
) -> Result<Json<BatchReport>, StatusCode> {
    if request.queries.len() > MAX_BATCH_QUERIES {
        warn!(
            "Rejecting batch of {} queries (limit {})",
            request.queries.len(),
            MAX_BATCH_QUERIES
        );
        return Err(StatusCode::BAD_REQUEST);
    }

    let delay = request
        .delay_ms
        .map(|ms| Duration::from_millis(ms.min(MAX_BATCH_DELAY_MS)))
        .unwrap_or(state.batch_delay);

    let runner = BatchRunner::new(state.geocode_service.clone(), delay);
    let report = runner.run(&request.queries).await;

    info!(
        "Batch geocoding: {} successful, {} failed",
        report.successful, report.failed
    );
    Ok(Json(report))
}
