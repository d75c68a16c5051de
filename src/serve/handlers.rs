//! Route handlers and request/response types.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use tabimap::config::RegionPreset;
use tabimap::{
    BoundingBox, CategoryCatalog, Config, OverpassClient, SearchRequest, SearchStatus,
    SortOrder, SpotFilter, SpotPipeline, SpotView,
};

const MSG_EMPTY_SELECTION: &str = "カテゴリを選択してください。";
const MSG_NO_RESULTS: &str = "この範囲には指定カテゴリのスポットが見つかりませんでした。";

/// Application state shared across handlers
pub struct AppState {
    pub catalog: CategoryCatalog,
    pub client: OverpassClient,
    pub config: Config,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/categories", get(categories_handler))
        .route("/v1/regions", get(regions_handler))
        .route("/v1/spots", post(spots_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[derive(Serialize, Deserialize)]
pub struct CategoryInfo {
    pub label: String,
    pub predicates: usize,
    /// Pre-selected in the sidebar
    pub default: bool,
}

async fn categories_handler(State(state): State<Arc<AppState>>) -> Json<Vec<CategoryInfo>> {
    let defaults = state.catalog.default_labels();
    Json(
        state
            .catalog
            .categories()
            .iter()
            .map(|c| CategoryInfo {
                label: c.label.clone(),
                predicates: c.predicates.len(),
                default: defaults.contains(&c.label.as_str()),
            })
            .collect(),
    )
}

async fn regions_handler(State(state): State<Arc<AppState>>) -> Json<Vec<RegionPreset>> {
    Json(state.config.region_presets())
}

#[derive(Deserialize)]
pub struct SpotsRequest {
    /// Drawn polygon ring as [lon, lat] pairs
    #[serde(default)]
    pub polygon: Option<Vec<[f64; 2]>>,
    /// Explicit [south, west, north, east]
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub filter: SpotFilter,
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Serialize)]
pub struct SpotsResponse {
    status: SearchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    count: usize,
    bbox: BoundingBox,
    spots: Vec<SpotView>,
    took_ms: u128,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn region_from(req: &SpotsRequest) -> Result<BoundingBox, ApiError> {
    let result = match (&req.polygon, &req.bbox) {
        (Some(ring), _) => BoundingBox::from_ring(ring),
        (None, Some([south, west, north, east])) => {
            BoundingBox::new(*south, *west, *north, *east)
        }
        (None, None) => {
            return Err(bad_request("either `polygon` or `bbox` is required".to_string()))
        }
    };
    result.map_err(|e| bad_request(e.to_string()))
}

fn bad_request(message: String) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            kind: "invalid_region".to_string(),
            message,
            status: None,
        }),
    )
}

/// Run one search for a drawn region
async fn spots_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpotsRequest>,
) -> Result<Json<SpotsResponse>, ApiError> {
    let start = Instant::now();
    let bbox = region_from(&req)?;

    let request = SearchRequest {
        bbox,
        categories: req.categories,
        filter: req.filter,
        sort: req.sort,
    };

    let pipeline = SpotPipeline::new(
        &state.catalog,
        &state.client,
        state.config.overpass.server_timeout_secs,
    );

    let outcome = pipeline.run(&request).await.map_err(|e| {
        error!("Spot search failed: {}", e);
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                kind: e.kind().as_str().to_string(),
                message: e.to_string(),
                status: e.status(),
            }),
        )
    })?;

    let status = outcome.status();
    let message = match status {
        SearchStatus::Found => None,
        SearchStatus::NoResults => Some(MSG_NO_RESULTS),
        SearchStatus::EmptySelection => Some(MSG_EMPTY_SELECTION),
    };

    let origin = bbox.center();
    let spots: Vec<SpotView> = outcome
        .spots()
        .iter()
        .map(|s| SpotView::new(s, Some(origin), &state.config.search_link))
        .collect();

    Ok(Json(SpotsResponse {
        status,
        message,
        count: spots.len(),
        bbox,
        spots,
        took_ms: start.elapsed().as_millis(),
    }))
}
