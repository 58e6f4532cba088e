// Character Ranking - Web Server
// Read-only REST API over the ranking repository for the dashboard

use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use character_ranking::statistics::{DEFAULT_SELECTION_SIZE, LATEST_CHANGES_LIMIT};
use character_ranking::{
    default_selection, generation_breakdown, latest_changes, load_repository, trend_series,
    vote_growth, vote_summary, CharacterId, Config, RankingRepository, VERSION,
};

/// Shared application state
///
/// The repository is immutable, so it is shared without a lock.
#[derive(Clone)]
struct AppState {
    repo: Arc<RankingRepository>,
    top_n: usize,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

/// Request error rendered in the same envelope as successful responses
struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::err(self.message))).into_response()
    }
}

/// `Path` whose rejections use the API envelope instead of plain text
struct ApiPath<T>(T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(ApiError {
                status: rejection.status(),
                message: rejection.body_text(),
            }),
        }
    }
}

/// `Query` whose rejections use the API envelope instead of plain text
struct ApiQuery<T>(T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiError {
                status: rejection.status(),
                message: rejection.body_text(),
            }),
        }
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

#[derive(Deserialize)]
struct TopQuery {
    n: Option<usize>,
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct TrendQuery {
    /// Comma-separated character ids; defaults to the latest top 5
    ids: Option<String>,
}

/// Parse "1,2,3", skipping anything that is not an id
fn parse_ids(raw: &str) -> Vec<CharacterId> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .map(CharacterId)
        .collect()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthStatus {
        status: "OK",
        version: VERSION,
    }))
}

/// Unknown API routes
async fn not_found() -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        message: "No such endpoint".to_string(),
    }
}

/// GET /api/years - Available years, ascending
async fn get_years(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.repo.available_years()))
}

/// GET /api/characters - Character catalog in load order
async fn get_characters(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.repo.characters().to_vec()))
}

/// GET /api/characters/:id - One character, `null` when unknown
async fn get_character(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(
        state.repo.character_info(CharacterId(id)).cloned(),
    ))
}

/// GET /api/characters/:id/history - Sparse ranking history
async fn get_character_history(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u32>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(
        state.repo.character_ranking_history(CharacterId(id)),
    ))
}

/// GET /api/rankings/:year - Full ranking of a year
async fn get_ranking(
    State(state): State<AppState>,
    ApiPath(year): ApiPath<i32>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(state.repo.ranking_by_year(year).to_vec()))
}

/// GET /api/rankings/:year/top?n= - Top n with character records
async fn get_top(
    State(state): State<AppState>,
    ApiPath(year): ApiPath<i32>,
    ApiQuery(query): ApiQuery<TopQuery>,
) -> impl IntoResponse {
    let top_n = query.n.unwrap_or(state.top_n);
    Json(ApiResponse::ok(state.repo.top_characters(year, top_n)))
}

/// GET /api/changes/:current/:previous - Rank changes between two years
async fn get_changes(
    State(state): State<AppState>,
    ApiPath((current, previous)): ApiPath<(i32, i32)>,
) -> impl IntoResponse {
    Json(ApiResponse::ok(state.repo.ranking_changes(current, previous)))
}

/// GET /api/changes/latest?limit= - Rank changes between the two latest years
async fn get_latest_changes(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(LATEST_CHANGES_LIMIT);
    Json(ApiResponse::ok(latest_changes(&state.repo, limit)))
}

/// GET /api/totals - Stored total votes per year
async fn get_totals(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.repo.total_votes_by_year().clone()))
}

/// GET /api/votes/growth - Totals with year-over-year growth
async fn get_vote_growth(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(vote_growth(&state.repo)))
}

/// GET /api/votes/summary - Aggregate vote statistics
async fn get_vote_summary(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(vote_summary(&state.repo)))
}

/// GET /api/generations/:year?n= - Top n split by generation
async fn get_generations(
    State(state): State<AppState>,
    ApiPath(year): ApiPath<i32>,
    ApiQuery(query): ApiQuery<TopQuery>,
) -> impl IntoResponse {
    let top_n = query.n.unwrap_or(30);
    Json(ApiResponse::ok(generation_breakdown(&state.repo, year, top_n)))
}

/// GET /api/trends?ids=1,2,3 - Dense rank/vote series for the chart views
async fn get_trends(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TrendQuery>,
) -> impl IntoResponse {
    let ids = match query.ids.as_deref() {
        Some(raw) => parse_ids(raw),
        None => default_selection(&state.repo, DEFAULT_SELECTION_SIZE),
    };
    Json(ApiResponse::ok(trend_series(&state.repo, &ids)))
}

// ============================================================================
// Router
// ============================================================================

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/years", get(get_years))
        .route("/characters", get(get_characters))
        .route("/characters/:id", get(get_character))
        .route("/characters/:id/history", get(get_character_history))
        .route("/rankings/:year", get(get_ranking))
        .route("/rankings/:year/top", get(get_top))
        .route("/changes/latest", get(get_latest_changes))
        .route("/changes/:current/:previous", get(get_changes))
        .route("/totals", get(get_totals))
        .route("/votes/growth", get(get_vote_growth))
        .route("/votes/summary", get(get_vote_summary))
        .route("/generations/:year", get(get_generations))
        .route("/trends", get(get_trends))
        .fallback(not_found)
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Character catalog: {}", config.characters_path.display());
    tracing::info!("Ranking data: {}", config.rankings_path.display());

    let repo = load_repository(&config)?;

    let state = AppState {
        repo: Arc::new(repo),
        top_n: config.top_n,
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
