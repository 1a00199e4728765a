//! HTTP API over the search and registry pipelines.
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/` | GET | `index.html` from the public directory |
//! | `/public/*` | GET | Static assets from the public directory |
//! | `/search?q=` | GET | Name search results |
//! | `/details?cin=` | GET | Company details for a CIN |
//!
//! Errors are returned as `{"detail": "..."}`.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use cinfinder_registry::{CompanyRegistry, Resolution};
use cinfinder_search::NameSearch;
use cinfinder_shared::{AppConfig, CompanyDetails, SearchRecord};
use color_eyre::eyre::{Result, eyre};
use serde::Deserialize;
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

/// Shortest accepted name query.
const MIN_QUERY_LEN: usize = 2;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Pipelines and paths shared by all handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    search: Arc<NameSearch>,
    registry: Arc<CompanyRegistry>,
    public_dir: PathBuf,
}

impl AppState {
    pub(crate) fn new(config: &AppConfig) -> cinfinder_shared::Result<Self> {
        Ok(Self {
            search: Arc::new(NameSearch::new(config.search.clone())?),
            registry: Arc::new(CompanyRegistry::new(config.registry.clone())?),
            public_dir: PathBuf::from(&config.server.public_dir),
        })
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error response rendered as `{"detail": ...}`.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub(crate) fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/search", get(search_company))
        .route("/details", get(company_details));

    if state.public_dir.is_dir() {
        router = router.nest_service("/public", ServeDir::new(&state.public_dir));
    }

    router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl+C.
pub(crate) async fn serve(config: AppConfig) -> Result<()> {
    let state = AppState::new(&config)?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("failed to bind {addr}: {e}"))?;

    info!(%addr, public_dir = %config.server.public_dir, "HTTP API listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await?;

    Ok(())
}

/// Resolve once `signal` fires.
///
/// If the signal handler cannot be installed the error is logged and the
/// server keeps running instead of shutting down on the spot.
async fn shutdown_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "failed to listen for Ctrl+C; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let path = state.public_dir.join("index.html");
    tokio::fs::read_to_string(&path)
        .await
        .map(Html)
        .map_err(|_| ApiError::new(StatusCode::NOT_FOUND, "index.html not found"))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

async fn search_company(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchRecord>>, ApiError> {
    let query = params
        .q
        .filter(|q| q.chars().count() >= MIN_QUERY_LEN)
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("query parameter 'q' must be at least {MIN_QUERY_LEN} characters"),
            )
        })?;

    state.search.search(&query).await.map(Json).map_err(|e| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to fetch search results: {e}"),
        )
    })
}

#[derive(Debug, Deserialize)]
struct DetailsParams {
    cin: Option<String>,
}

async fn company_details(
    State(state): State<AppState>,
    Query(params): Query<DetailsParams>,
) -> Result<Json<CompanyDetails>, ApiError> {
    let cin = params.cin.filter(|c| !c.is_empty()).ok_or_else(|| {
        ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "query parameter 'cin' is required",
        )
    })?;

    match state.registry.resolve_and_extract(&cin).await {
        Ok(Resolution::Found(details)) => Ok(Json(details)),
        Ok(Resolution::NotFound) => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("Company with CIN {cin} not found"),
        )),
        Err(e) => {
            warn!(%cin, error = %e, "details lookup failed");
            Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
