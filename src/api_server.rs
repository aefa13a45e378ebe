use crate::app_config::AppConfig;
use crate::batch::{ChainSource, ErrorResponse};
use crate::nse::NSEClient;
use crate::pipeline::{self, reporter_from_config};
use crate::report::Reporter;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

pub const NO_STORE: &str = "no-store, no-cache, must-revalidate";

// -----------------------------------------------
// APPLICATION STATE
// -----------------------------------------------

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    source: Arc<dyn ChainSource>,
    reporter: Reporter,
}

impl AppState {
    pub fn new(config: AppConfig, source: Arc<dyn ChainSource>, reporter: Reporter) -> Self {
        Self {
            config: Arc::new(config),
            source,
            reporter,
        }
    }

    /// State backed by the live exchange client.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let source: Arc<dyn ChainSource> = Arc::new(NSEClient::new()?);
        let reporter = reporter_from_config(&config)?;
        Ok(Self::new(config, source, reporter))
    }
}

// -----------------------------------------------
// API HANDLERS
// -----------------------------------------------

/// GET /api/stock-oi - Run the full analysis and return the ranked dataset
async fn get_stock_oi(State(app_state): State<AppState>) -> Response {
    info!("stock OI analysis requested");

    match pipeline::run_pipeline(&app_state.config, app_state.source.clone(), &app_state.reporter).await {
        Ok(outcome) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, NO_STORE)],
            Json(outcome.response()),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "stock OI analysis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CACHE_CONTROL, NO_STORE)],
                Json(ErrorResponse::new(e)),
            )
                .into_response()
        }
    }
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/stock-oi", get(get_stock_oi))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub async fn start_server(config: AppConfig) -> Result<()> {
    let addr = format!("127.0.0.1:{}", config.port);
    let app = router(AppState::from_config(config)?);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("🚀 NSE OI Tracker running on http://{}", addr);
    println!("📋 Available endpoints:");
    println!("   GET  /api/stock-oi");
    println!("   GET  /health");
    println!();

    axum::serve(listener, app).await?;
    Ok(())
}
