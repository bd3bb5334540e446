//! HTTP surface: routes, CORS, request tracing and the serve loop.

use crate::app::state::AppState;
use crate::config::validate_provider;
use crate::domain::model::{ApiResult, JobListing, TaxonomyResults};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ProxyError, Result};
use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// 只允許清單內的 origin，並允許帶 credentials
///
/// Methods and headers are mirrored from the preflight request, since a
/// wildcard cannot be combined with credentials.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| ProxyError::InvalidConfigValueError {
                field: "server.allowed_origins".to_string(),
                value: origin.clone(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/jobs", get(list_jobs))
        .route("/api/taxonomy/search", get(search_taxonomy))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins)?);

    Ok(router)
}

/// Validates the configuration, binds the configured address and serves
/// until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the upstream client
/// cannot be built or the address cannot be bound.
pub async fn serve<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    let addr = validate_provider(config)?;
    let state = AppState::from_config(config)?;
    let app = router(state, config.allowed_origins())?;

    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("🚀 Listening on http://{}", local_addr);
    tracing::info!("   jobs upstream: {}", config.job_search_endpoint());
    tracing::info!("   taxonomy upstream: {}", config.taxonomy_endpoint());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "timestamp": Utc::now().to_rfc3339()
    }))
}

async fn list_jobs(State(state): State<Arc<AppState>>) -> Json<ApiResult<JobListing>> {
    Json(state.jobs.latest_jobs().await)
}

async fn search_taxonomy(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<ApiResult<TaxonomyResults>> {
    let text = last_query_value(params, "q")
        .unwrap_or_else(|| state.taxonomy.default_text().to_string());

    Json(state.taxonomy.search(&text).await)
}

/// 重複的參數以最後一個為準
fn last_query_value(params: Vec<(String, String)>, key: &str) -> Option<String> {
    params
        .into_iter()
        .rev()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("⚡ Received Ctrl+C, shutting down gracefully..."),
        () = terminate => tracing::info!("⚡ Received SIGTERM, shutting down gracefully..."),
    }
}
