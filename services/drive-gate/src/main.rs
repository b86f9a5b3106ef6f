//! drive-gate
//!
//! Single-binary service that fronts a Google Drive file listing behind an
//! OAuth2 login:
//! 1. Classifies every request against the session cookie
//! 2. Redirects unauthenticated browsers to the provider login
//! 3. Mints short-lived server-side sessions on the /auth callback
//! 4. Renders the file listing for authenticated sessions

mod clock;
mod config;
mod error;
mod handler;
mod metrics;
mod render;
mod state;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metrics_exporter_prometheus::PrometheusHandle;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::handler::{AppState, build_router};
use crate::metrics::ServiceMetrics;

/// State for the internal health/metrics listener.
#[derive(Clone)]
struct InternalState {
    metrics: ServiceMetrics,
    prometheus: PrometheusHandle,
}

/// Internal observability router. Served on its own listener so the public
/// surface stays exactly login-redirect / callback / content / 404.
fn build_internal_router(state: InternalState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("starting drive-gate");

    // Install the Prometheus recorder before any metrics are emitted
    let prometheus_handle = metrics::install_recorder();

    // CLI: simple --config flag parsing
    let args: Vec<String> = std::env::args().collect();
    let cli_config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let config_path = Config::resolve_path(cli_config_path);
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        listen_addr = %config.server.listen_addr,
        local = config.server.local,
        client_id = %config.oauth.client_id,
        "configuration loaded"
    );

    let store = session::RedisSessionStore::connect(&config.session.redis_url)
        .await
        .context("failed to connect to the session store")?;

    let client_secret = config
        .oauth
        .client_secret
        .context("oauth client secret missing")?;
    let provider = google_auth::GoogleDrive::new(
        reqwest::Client::new(),
        config.oauth.client_id.clone(),
        client_secret,
    );

    let service_metrics = ServiceMetrics::new();

    let app_state = AppState {
        provider: Arc::new(provider),
        store: Arc::new(store),
        ids: Arc::new(session::RandomIdIssuer),
        clock: Arc::new(SystemClock),
        local: config.server.local,
        fallback_host: config.server.listen_addr.to_string(),
        metrics: service_metrics.clone(),
    };

    let app = build_router(app_state, config.server.max_connections);

    let internal_state = InternalState {
        metrics: service_metrics,
        prometheus: prometheus_handle,
    };
    let internal_listener = TcpListener::bind(config.server.admin_addr)
        .await
        .with_context(|| {
            format!(
                "failed to bind internal listener to {}",
                config.server.admin_addr
            )
        })?;
    info!(addr = %config.server.admin_addr, "internal listener ready");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(internal_listener, build_internal_router(internal_state)).await
        {
            error!(error = %e, "internal listener failed");
        }
    });

    let listener = TcpListener::bind(config.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.server.listen_addr))?;
    info!(addr = %config.server.listen_addr, "accepting requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

/// Health endpoint: uptime, request count, and background-failure count.
async fn health_handler(State(state): State<InternalState>) -> impl IntoResponse {
    let uptime = state.metrics.started_at.elapsed().as_secs();
    let requests = state.metrics.requests_total.load(Ordering::Relaxed);
    let background_failures = state.metrics.background_failures.load(Ordering::Relaxed);

    (
        axum::http::StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        serde_json::json!({
            "status": "healthy",
            "uptime_seconds": uptime,
            "requests_served": requests,
            "background_failures": background_failures,
        })
        .to_string(),
    )
}

/// Prometheus metrics endpoint — returns metrics in text exposition format.
async fn metrics_handler(State(state): State<InternalState>) -> impl IntoResponse {
    (
        axum::http::StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.prometheus.render(),
    )
}

/// Wait for SIGTERM or SIGINT for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    /// Create a PrometheusHandle for tests without installing a global
    /// recorder. Using build_recorder() avoids the "recorder already
    /// installed" panic when multiple tests run in the same process.
    fn test_prometheus_handle() -> PrometheusHandle {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        recorder.handle()
    }

    fn internal_state() -> InternalState {
        InternalState {
            metrics: ServiceMetrics::new(),
            prometheus: test_prometheus_handle(),
        }
    }

    #[tokio::test]
    async fn health_endpoint_returns_json_counters() {
        let state = internal_state();
        state
            .metrics
            .requests_total
            .fetch_add(5, std::sync::atomic::Ordering::Relaxed);

        let app = build_internal_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "healthy");
        assert_eq!(json["requests_served"], 5);
        assert_eq!(json["background_failures"], 0);
        assert!(json["uptime_seconds"].is_u64());
    }

    #[tokio::test]
    async fn metrics_endpoint_returns_prometheus_format() {
        let app = build_internal_router(internal_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(
            content_type.contains("text/plain"),
            "metrics endpoint must return text/plain Prometheus format"
        );
    }

    #[tokio::test]
    async fn internal_router_has_no_public_routes() {
        let app = build_internal_router(internal_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
