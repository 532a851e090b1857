use anyhow::Result;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum_server::tls_rustls::RustlsConfig;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use crate::config::Config;
use crate::db::DbPool;
use crate::metrics::IntakeMetrics;
use middleware::throttle::RateLimiter;

pub mod router;
pub mod middleware;
pub mod handlers;
pub mod validators;

pub struct AppState {
    pub db: DbPool,
    /// Full `Authorization` header value a request must present.
    pub expected_authorization: String,
    /// Per-caller limit on lead creation.
    pub lead_throttle: RateLimiter,
    pub metrics: IntakeMetrics,
}

impl AppState {
    pub fn new(db: DbPool, cfg: &Config) -> Self {
        Self {
            db,
            expected_authorization: crate::auth::api_key::expected_header(&cfg.auth.api_key),
            lead_throttle: RateLimiter::per_hour(cfg.throttle.lead_create_per_hour),
            metrics: IntakeMetrics::default(),
        }
    }
}

pub async fn serve(cfg: Config, db: DbPool) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", cfg.server.bind, cfg.server.port).parse()?;
    let state = Arc::new(AppState::new(db, &cfg));
    let cors = build_cors_layer(&cfg.server.cors_allowed_origins);

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(Duration::from_secs(cfg.server.request_timeout_secs));
    let app = build_app(state, cors).layer(timeout);

    let handle = axum_server::Handle::new();
    tokio::spawn(shutdown_on_signal(
        handle.clone(),
        Duration::from_secs(cfg.server.graceful_timeout_secs),
    ));

    // ConnectInfo exposes the peer IP used as the throttle key.
    let service = app.into_make_service_with_connect_info::<SocketAddr>();

    match (&cfg.tls.cert_path, &cfg.tls.key_path) {
        (Some(cert), Some(key)) => {
            let tls = load_tls_config(cert, key).await?;
            tracing::info!("Lead intake API listening on https://{}", addr);
            axum_server::bind_rustls(addr, tls)
                .handle(handle)
                .serve(service)
                .await?;
        }
        _ => {
            tracing::info!("Lead intake API listening on http://{}", addr);
            axum_server::bind(addr)
                .handle(handle)
                .serve(service)
                .await?;
        }
    }

    tracing::info!("Lead intake API stopped");
    Ok(())
}

async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig> {
    if !cert_path.exists() {
        anyhow::bail!("Certificate file not found: {}", cert_path.display());
    }
    if !key_path.exists() {
        anyhow::bail!("Private key file not found: {}", key_path.display());
    }
    Ok(RustlsConfig::from_pem_file(cert_path, key_path).await?)
}

/// Wait for Ctrl+C or SIGTERM, then stop accepting and drain for at most `grace`.
async fn shutdown_on_signal(handle: axum_server::Handle, grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections for up to {:?}", grace);
    handle.graceful_shutdown(Some(grace));
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("No valid CORS origins configured; CORS will block all cross-origin requests");
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

pub fn build_app(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .merge(router::routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
