use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{HeaderName, ACCEPT, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::routes;
use crate::AppState;

/// Echoes the caller's `Origin` and allows credentials.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS, Method::DELETE])
        .allow_headers([
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("remember-me"),
        ])
        .max_age(Duration::from_secs(3600))
}

pub fn build_router(config: &ServerConfig) -> Router {
    let state = AppState {
        options: config.reconcile_options(),
    };

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/v1/upload", post(routes::upload))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(cors_layer())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        threshold = config.match_threshold,
        count_mode = ?config.count_mode,
        "recon-server listening"
    );

    axum::serve(listener, build_router(&config)).await?;
    Ok(())
}
