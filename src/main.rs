mod business_logic;
mod errors;
mod models;
mod routes;
mod services;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{routing::get, Router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::business_logic::config::ScreenerConfig;
use crate::services::cache::ScanCache;
use crate::services::monitor::MonitorService;
use crate::services::notifier::WebhookNotifier;
use crate::services::yahoo::YahooClient;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health,
        routes::scan::get_scan,
        routes::cron::run_cron
    ),
    components(schemas(
        routes::health::HealthResponse,
        models::reversal::ScanResponse,
        models::reversal::CronResponse,
        models::reversal::ReversalHit,
        models::reversal::Ohlc,
        models::reversal::Direction,
        errors::ErrorResponse
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reversalscreener=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ScreenerConfig::from_env();
    let state = AppState {
        config: Arc::new(config.clone()),
        yahoo: Arc::new(YahooClient::new()),
        cache: Arc::new(ScanCache::new(Duration::from_secs(config.cache_ttl_secs))),
        notifier: Arc::new(WebhookNotifier::new(config.webhook_url.clone())),
    };

    // Background notify loop over the daily/2-bar timeframe
    let monitor = MonitorService::new(
        state.yahoo.clone(),
        state.notifier.clone(),
        config.clone(),
    );
    tokio::spawn(async move {
        tracing::info!(
            "Outside reversal monitor active, notify pass every {}s",
            config.monitor_interval_secs
        );
        monitor.run().await;
    });

    // Start web server
    let app = Router::new()
        .route("/health", get(routes::health::health))
        .route("/scan", get(routes::scan::get_scan))
        .route("/cron", get(routes::cron::run_cron))
        .with_state(state.clone())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let addr = format!("{}:{}", state.config.bind, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server running on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
