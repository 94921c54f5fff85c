mod config;
mod db;
mod escalation;
mod registry;
mod routes;
mod services;
mod signal;
mod sink;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::RelayConfig;
use crate::sink::{HandoverSink, PgHandoverSink};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::from_env();

    // Handover sink is optional: without a database the relay still runs and
    // escalation boundary calls fall back to their defaults.
    let sink: Option<Arc<dyn HandoverSink>> = match config.database_url.as_deref() {
        Some(url) => match db::init_pool(url, config.db_max_connections).await {
            Ok(pool) => {
                tracing::info!("handover sink connected");
                Some(Arc::new(PgHandoverSink::new(pool)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "handover sink unavailable; using defaults");
                None
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set; handover sink disabled");
            None
        }
    };

    let addr = config.listen_addr();
    let state = state::AppState::new(config, sink);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "signaling relay listening");
    axum::serve(listener, app).await.expect("server failed");
}
