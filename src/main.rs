mod config;
mod error;
mod gateway;
mod models;
mod routes;
mod store;
mod views;

use std::sync::Arc;

use crate::{config::Config, gateway::RestGateway, models::AppState, store::AppointmentStore};

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let gateway = Arc::new(RestGateway::new(&cfg.supabase_url, &cfg.supabase_anon_key));

    // One view-model for the process; loaded once, like a page mount.
    let store = Arc::new(AppointmentStore::new(gateway));
    store.load().await;

    let state = AppState {
        store: store.clone(),
    };

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.teardown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
