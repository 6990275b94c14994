// src/main.rs

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parley::auth::SessionContext;
use parley::database::PgStore;
use parley::websocket::websocket_handler;
use parley::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,parley=debug")),
        )
        .init();

    let config = Config::from_env();
    info!(?config, "loaded configuration");

    let store = PgStore::connect(&config.database_url).await?;
    let mut state = AppState::new(Arc::new(store));
    state.test_login = config.test_login;

    // The empty session context stands in for the HTTP session layer,
    // which overwrites it per request when one is mounted in front.
    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .layer(Extension(SessionContext::default()))
        .with_state(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("listening on ws://{}", config.bind_addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
