use axum::{
    Router,
    routing::{get, post},
};
use engine::{MemoryDirectory, MemoryStore};

use std::sync::Arc;

use crate::{payees, payids};

#[derive(Clone)]
pub struct ServerState {
    pub store: MemoryStore,
    pub directory: Arc<MemoryDirectory>,
}

impl ServerState {
    pub fn new(store: MemoryStore, directory: MemoryDirectory) -> Self {
        Self {
            store,
            directory: Arc::new(directory),
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/payees", get(payees::list).post(payees::create))
        .route("/api/payees/search", get(payees::search))
        .route("/api/payids/resolve", post(payids::resolve))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
