//! Local JSON server for the graph editor front end.
//!
//! Exposes one [`QuerySession`] over HTTP: graph mutations, selection,
//! suggestions, query compilation and execution. The browser renders the
//! graph from `GET /api/graph` and posts every user gesture back.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - API request/response types (DTOs)

mod handlers;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use visparql_core::config::DEFAULT_SERVE_PORT;
use visparql_core::{Config, LoadReport, QuerySession, SessionError};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for the server.
pub struct AppState {
    /// The editing session all requests act on.
    pub session: Arc<RwLock<QuerySession>>,
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the editor server.
pub struct ServeConfig {
    /// Port to listen on.
    pub port: u16,
    /// Endpoints, namespaces and shapes for the session.
    pub config: Config,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVE_PORT,
            config: Config::default(),
        }
    }
}

// =============================================================================
// Server Entry Point
// =============================================================================

/// Builds the API router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/graph", get(handlers::api_graph))
        .route("/api/mode", put(handlers::api_set_mode))
        .route("/api/click", post(handlers::api_click))
        .route("/api/nodes", post(handlers::api_create_node))
        .route("/api/nodes/{id}", delete(handlers::api_delete_node))
        .route("/api/nodes/{id}/content", put(handlers::api_node_content))
        .route("/api/nodes/{id}/position", put(handlers::api_node_position))
        .route("/api/edges", post(handlers::api_start_edge))
        .route("/api/edges/pointer", post(handlers::api_follow_pointer))
        .route("/api/edges/complete", post(handlers::api_complete_edge))
        .route("/api/edges/{id}", delete(handlers::api_delete_edge))
        .route("/api/edges/{id}/content", put(handlers::api_edge_content))
        .route("/api/edges/{id}/optional", put(handlers::api_edge_optional))
        .route("/api/select", post(handlers::api_select))
        .route("/api/suggestions", get(handlers::api_suggestions))
        .route(
            "/api/suggestions/{index}/accept",
            post(handlers::api_accept_suggestion),
        )
        .route(
            "/api/suggestions/{index}",
            delete(handlers::api_remove_suggestion),
        )
        .route("/api/query", get(handlers::api_query))
        .route("/api/query/execute", post(handlers::api_execute))
        .route("/api/ontology/reload", post(handlers::api_reload_ontology))
        // CORS for the front end dev server
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

// =============================================================================
// Background Work
// =============================================================================

/// Loads the ontology, holding the lock only to start and to apply the load.
pub(crate) async fn load_ontology(
    session: &RwLock<QuerySession>,
) -> Result<LoadReport, SessionError> {
    let load = session.write().await.begin_ontology_load();
    let fetched = load.fetch().await;
    session
        .write()
        .await
        .finish_ontology_load(load.ticket(), fetched)
}

/// Answers queued prefix lookups and applies them as a later update.
pub(crate) async fn resolve_prefixes(session: Arc<RwLock<QuerySession>>) {
    let batch = session.write().await.begin_prefix_resolution();
    if batch.is_empty() {
        return;
    }
    let answers = batch.fetch().await;
    let applied = session.write().await.finish_prefix_resolution(answers);
    tracing::debug!(applied, "prefix answers applied");
}

/// Start the editor server.
pub async fn start_server(config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = Arc::new(RwLock::new(QuerySession::from_config(&config.config)));

    // The editor is usable without suggestions, so a failed load is not fatal
    match load_ontology(&session).await {
        Ok(report) => {
            tracing::info!(facts = report.loaded, "ontology ready");
            tokio::spawn(resolve_prefixes(Arc::clone(&session)));
        }
        Err(e) => tracing::warn!(error = %e, "starting without ontology"),
    }

    let state = Arc::new(AppState { session });
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    println!("Starting visparql editor server...");
    println!("API: http://localhost:{}/api/graph", config.port);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
