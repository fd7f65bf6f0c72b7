//! HTTP route handlers for the editor server.
//!
//! Handlers are kept thin: each takes the session lock, runs one session or
//! graph operation and maps the outcome to JSON. Handlers that reach the
//! triple store release the lock while the request is in flight.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use visparql_core::graph::{
    classify_node_content, ClickOutcome, EdgeCompletion, EdgeId, EdgeKind, GraphError, NodeId,
};
use visparql_core::config::UNBOUND_CONTENT;
use visparql_core::{
    Accepted, CompileError, OntologyError, Point, ResultTable, SessionError, Suggestion,
};

use super::models::{
    ClickRequest, CompleteEdgeRequest, ContentRequest, CreateNodeRequest, EdgeCompletionResponse,
    EdgeStarted, ErrorResponse, GraphResponse, ModeRequest, NodeCreated, NodeDeleted,
    NodeKindResponse, OptionalRequest, PositionRequest, QueryResponse, ReloadResponse,
    SelectRequest, StartEdgeRequest,
};
use super::{load_ontology, resolve_prefixes, AppState};

type ApiResult<T> = Result<Json<T>, ApiError>;

// =============================================================================
// Errors
// =============================================================================

/// A session error rendered as `{"error": "..."}` with a matching status.
pub struct ApiError(SessionError);

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError(err)
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        ApiError(SessionError::Graph(err))
    }
}

impl From<CompileError> for ApiError {
    fn from(err: CompileError) -> Self {
        ApiError(SessionError::Compile(err))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            SessionError::Graph(GraphError::NodeNotFound(_) | GraphError::EdgeNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            SessionError::Graph(GraphError::NoIncompleteEdge) => StatusCode::CONFLICT,
            SessionError::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::Compile(CompileError::NoSelectedOutputs) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            SessionError::Compile(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::Client(_) | SessionError::Ontology(OntologyError::LoadFailure(_)) => {
                StatusCode::BAD_GATEWAY
            }
            SessionError::Ontology(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::SuggestionNotFound(_) => StatusCode::NOT_FOUND,
            SessionError::IncompleteEdge(_) | SessionError::Superseded => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Graph
// =============================================================================

/// GET `/api/graph` - Full editor state.
pub async fn api_graph(State(state): State<Arc<AppState>>) -> Json<GraphResponse> {
    let session = state.session.read().await;
    let graph = session.graph();
    Json(GraphResponse {
        mode: graph.mode(),
        selection: graph.selection(),
        edge_completing: graph.edge_completing(),
        graph: graph.snapshot(),
    })
}

/// PUT `/api/mode` - Switch the canvas mode.
pub async fn api_set_mode(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ModeRequest>,
) -> StatusCode {
    let mut session = state.session.write().await;
    session.edit(|g| g.set_mode(body.mode));
    StatusCode::NO_CONTENT
}

/// POST `/api/click` - Canvas click, dispatched by the current mode.
pub async fn api_click(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ClickRequest>,
) -> ApiResult<ClickOutcome> {
    let mut session = state.session.write().await;
    let outcome = session.edit(|g| g.click(Point::new(body.x, body.y), body.node))?;
    Ok(Json(outcome))
}

// =============================================================================
// Nodes
// =============================================================================

/// POST `/api/nodes` - Create a node.
pub async fn api_create_node(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateNodeRequest>,
) -> (StatusCode, Json<NodeCreated>) {
    let content = body.content.unwrap_or_else(|| UNBOUND_CONTENT.to_string());
    let kind = body.kind.unwrap_or_else(|| classify_node_content(&content));

    let mut session = state.session.write().await;
    let node = session.edit(|g| g.create_node(Point::new(body.x, body.y), kind, content));
    (StatusCode::CREATED, Json(NodeCreated { node, kind }))
}

/// PUT `/api/nodes/{id}/content` - Replace content; the node is reclassified.
pub async fn api_node_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(body): Json<ContentRequest>,
) -> ApiResult<NodeKindResponse> {
    let mut session = state.session.write().await;
    let kind = session.edit(|g| g.update_node_content(NodeId(id), body.content))?;
    Ok(Json(NodeKindResponse { kind }))
}

/// PUT `/api/nodes/{id}/position` - Move a node.
pub async fn api_node_position(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(body): Json<PositionRequest>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.write().await;
    session.edit(|g| g.move_node(NodeId(id), body.point()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE `/api/nodes/{id}` - Delete a node and its edges.
pub async fn api_delete_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> ApiResult<NodeDeleted> {
    let node = NodeId(id);
    let mut session = state.session.write().await;
    let edges = session.edit(|g| g.delete_cascade(node))?;
    Ok(Json(NodeDeleted { node, edges }))
}

// =============================================================================
// Edges
// =============================================================================

/// POST `/api/edges` - Start drawing an edge from a node.
pub async fn api_start_edge(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StartEdgeRequest>,
) -> ApiResult<EdgeStarted> {
    let content = body.content.unwrap_or_else(|| UNBOUND_CONTENT.to_string());
    let mut session = state.session.write().await;
    let edge = session.edit(|g| g.create_edge_from_existing_node(body.subject, content))?;
    Ok(Json(EdgeStarted { edge }))
}

/// POST `/api/edges/pointer` - Move the free end of the edge being drawn.
pub async fn api_follow_pointer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PositionRequest>,
) -> StatusCode {
    let mut session = state.session.write().await;
    session.edit(|g| g.follow_pointer(body.point()));
    StatusCode::NO_CONTENT
}

/// POST `/api/edges/complete` - Anchor the edge being drawn to a node.
pub async fn api_complete_edge(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CompleteEdgeRequest>,
) -> ApiResult<EdgeCompletionResponse> {
    let mut session = state.session.write().await;
    let response = match session.edit(|g| g.complete_edge(body.object))? {
        EdgeCompletion::Completed(edge) => EdgeCompletionResponse {
            edge,
            complete: true,
        },
        EdgeCompletion::Pending(edge) => EdgeCompletionResponse {
            edge,
            complete: false,
        },
    };
    Ok(Json(response))
}

/// PUT `/api/edges/{id}/content` - Replace content; the edge is reclassified.
pub async fn api_edge_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(body): Json<ContentRequest>,
) -> ApiResult<EdgeKind> {
    let mut session = state.session.write().await;
    let kind = session.edit(|g| g.update_edge_content(EdgeId(id), body.content))?;
    Ok(Json(kind))
}

/// PUT `/api/edges/{id}/optional` - Toggle optionality of a triple.
pub async fn api_edge_optional(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(body): Json<OptionalRequest>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.write().await;
    session.edit(|g| g.set_optional(EdgeId(id), body.optional))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE `/api/edges/{id}` - Delete one edge.
pub async fn api_delete_edge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.write().await;
    session.edit(|g| g.delete_edge(EdgeId(id)))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Selection and suggestions
// =============================================================================

/// POST `/api/select` - Select an element, or clear the selection.
pub async fn api_select(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SelectRequest>,
) -> ApiResult<Vec<Suggestion>> {
    let mut session = state.session.write().await;
    match body.element {
        Some(element) => {
            session.edit(|g| g.select(element))?;
        }
        None => session.edit(|g| g.clear_selection()),
    }
    Ok(Json(session.suggestions().to_vec()))
}

/// GET `/api/suggestions` - Suggestions for the current selection.
pub async fn api_suggestions(State(state): State<Arc<AppState>>) -> Json<Vec<Suggestion>> {
    let session = state.session.read().await;
    Json(session.suggestions().to_vec())
}

/// POST `/api/suggestions/{index}/accept` - Add a suggestion to the graph.
pub async fn api_accept_suggestion(
    State(state): State<Arc<AppState>>,
    Path(index): Path<u64>,
) -> ApiResult<Accepted> {
    let mut session = state.session.write().await;
    Ok(Json(session.accept_suggestion(index)?))
}

/// DELETE `/api/suggestions/{index}` - Dismiss a suggestion.
pub async fn api_remove_suggestion(
    State(state): State<Arc<AppState>>,
    Path(index): Path<u64>,
) -> ApiResult<Suggestion> {
    let mut session = state.session.write().await;
    Ok(Json(session.remove_suggestion(index)?))
}

// =============================================================================
// Query and ontology
// =============================================================================

/// GET `/api/query` - The compiled query text.
pub async fn api_query(State(state): State<Arc<AppState>>) -> ApiResult<QueryResponse> {
    let session = state.session.read().await;
    let query = session.compile_query()?;
    Ok(Json(QueryResponse { query }))
}

/// POST `/api/query/execute` - Compile and run the query.
pub async fn api_execute(State(state): State<Arc<AppState>>) -> ApiResult<ResultTable> {
    let pending = state.session.read().await.prepare_query()?;
    Ok(Json(pending.run().await?))
}

/// POST `/api/ontology/reload` - Reload the ontology from the triple store.
///
/// Responds once the facts are indexed; prefixes are resolved afterwards.
pub async fn api_reload_ontology(
    State(state): State<Arc<AppState>>,
) -> ApiResult<ReloadResponse> {
    let report = load_ontology(&state.session).await?;
    tokio::spawn(resolve_prefixes(Arc::clone(&state.session)));
    Ok(Json(ReloadResponse {
        loaded: report.loaded,
        skipped: report.skipped.iter().map(ToString::to_string).collect(),
    }))
}
