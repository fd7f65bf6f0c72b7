//! One editing session: the graph plus the ontology it is built against.
//!
//! [`QuerySession`] owns the [`GraphStore`], the [`OntologyCache`] and the
//! [`PrefixCache`], and talks to the triple store and the prefix service
//! through the client traits. Graph edits go through [`QuerySession::edit`]
//! so that selection events reach the suggestion engine and range inference
//! runs before control returns to the caller.
//!
//! Network work is split in three steps so a shared session is never locked
//! while a request is in flight: `begin_*` takes what the request needs,
//! the returned handle fetches without touching the session, and `finish_*`
//! applies the answer. Answers that were overtaken by a newer request are
//! discarded at the `finish_*` step.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::client::{
    ClientError, PrefixService, PrefixServiceClient, ResultTable, SparqlClient, SparqlResults,
    TripleStore,
};
use crate::compiler::{compile, CompileError};
use crate::config::{Config, UNBOUND_CONTENT};
use crate::graph::{EdgeId, EdgeKind, GraphError, GraphEvent, GraphStore, NodeId, NodeKind};
use crate::ontology::{
    LoadReport, LoadTicket, OntologyCache, OntologyError, PrefixCache, PrefixRequest,
    ONTOLOGY_QUERY,
};
use crate::suggest::{
    infer_range, suggest_for_selection, RangeInference, SelectionGate, Suggestion,
    SuggestionIndex,
};

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("Request failed: {0}")]
    Client(#[from] ClientError),

    #[error("{0}")]
    Ontology(#[from] OntologyError),

    #[error("Suggestion not found: {0}")]
    SuggestionNotFound(u64),

    #[error("Edge {0} has no object node yet")]
    IncompleteEdge(EdgeId),

    #[error("Ontology load was superseded by a newer one")]
    Superseded,
}

/// Graph elements created or changed by accepting a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accepted {
    /// A new object node joined to the subject by a new edge.
    Edge { node: NodeId, edge: EdgeId },
    /// An existing object node took the suggested class or datatype.
    Node { node: NodeId },
}

/// An ontology load that has been started but not fetched.
pub struct OntologyLoad {
    ticket: LoadTicket,
    store: Arc<dyn TripleStore>,
}

impl OntologyLoad {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Runs the ontology query.
    pub async fn fetch(&self) -> Result<SparqlResults, ClientError> {
        self.store.select(ONTOLOGY_QUERY).await
    }
}

/// Prefix lookups drained from the cache, to be sent to the prefix service.
pub struct PrefixBatch {
    requests: Vec<PrefixRequest>,
    service: Arc<dyn PrefixService>,
}

impl PrefixBatch {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Asks the shrink endpoint for every request concurrently.
    pub async fn fetch(self) -> PrefixAnswers {
        let service = &self.service;
        let answers = join_all(self.requests.iter().map(|request| async move {
            let term = request.shrink_term();
            service.shrink(&term).await
        }))
        .await;
        PrefixAnswers(self.requests.into_iter().zip(answers).collect())
    }
}

/// Prefix service answers paired with the requests they answer.
pub struct PrefixAnswers(Vec<(PrefixRequest, Result<String, ClientError>)>);

/// A compiled query waiting to be sent to the triple store.
pub struct PendingQuery {
    query: String,
    store: Arc<dyn TripleStore>,
}

impl PendingQuery {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Sends the query and tabulates the results.
    pub async fn run(self) -> Result<ResultTable, SessionError> {
        tracing::debug!(query = %self.query, "executing query");
        let results = self.store.select(&self.query).await?;
        Ok(ResultTable::from(results))
    }
}

/// Graph, ontology and clients for one user.
pub struct QuerySession {
    graph: GraphStore,
    events: mpsc::UnboundedReceiver<GraphEvent>,
    ontology: OntologyCache,
    prefixes: PrefixCache,
    gate: SelectionGate,
    indices: SuggestionIndex,
    suggestions: Vec<Suggestion>,
    /// Edge content that range inference last ran for, per edge.
    inferred: HashMap<EdgeId, String>,
    store: Arc<dyn TripleStore>,
    prefix_service: Arc<dyn PrefixService>,
}

impl QuerySession {
    /// Creates a session with explicit clients.
    pub fn new(
        config: &Config,
        store: Arc<dyn TripleStore>,
        prefix_service: Arc<dyn PrefixService>,
    ) -> Self {
        let mut graph = GraphStore::new(config.shapes.clone());
        let events = graph.subscribe();
        Self {
            graph,
            events,
            ontology: OntologyCache::new(),
            prefixes: PrefixCache::new(config.ontology.base_namespace.clone()),
            gate: SelectionGate::new(),
            indices: SuggestionIndex::default(),
            suggestions: Vec::new(),
            inferred: HashMap::new(),
            store,
            prefix_service,
        }
    }

    /// Creates a session talking HTTP to the configured services.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config,
            Arc::new(SparqlClient::from_config(&config.endpoint)),
            Arc::new(PrefixServiceClient::from_config(&config.prefix_service)),
        )
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn ontology(&self) -> &OntologyCache {
        &self.ontology
    }

    pub fn prefixes(&self) -> &PrefixCache {
        &self.prefixes
    }

    /// Suggestions for the current selection.
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Runs a graph mutation and processes the events it produced.
    ///
    /// ```ignore
    /// let node = session.edit(|g| g.create_node(Point::new(0.0, 0.0), NodeKind::UnboundVariable, "?"));
    /// session.edit(|g| g.update_node_content(node, "?person"))?;
    /// ```
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut GraphStore) -> T) -> T {
        let result = f(&mut self.graph);
        self.sync();
        result
    }

    // =========================================================================
    // Network
    // =========================================================================

    /// Loads the ontology from the triple store and resolves its prefixes.
    ///
    /// On failure the previous facts stay in place.
    pub async fn load_ontology(&mut self) -> Result<LoadReport, SessionError> {
        let load = self.begin_ontology_load();
        let fetched = load.fetch().await;
        let report = self.finish_ontology_load(load.ticket(), fetched)?;
        self.resolve_pending_prefixes().await;
        Ok(report)
    }

    /// Starts an ontology load. Loads begun earlier become stale.
    pub fn begin_ontology_load(&mut self) -> OntologyLoad {
        OntologyLoad {
            ticket: self.ontology.begin_load(),
            store: Arc::clone(&self.store),
        }
    }

    /// Indexes the fetched ontology.
    ///
    /// Fails with [`SessionError::Superseded`] when another load began after
    /// `ticket`; the facts of the newer load are kept. Prefixes found in the
    /// facts are queued for [`QuerySession::begin_prefix_resolution`].
    pub fn finish_ontology_load(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<SparqlResults, ClientError>,
    ) -> Result<LoadReport, SessionError> {
        let results = match fetched {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "ontology load failed");
                return Err(OntologyError::LoadFailure(e).into());
            }
        };

        let report = self
            .ontology
            .apply_load(ticket, &results.results.bindings, &mut self.prefixes)
            .ok_or(SessionError::Superseded)?;

        self.inferred.clear();
        self.sync();
        self.refresh_suggestions();
        Ok(report)
    }

    /// Answers every queued prefix lookup. Returns how many were applied.
    ///
    /// Each distinct expansion is asked for once; lookups run concurrently.
    pub async fn resolve_pending_prefixes(&mut self) -> usize {
        let batch = self.begin_prefix_resolution();
        if batch.is_empty() {
            return 0;
        }
        let answers = batch.fetch().await;
        self.finish_prefix_resolution(answers)
    }

    /// Drains the queued prefix lookups.
    pub fn begin_prefix_resolution(&mut self) -> PrefixBatch {
        PrefixBatch {
            requests: self.prefixes.take_requests(),
            service: Arc::clone(&self.prefix_service),
        }
    }

    /// Applies prefix answers and relabels facts and suggestions.
    /// Returns how many answers were current.
    pub fn finish_prefix_resolution(&mut self, answers: PrefixAnswers) -> usize {
        let total = answers.0.len();
        let mut applied = 0;
        for (request, answer) in answers.0 {
            if self.prefixes.complete(&request, answer) {
                applied += 1;
            }
        }

        let changed = self.ontology.refresh_prefixes(&self.prefixes);
        for suggestion in &mut self.suggestions {
            suggestion.refresh_prefixes(&self.prefixes);
        }
        tracing::debug!(answers = total, applied, changed, "prefixes resolved");
        applied
    }

    /// Compiles the current graph.
    pub fn compile_query(&self) -> Result<String, SessionError> {
        Ok(compile(&self.graph.snapshot(), &self.prefixes)?)
    }

    /// Compiles the current graph for execution outside the session.
    pub fn prepare_query(&self) -> Result<PendingQuery, SessionError> {
        Ok(PendingQuery {
            query: self.compile_query()?,
            store: Arc::clone(&self.store),
        })
    }

    /// Compiles the current graph and runs it against the triple store.
    pub async fn execute_query(&self) -> Result<ResultTable, SessionError> {
        self.prepare_query()?.run().await
    }

    // =========================================================================
    // Suggestions
    // =========================================================================

    /// Recomputes suggestions for the current selection, bypassing the gate.
    pub fn refresh_suggestions(&mut self) {
        self.suggestions = match self.graph.selection() {
            Some(selection) => {
                suggest_for_selection(&selection, &self.ontology, &mut self.indices)
            }
            None => Vec::new(),
        };
    }

    /// Drops one suggestion. Other indices are unaffected.
    pub fn remove_suggestion(&mut self, index: u64) -> Result<Suggestion, SessionError> {
        let position = self
            .suggestions
            .iter()
            .position(|s| s.index() == index)
            .ok_or(SessionError::SuggestionNotFound(index))?;
        Ok(self.suggestions.remove(position))
    }

    /// Materializes a suggestion into the graph.
    pub fn accept_suggestion(&mut self, index: u64) -> Result<Accepted, SessionError> {
        let suggestion = self
            .suggestions
            .iter()
            .find(|s| s.index() == index)
            .cloned()
            .ok_or(SessionError::SuggestionNotFound(index))?;

        let accepted = match &suggestion {
            Suggestion::Edge(s) => {
                let origin = self
                    .graph
                    .node(s.subject)
                    .ok_or(GraphError::NodeNotFound(s.subject))?
                    .position;
                let offset = self.graph.shapes().suggestion_offset;
                let node = self.graph.create_node(
                    origin.offset(offset, 0.0),
                    NodeKind::UnboundVariable,
                    UNBOUND_CONTENT,
                );
                self.graph
                    .set_inferred_class(node, Some(s.range.label.clone()))?;
                let content = s.property.qualified_name();
                let edge = self.graph.connect(s.subject, node, content.clone())?;
                self.inferred.insert(edge, content);
                Accepted::Edge { node, edge }
            }
            Suggestion::Node(s) => {
                let node = self
                    .graph
                    .edge(s.edge)
                    .ok_or(GraphError::EdgeNotFound(s.edge))?
                    .object
                    .node()
                    .ok_or(SessionError::IncompleteEdge(s.edge))?;
                if s.kind == NodeKind::Literal {
                    self.graph
                        .assign_node(node, NodeKind::Literal, "", Some(s.class.label.clone()))?;
                } else {
                    self.graph
                        .assign_node(node, NodeKind::Uri, s.class.qualified_name(), None)?;
                }
                Accepted::Node { node }
            }
        };

        self.suggestions.retain(|s| s.index() != index);
        tracing::debug!(index, label = %suggestion.label(), "suggestion accepted");
        self.sync();
        Ok(accepted)
    }

    /// Empties the graph and the suggestion list. The ontology stays loaded.
    pub fn clear_graph(&mut self) {
        self.graph.clear();
        self.inferred.clear();
        self.sync();
        self.suggestions.clear();
        self.gate.reset();
    }

    // =========================================================================
    // Event processing
    // =========================================================================

    fn sync(&mut self) {
        self.infer_ranges();

        while let Ok(event) = self.events.try_recv() {
            if let GraphEvent::SelectionChanged(selection) = event {
                if self.gate.should_recompute(&selection) {
                    self.suggestions =
                        suggest_for_selection(&selection, &self.ontology, &mut self.indices);
                }
            }
        }

        let graph = &self.graph;
        self.suggestions.retain(|s| match s {
            Suggestion::Edge(s) => graph.node(s.subject).is_some(),
            Suggestion::Node(s) => graph.edge(s.edge).is_some(),
        });
        self.inferred.retain(|edge, _| graph.edge(*edge).is_some());
    }

    /// Sets the inferred class of unbound objects of complete property edges
    /// whose label changed since the last run.
    fn infer_ranges(&mut self) {
        let targets: Vec<(EdgeId, String, NodeId)> = self
            .graph
            .edges()
            .iter()
            .filter(|e| e.complete && e.kind == EdgeKind::BoundProperty)
            .filter(|e| self.inferred.get(&e.id) != Some(&e.content))
            .filter_map(|e| {
                let object = e.object.node()?;
                let node = self.graph.node(object)?;
                matches!(node.kind, NodeKind::UnboundVariable | NodeKind::Amalgam)
                    .then(|| (e.id, e.content.clone(), object))
            })
            .collect();

        for (edge, content, object) in targets {
            let inference = infer_range(&content, &self.ontology);
            if let Some(class) = inference.class_label() {
                let amalgam = matches!(inference, RangeInference::Amalgam(_));
                if let Err(e) = self.graph.infer_class(object, class, amalgam) {
                    tracing::warn!(edge = %edge, error = %e, "range inference failed");
                }
            }
            self.inferred.insert(edge, content);
        }
    }
}
