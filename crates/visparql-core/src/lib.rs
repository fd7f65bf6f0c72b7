pub mod client;
pub mod compiler;
pub mod config;
pub mod geometry;
pub mod graph;
pub mod ontology;
pub mod session;
pub mod suggest;

pub use client::{ClientError, PrefixService, ResultTable, SparqlResults, TripleStore};
pub use compiler::{compile, CompileError};
pub use config::{Config, ConfigError};
pub use geometry::{boundary_intersection, GeometryError, Point, Shape};
pub use graph::{
    CanvasMode, Edge, EdgeId, EdgeKind, ElementRef, GraphError, GraphEvent, GraphSnapshot,
    GraphStore, Node, NodeId, NodeKind, Selection,
};
pub use ontology::{
    LoadReport, LoadTicket, OntologyCache, OntologyError, OntologyFact, PrefixCache, TermRef,
};
pub use session::{
    Accepted, OntologyLoad, PendingQuery, PrefixAnswers, PrefixBatch, QuerySession, SessionError,
};
pub use suggest::{EdgeSuggestion, NodeSuggestion, SelectionGate, Suggestion};
