//! Default values for visparql configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Endpoint Defaults
// ============================================================================

/// Default SPARQL query endpoint of the triple store.
pub const DEFAULT_QUERY_URL: &str = "http://localhost:3030/ds/query";

/// Accept header sent with every SPARQL query.
pub const DEFAULT_RESULTS_ACCEPT: &str = "application/sparql-results+json";

// ============================================================================
// Prefix Service Defaults
// ============================================================================

/// Default base URL of the prefix resolution service.
pub const DEFAULT_PREFIX_SERVICE_URL: &str = "http://localhost:5000";

/// Path of the expand endpoint (`prefix:a` -> full IRI).
pub const DEFAULT_EXPAND_PATH: &str = "/expand";

/// Path of the shrink endpoint (full IRI -> `prefix:a`).
pub const DEFAULT_SHRINK_PATH: &str = "/shrink";

/// Local name appended to a namespace before asking the service to shrink it.
pub const PREFIX_SHRINK_LOCAL_NAME: &str = "a";

// ============================================================================
// Ontology Defaults
// ============================================================================

/// Namespace of the loaded ontology; rendered with the empty prefix.
pub const DEFAULT_BASE_NAMESPACE: &str = "http://example.org/ontology#";

/// XML Schema namespace. Ranges in this namespace are literal datatypes.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

// ============================================================================
// Shape Defaults
// ============================================================================

/// Side of the square used for variables, URIs and amalgams.
pub const DEFAULT_NODE_SIZE: f64 = 80.0;

/// Corner radius of variable nodes (a full circle at the default size).
pub const DEFAULT_VARIABLE_CORNER_RADIUS: f64 = 40.0;

/// Corner radius of URI nodes.
pub const DEFAULT_URI_CORNER_RADIUS: f64 = 12.0;

/// Width of literal nodes.
pub const DEFAULT_LITERAL_WIDTH: f64 = 160.0;

/// Height of literal nodes.
pub const DEFAULT_LITERAL_HEIGHT: f64 = 50.0;

/// Diameter of placeholder nodes.
pub const DEFAULT_PLACEHOLDER_SIZE: f64 = 20.0;

/// Offset between a node and an object node created from a suggestion.
pub const DEFAULT_SUGGESTION_OFFSET: f64 = 200.0;

// ============================================================================
// Graph Defaults
// ============================================================================

/// Content of a fresh variable node or property edge.
pub const UNBOUND_CONTENT: &str = "?";

/// Offset of the free endpoint of a newly started edge, avoiding a zero-length segment.
pub const NEW_EDGE_POINTER_OFFSET: f64 = 1.0;

// ============================================================================
// Server Defaults
// ============================================================================

/// Default port of the graph editing server.
pub const DEFAULT_SERVE_PORT: u16 = 3333;
