use std::io::Write;

use tempfile::NamedTempFile;
use visparql_core::config::{
    DEFAULT_BASE_NAMESPACE, DEFAULT_NODE_SIZE, DEFAULT_QUERY_URL, DEFAULT_RESULTS_ACCEPT,
};
use visparql_core::{Config, ConfigError};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.endpoint.query_url, DEFAULT_QUERY_URL);
    assert_eq!(config.endpoint.accept, DEFAULT_RESULTS_ACCEPT);
    assert_eq!(config.ontology.base_namespace, DEFAULT_BASE_NAMESPACE);
    assert_eq!(config.shapes.node_size, DEFAULT_NODE_SIZE);
    config.validate().unwrap();
}

#[test]
fn test_default_config_string_has_sections() {
    let toml_str = Config::default_config_string();
    assert!(toml_str.contains("[endpoint]"));
    assert!(toml_str.contains("[prefix_service]"));
    assert!(toml_str.contains("[ontology]"));
    assert!(toml_str.contains("[shapes]"));
}

#[test]
fn test_from_file_with_partial_sections() {
    let file = write_config(
        r#"
[endpoint]
query_url = "http://triples.example/sparql"

[shapes]
literal_width = 220.0
"#,
    );
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.endpoint.query_url, "http://triples.example/sparql");
    // Unset keys keep their defaults
    assert_eq!(config.endpoint.accept, DEFAULT_RESULTS_ACCEPT);
    assert_eq!(config.shapes.literal_width, 220.0);
    assert_eq!(config.shapes.node_size, DEFAULT_NODE_SIZE);
}

#[test]
fn test_prefix_service_urls() {
    let file = write_config(
        r#"
[prefix_service]
url = "http://prefixes.example/"
expand_path = "/api/expand"
shrink_path = "/api/shrink"
"#,
    );
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(
        config.prefix_service.expand_url(),
        "http://prefixes.example/api/expand"
    );
    assert_eq!(
        config.prefix_service.shrink_url(),
        "http://prefixes.example/api/shrink"
    );
}

#[test]
fn test_invalid_toml() {
    let file = write_config("[endpoint\nquery_url = ");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_non_positive_size_rejected() {
    let file = write_config("[shapes]\nnode_size = 0.0\n");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        Config::from_file("/nonexistent/visparql.toml"),
        Err(ConfigError::ReadError(_))
    ));
}
