//! Configuration management for visparql.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `visparql.toml` file
//! 3. User config `~/.config/visparql/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Triple store endpoint configuration.
    pub endpoint: EndpointConfig,

    /// Prefix resolution service configuration.
    pub prefix_service: PrefixServiceConfig,

    /// Ontology configuration.
    pub ontology: OntologyConfig,

    /// Node shape dimensions.
    pub shapes: ShapeConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./visparql.toml` (project local)
    /// 2. `~/.config/visparql/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new("visparql.toml").exists() {
            return Self::from_file("visparql.toml");
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("visparql").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("VISPARQL_ENDPOINT") {
            self.endpoint.query_url = url;
        }
        if let Ok(url) = std::env::var("VISPARQL_PREFIX_URL") {
            self.prefix_service.url = url;
        }
        if let Ok(ns) = std::env::var("VISPARQL_BASE_NAMESPACE") {
            self.ontology.base_namespace = ns;
        }
    }

    /// Reject values the geometry and clients cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.query_url.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint.query_url is empty".to_string()));
        }
        let s = &self.shapes;
        let sizes = [
            ("shapes.node_size", s.node_size),
            ("shapes.literal_width", s.literal_width),
            ("shapes.literal_height", s.literal_height),
            ("shapes.placeholder_size", s.placeholder_size),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Triple store endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// URL that accepts form-encoded SPARQL queries.
    pub query_url: String,

    /// Value of the `Accept` header.
    pub accept: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            query_url: DEFAULT_QUERY_URL.to_string(),
            accept: DEFAULT_RESULTS_ACCEPT.to_string(),
        }
    }
}

/// Prefix resolution service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixServiceConfig {
    /// Base URL of the service.
    pub url: String,

    /// Path of the expand endpoint.
    pub expand_path: String,

    /// Path of the shrink endpoint.
    pub shrink_path: String,
}

impl Default for PrefixServiceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PREFIX_SERVICE_URL.to_string(),
            expand_path: DEFAULT_EXPAND_PATH.to_string(),
            shrink_path: DEFAULT_SHRINK_PATH.to_string(),
        }
    }
}

impl PrefixServiceConfig {
    /// Full URL of the expand endpoint.
    pub fn expand_url(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.expand_path)
    }

    /// Full URL of the shrink endpoint.
    pub fn shrink_url(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.shrink_path)
    }
}

/// Ontology configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OntologyConfig {
    /// Namespace rendered with the empty prefix.
    pub base_namespace: String,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            base_namespace: DEFAULT_BASE_NAMESPACE.to_string(),
        }
    }
}

/// Node shape dimensions, by node kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    /// Side of variable, URI and amalgam squares.
    pub node_size: f64,

    /// Corner radius of variable and amalgam nodes.
    pub variable_corner_radius: f64,

    /// Corner radius of URI nodes.
    pub uri_corner_radius: f64,

    /// Width of literal rectangles.
    pub literal_width: f64,

    /// Height of literal rectangles.
    pub literal_height: f64,

    /// Diameter of placeholder circles.
    pub placeholder_size: f64,

    /// Distance between a node and an object created from a suggestion.
    pub suggestion_offset: f64,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            node_size: DEFAULT_NODE_SIZE,
            variable_corner_radius: DEFAULT_VARIABLE_CORNER_RADIUS,
            uri_corner_radius: DEFAULT_URI_CORNER_RADIUS,
            literal_width: DEFAULT_LITERAL_WIDTH,
            literal_height: DEFAULT_LITERAL_HEIGHT,
            placeholder_size: DEFAULT_PLACEHOLDER_SIZE,
            suggestion_offset: DEFAULT_SUGGESTION_OFFSET,
        }
    }
}
