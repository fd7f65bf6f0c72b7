//! SPARQL 1.1 JSON results format.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A response in `application/sparql-results+json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparqlResults {
    pub head: ResultsHead,
    #[serde(default)]
    pub results: ResultsBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsBody {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// One solution: variable name to bound value. Unbound variables are absent.
pub type Binding = HashMap<String, BindingValue>;

/// A bound RDF term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingValue {
    /// `uri`, `literal` or `bnode`.
    #[serde(rename = "type", default)]
    pub term_type: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl BindingValue {
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            term_type: "uri".to_string(),
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            term_type: "literal".to_string(),
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }
}

/// Query results flattened into rows for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    /// One row per solution; unbound cells are empty strings.
    pub rows: Vec<Vec<String>>,
}

impl From<SparqlResults> for ResultTable {
    fn from(results: SparqlResults) -> Self {
        let columns = results.head.vars;
        let rows = results
            .results
            .bindings
            .into_iter()
            .map(|mut binding| {
                columns
                    .iter()
                    .map(|var| binding.remove(var).map(|v| v.value).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "head": { "vars": ["s", "o"] },
        "results": { "bindings": [
            { "s": { "type": "uri", "value": "http://ex/a" },
              "o": { "type": "literal", "value": "1", "datatype": "http://www.w3.org/2001/XMLSchema#integer" } },
            { "s": { "type": "uri", "value": "http://ex/b" } }
        ] }
    }"#;

    #[test]
    fn test_parse_results() {
        let results: SparqlResults = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(results.head.vars, vec!["s", "o"]);
        assert_eq!(results.results.bindings.len(), 2);
        let o = &results.results.bindings[0]["o"];
        assert_eq!(o.term_type, "literal");
        assert!(o.datatype.is_some());
    }

    #[test]
    fn test_table_fills_unbound_cells() {
        let results: SparqlResults = serde_json::from_str(SAMPLE).unwrap();
        let table = ResultTable::from(results);
        assert_eq!(table.columns, vec!["s", "o"]);
        assert_eq!(table.rows[0], vec!["http://ex/a", "1"]);
        assert_eq!(table.rows[1], vec!["http://ex/b", ""]);
    }
}
