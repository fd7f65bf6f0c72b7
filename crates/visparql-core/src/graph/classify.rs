//! Content classification for nodes and edges.
//!
//! The node rules are ordered; the first matching predicate wins:
//! 1. literal lexical form (quoted string, boolean, integer, decimal/double)
//! 2. contains `:`
//! 3. `?` followed by at least one character
//! 4. exactly `?`
//! 5. anything else

use std::sync::LazyLock;

use regex::Regex;

use super::model::{EdgeKind, NodeKind};
use crate::config::UNBOUND_CONTENT;

/// Lexical forms accepted as SPARQL literals.
pub const LITERAL_PATTERNS: &[&str] = &[
    // Quoted string, optionally tagged with a language or datatype
    r#"^"(?:[^"\\]|\\.)*"(?:@[A-Za-z]+(?:-[A-Za-z0-9]+)*|\^\^\S+)?$"#,
    r#"^'(?:[^'\\]|\\.)*'(?:@[A-Za-z]+(?:-[A-Za-z0-9]+)*|\^\^\S+)?$"#,
    // Boolean
    r"^(?:true|false)$",
    // Integer
    r"^[+-]?\d+$",
    // Decimal or double
    r"^[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?$",
];

static LITERALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    LITERAL_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).expect("literal patterns are valid regexes"))
        .collect()
});

/// True if `content` is a literal lexical form.
pub fn is_literal(content: &str) -> bool {
    LITERALS.iter().any(|re| re.is_match(content))
}

fn is_prefixed_or_iri(content: &str) -> bool {
    content.contains(':')
}

fn is_named_variable(content: &str) -> bool {
    content.starts_with('?') && content.chars().count() > 1
}

fn is_anonymous_variable(content: &str) -> bool {
    content == UNBOUND_CONTENT
}

/// Classifies node content into exactly one kind.
pub fn classify_node_content(content: &str) -> NodeKind {
    let rules: [(fn(&str) -> bool, NodeKind); 4] = [
        (is_literal, NodeKind::Literal),
        (is_prefixed_or_iri, NodeKind::Uri),
        (is_named_variable, NodeKind::SelectedVariable),
        (is_anonymous_variable, NodeKind::UnboundVariable),
    ];

    rules
        .iter()
        .find(|(matches, _)| matches(content))
        .map(|(_, kind)| *kind)
        .unwrap_or(NodeKind::Uri)
}

/// Classifies edge content: variables start with `?`, everything else is a property IRI.
pub fn classify_edge_content(content: &str) -> EdgeKind {
    if content.starts_with('?') {
        EdgeKind::UnboundProperty
    } else {
        EdgeKind::BoundProperty
    }
}

/// Text after the last `:`, or the whole content when there is none.
pub fn local_name(content: &str) -> &str {
    content.rsplit_once(':').map_or(content, |(_, local)| local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_examples() {
        assert_eq!(classify_node_content("42"), NodeKind::Literal);
        assert_eq!(classify_node_content("?x"), NodeKind::SelectedVariable);
        assert_eq!(classify_node_content("?"), NodeKind::UnboundVariable);
        assert_eq!(classify_node_content("ex:Person"), NodeKind::Uri);
        assert_eq!(classify_node_content("\"hello\""), NodeKind::Literal);
    }

    #[test]
    fn test_literal_forms() {
        let literals = [
            "true",
            "false",
            "-7",
            "+3",
            "3.14",
            ".5",
            "1e10",
            "2.5E-3",
            "'x'",
            "\"a\"@en",
            "\"1\"^^xsd:int",
        ];
        for literal in literals {
            assert_eq!(classify_node_content(literal), NodeKind::Literal, "{literal}");
        }
    }

    #[test]
    fn test_every_literal_pattern_compiles() {
        assert_eq!(LITERALS.len(), LITERAL_PATTERNS.len());
    }

    #[test]
    fn test_literal_wins_over_colon() {
        assert_eq!(classify_node_content("\"time: 12:00\""), NodeKind::Literal);
    }

    #[test]
    fn test_fallback_is_uri() {
        assert_eq!(classify_node_content("Person"), NodeKind::Uri);
        assert_eq!(classify_node_content(""), NodeKind::Uri);
        assert_eq!(classify_node_content("True"), NodeKind::Uri);
    }

    #[test]
    fn test_colon_before_variable() {
        assert_eq!(classify_node_content("?x:y"), NodeKind::Uri);
    }

    #[test]
    fn test_edge_content() {
        assert_eq!(classify_edge_content("?"), EdgeKind::UnboundProperty);
        assert_eq!(classify_edge_content("?p"), EdgeKind::UnboundProperty);
        assert_eq!(classify_edge_content("foaf:knows"), EdgeKind::BoundProperty);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("ex:Person"), "Person");
        assert_eq!(local_name("Person"), "Person");
        assert_eq!(local_name(":Person"), "Person");
    }
}
