//! IRI splitting and labelling.

/// Splits an IRI after its last `#` or `/` into `(expansion, local_name)`.
///
/// An IRI without either separator has an empty expansion.
pub fn split_iri(iri: &str) -> (&str, &str) {
    match iri.rfind(['#', '/']) {
        Some(index) => iri.split_at(index + 1),
        None => ("", iri),
    }
}

/// Human label of a local name: underscores become spaces.
pub fn label_of(local_name: &str) -> String {
    local_name.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_hash_namespace() {
        assert_eq!(
            split_iri("http://example.org/ontology#Person"),
            ("http://example.org/ontology#", "Person")
        );
    }

    #[test]
    fn test_split_slash_namespace() {
        assert_eq!(
            split_iri("http://xmlns.com/foaf/0.1/knows"),
            ("http://xmlns.com/foaf/0.1/", "knows")
        );
    }

    #[test]
    fn test_split_uses_last_separator() {
        assert_eq!(split_iri("http://ex.org/a#b/c"), ("http://ex.org/a#b/", "c"));
    }

    #[test]
    fn test_split_without_separator() {
        assert_eq!(split_iri("urn:thing"), ("", "urn:thing"));
    }

    #[test]
    fn test_label_replaces_underscores() {
        assert_eq!(label_of("has_part_of"), "has part of");
        assert_eq!(label_of("Person"), "Person");
    }
}
