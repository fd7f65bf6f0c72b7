/// Fetches every property with its domain and range classes.
///
/// Domains and ranges come either from `rdfs:domain`/`rdfs:range` or from
/// class restrictions (`owl:onProperty` with `owl:onClass`, `owl:onDataRange`
/// or `owl:someValuesFrom`). `owl:topObjectProperty` is never reported from a
/// restriction.
pub const ONTOLOGY_QUERY: &str = r#"PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
SELECT DISTINCT ?s ?domain ?range
WHERE {
  {
    ?s rdfs:domain ?domain .
    OPTIONAL { ?s rdfs:range ?range . }
  }
  UNION
  {
    ?domain rdfs:subClassOf ?restriction .
    ?restriction owl:onProperty ?s .
    OPTIONAL { ?restriction owl:onClass|owl:onDataRange|owl:someValuesFrom ?range . }
    FILTER (?s != owl:topObjectProperty)
  }
}
"#;

/// Result variables of [`ONTOLOGY_QUERY`].
pub const PROPERTY_VAR: &str = "s";
pub const DOMAIN_VAR: &str = "domain";
pub const RANGE_VAR: &str = "range";
