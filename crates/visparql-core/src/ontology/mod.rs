//! Ontology schema cache.
//!
//! Holds the `(property, domain, range)` facts of the loaded ontology,
//! indexed by domain label for node suggestions and by property label for
//! edge suggestions. Prefixes are resolved through a [`PrefixCache`] passed
//! in by the caller; terms whose prefix is still pending show their full IRI
//! until [`OntologyCache::refresh_prefixes`] picks up the answer.
//!
//! Loading is split in two so a network round trip can sit in between:
//!
//! ```ignore
//! let ticket = ontology.begin_load();
//! let results = store.select(ONTOLOGY_QUERY).await?;
//! ontology.apply_load(ticket, &results.results.bindings, &mut prefixes);
//! ```
//!
//! A ticket older than the latest [`OntologyCache::begin_load`] is stale and
//! its results are dropped.

mod error;
mod iri;
mod prefix;
mod query;

pub use error::OntologyError;
pub use iri::{label_of, split_iri};
pub use prefix::{PrefixCache, PrefixRequest};
pub use query::{DOMAIN_VAR, ONTOLOGY_QUERY, PROPERTY_VAR, RANGE_VAR};

use std::collections::HashMap;

use serde::Serialize;

use crate::client::Binding;

/// One role of an ontology fact, with its IRI split and labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermRef {
    pub iri: String,
    pub expansion: String,
    /// Short prefix, or the raw expansion while unresolved.
    pub prefix: String,
    pub local_name: String,
    pub label: String,
}

impl TermRef {
    /// Splits `iri` and looks up its prefix, queueing a lookup on a miss.
    pub fn resolve(iri: &str, prefixes: &mut PrefixCache) -> Self {
        let (expansion, local_name) = split_iri(iri);
        let prefix = if expansion.is_empty() {
            String::new()
        } else {
            prefixes.resolve(expansion)
        };
        Self {
            iri: iri.to_string(),
            expansion: expansion.to_string(),
            prefix,
            local_name: local_name.to_string(),
            label: label_of(local_name),
        }
    }

    /// True once the prefix is known.
    pub fn has_prefix(&self) -> bool {
        self.prefix != self.expansion || self.expansion.is_empty()
    }

    /// `prefix:localName`, or the full IRI while the prefix is unknown.
    pub fn qualified_name(&self) -> String {
        if self.has_prefix() && !self.expansion.is_empty() {
            format!("{}:{}", self.prefix, self.local_name)
        } else {
            self.iri.clone()
        }
    }

    /// Picks up a prefix resolved since this term was built. Returns true on change.
    pub fn refresh(&mut self, prefixes: &PrefixCache) -> bool {
        match prefixes.peek(&self.expansion) {
            Some(prefix) if prefix != self.prefix => {
                self.prefix = prefix.to_string();
                true
            }
            _ => false,
        }
    }
}

/// A `(property, domain, range)` triple of the ontology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OntologyFact {
    pub property: TermRef,
    pub domain: TermRef,
    pub range: TermRef,
}

impl OntologyFact {
    fn terms_mut(&mut self) -> [&mut TermRef; 3] {
        [&mut self.property, &mut self.domain, &mut self.range]
    }
}

/// Outcome of indexing one batch of bindings.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    /// Bindings skipped for missing variables.
    pub skipped: Vec<OntologyError>,
}

/// Handle for an in-flight ontology load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Indexed ontology facts for one session.
#[derive(Debug, Default)]
pub struct OntologyCache {
    facts: Vec<OntologyFact>,
    by_domain: HashMap<String, Vec<usize>>,
    by_property: HashMap<String, Vec<usize>>,
    generation: u64,
    loaded: bool,
}

impl OntologyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn facts(&self) -> &[OntologyFact] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Facts whose domain label equals `label`, in load order.
    pub fn facts_for_domain<'a>(
        &'a self,
        label: &str,
    ) -> impl Iterator<Item = &'a OntologyFact> + 'a {
        Self::lookup(&self.by_domain, label).map(|i| &self.facts[i])
    }

    /// Facts whose property label equals `label`, in load order.
    pub fn facts_for_property<'a>(
        &'a self,
        label: &str,
    ) -> impl Iterator<Item = &'a OntologyFact> + 'a {
        Self::lookup(&self.by_property, label).map(|i| &self.facts[i])
    }

    fn lookup<'a>(
        index: &'a HashMap<String, Vec<usize>>,
        label: &str,
    ) -> impl Iterator<Item = usize> + 'a {
        index.get(label).into_iter().flatten().copied()
    }

    /// Starts a load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Indexes the results of the load identified by `ticket`.
    ///
    /// Returns `None` without touching the cache when a newer load has begun.
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        bindings: &[Binding],
        prefixes: &mut PrefixCache,
    ) -> Option<LoadReport> {
        if ticket.0 != self.generation {
            tracing::warn!(
                stale = ticket.0,
                current = self.generation,
                "discarding stale ontology load"
            );
            return None;
        }
        Some(self.index(bindings, prefixes))
    }

    /// Replaces the cached facts with `bindings`, superseding any load in flight.
    pub fn load(&mut self, bindings: &[Binding], prefixes: &mut PrefixCache) -> LoadReport {
        self.begin_load();
        self.index(bindings, prefixes)
    }

    fn index(&mut self, bindings: &[Binding], prefixes: &mut PrefixCache) -> LoadReport {
        self.reset();
        let mut report = LoadReport::default();

        for (index, binding) in bindings.iter().enumerate() {
            let fact = match parse_binding(index, binding, prefixes) {
                Ok(fact) => fact,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed ontology binding");
                    report.skipped.push(e);
                    continue;
                }
            };
            let position = self.facts.len();
            self.by_domain
                .entry(fact.domain.label.clone())
                .or_default()
                .push(position);
            self.by_property
                .entry(fact.property.label.clone())
                .or_default()
                .push(position);
            self.facts.push(fact);
        }

        self.loaded = true;
        report.loaded = self.facts.len();
        tracing::info!(
            facts = report.loaded,
            skipped = report.skipped.len(),
            "ontology loaded"
        );
        report
    }

    /// Updates prefixes resolved since loading. Returns the number of terms changed.
    pub fn refresh_prefixes(&mut self, prefixes: &PrefixCache) -> usize {
        self.facts
            .iter_mut()
            .flat_map(|fact| fact.terms_mut())
            .map(|term| term.refresh(prefixes))
            .filter(|changed| *changed)
            .count()
    }

    /// Drops all facts. Loads already in flight become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.reset();
    }

    fn reset(&mut self) {
        self.facts.clear();
        self.by_domain.clear();
        self.by_property.clear();
        self.loaded = false;
    }
}

fn parse_binding(
    index: usize,
    binding: &Binding,
    prefixes: &mut PrefixCache,
) -> Result<OntologyFact, OntologyError> {
    let value = |var: &'static str| {
        binding
            .get(var)
            .map(|v| v.value.as_str())
            .filter(|v| !v.is_empty())
            .ok_or(OntologyError::MalformedBinding { index, missing: var })
    };
    let property = value(PROPERTY_VAR)?;
    let domain = value(DOMAIN_VAR)?;
    let range = value(RANGE_VAR)?;

    Ok(OntologyFact {
        property: TermRef::resolve(property, prefixes),
        domain: TermRef::resolve(domain, prefixes),
        range: TermRef::resolve(range, prefixes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BindingValue;

    const BASE: &str = "http://example.org/ontology#";

    fn binding(s: Option<&str>, domain: Option<&str>, range: Option<&str>) -> Binding {
        let mut b = Binding::new();
        for (var, value) in [(PROPERTY_VAR, s), (DOMAIN_VAR, domain), (RANGE_VAR, range)] {
            if let Some(value) = value {
                b.insert(var.to_string(), BindingValue::uri(value));
            }
        }
        b
    }

    #[test]
    fn test_term_in_base_namespace() {
        let mut prefixes = PrefixCache::new(BASE);
        let term = TermRef::resolve("http://example.org/ontology#has_author", &mut prefixes);
        assert_eq!(term.expansion, BASE);
        assert_eq!(term.prefix, "");
        assert_eq!(term.local_name, "has_author");
        assert_eq!(term.label, "has author");
        assert_eq!(term.qualified_name(), ":has_author");
    }

    #[test]
    fn test_unresolved_term_uses_full_iri() {
        let mut prefixes = PrefixCache::new(BASE);
        let mut term = TermRef::resolve("http://xmlns.com/foaf/0.1/Person", &mut prefixes);
        assert!(!term.has_prefix());
        assert_eq!(term.qualified_name(), "http://xmlns.com/foaf/0.1/Person");

        prefixes.insert("http://xmlns.com/foaf/0.1/", "foaf");
        assert!(term.refresh(&prefixes));
        assert_eq!(term.qualified_name(), "foaf:Person");
    }

    #[test]
    fn test_load_indexes_and_skips_malformed() {
        let mut prefixes = PrefixCache::new(BASE);
        let mut cache = OntologyCache::new();
        let bindings = vec![
            binding(
                Some(&format!("{BASE}writes")),
                Some(&format!("{BASE}Person")),
                Some(&format!("{BASE}Book")),
            ),
            binding(
                Some(&format!("{BASE}name")),
                None,
                Some("http://www.w3.org/2001/XMLSchema#string"),
            ),
            binding(Some(&format!("{BASE}age")), Some(&format!("{BASE}Person")), None),
        ];

        let report = cache.load(&bindings, &mut prefixes);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(
            report.skipped[0],
            OntologyError::MalformedBinding { index: 1, missing: "domain" }
        ));
        assert_eq!(cache.facts_for_domain("Person").count(), 1);
        assert_eq!(cache.facts_for_property("writes").count(), 1);
        assert_eq!(cache.facts_for_domain("Book").count(), 0);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut prefixes = PrefixCache::new(BASE);
        let mut cache = OntologyCache::new();
        let old = cache.begin_load();
        let new = cache.begin_load();
        let bindings = vec![binding(
            Some(&format!("{BASE}p")),
            Some(&format!("{BASE}A")),
            Some(&format!("{BASE}B")),
        )];

        assert!(cache.apply_load(old, &bindings, &mut prefixes).is_none());
        assert!(!cache.is_loaded());
        let report = cache.apply_load(new, &bindings, &mut prefixes);
        assert_eq!(report.map(|r| r.loaded), Some(1));
    }

    #[test]
    fn test_refresh_prefixes_counts_changes() {
        let mut prefixes = PrefixCache::new(BASE);
        let mut cache = OntologyCache::new();
        let foaf = "http://xmlns.com/foaf/0.1/";
        let bindings = vec![binding(
            Some(&format!("{foaf}knows")),
            Some(&format!("{foaf}Person")),
            Some(&format!("{BASE}Agent")),
        )];
        cache.load(&bindings, &mut prefixes);

        let request = prefixes.take_requests().remove(0);
        prefixes.complete(&request, Ok("foaf:a".to_string()));
        assert_eq!(cache.refresh_prefixes(&prefixes), 2);
        assert_eq!(cache.facts()[0].property.qualified_name(), "foaf:knows");
        assert_eq!(cache.refresh_prefixes(&prefixes), 0);
    }
}
