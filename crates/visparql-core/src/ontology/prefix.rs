//! Memoized namespace-to-prefix resolution.
//!
//! Lookups never block. A miss records a pending request and returns the raw
//! expansion as a placeholder; the session drains requests with
//! [`PrefixCache::take_requests`], asks the prefix service, and reports back
//! through [`PrefixCache::complete`]. Each request carries the generation it
//! was issued under, so answers for entries that were cleared or re-requested
//! in the meantime are dropped.

use std::collections::HashMap;

use crate::client::ClientError;
use crate::config::PREFIX_SHRINK_LOCAL_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PrefixEntry {
    Resolved(String),
    Pending { generation: u64 },
    Failed,
}

/// An outstanding lookup for the prefix service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRequest {
    pub expansion: String,
    pub generation: u64,
}

impl PrefixRequest {
    /// Term sent to the shrink endpoint: the expansion plus a fixed local name.
    pub fn shrink_term(&self) -> String {
        format!("{}{}", self.expansion, PREFIX_SHRINK_LOCAL_NAME)
    }
}

/// Cache of namespace expansions and their short prefixes.
#[derive(Debug, Clone)]
pub struct PrefixCache {
    base_namespace: String,
    entries: HashMap<String, PrefixEntry>,
    /// First expansion resolved to each prefix.
    expansions: HashMap<String, String>,
    queue: Vec<PrefixRequest>,
    generation: u64,
}

impl PrefixCache {
    /// Creates an empty cache. `base_namespace` always maps to the empty prefix.
    pub fn new(base_namespace: impl Into<String>) -> Self {
        Self {
            base_namespace: base_namespace.into(),
            entries: HashMap::new(),
            expansions: HashMap::new(),
            queue: Vec::new(),
            generation: 0,
        }
    }

    pub fn base_namespace(&self) -> &str {
        &self.base_namespace
    }

    /// Prefix for `expansion`, or the expansion itself while unresolved.
    ///
    /// The first miss for an expansion queues exactly one request; later
    /// calls reuse it until it is answered.
    pub fn resolve(&mut self, expansion: &str) -> String {
        if expansion == self.base_namespace {
            return String::new();
        }
        match self.entries.get(expansion) {
            Some(PrefixEntry::Resolved(prefix)) => prefix.clone(),
            Some(PrefixEntry::Pending { .. }) | Some(PrefixEntry::Failed) => expansion.to_string(),
            None => {
                self.generation += 1;
                let generation = self.generation;
                self.set_entry(expansion.to_string(), PrefixEntry::Pending { generation });
                self.queue.push(PrefixRequest {
                    expansion: expansion.to_string(),
                    generation,
                });
                tracing::debug!(expansion, generation, "prefix lookup queued");
                expansion.to_string()
            }
        }
    }

    /// Resolved prefix for `expansion`, without queueing anything.
    pub fn peek(&self, expansion: &str) -> Option<&str> {
        if expansion == self.base_namespace {
            return Some("");
        }
        match self.entries.get(expansion) {
            Some(PrefixEntry::Resolved(prefix)) => Some(prefix),
            _ => None,
        }
    }

    /// Expansion registered for `prefix`. The empty prefix is the base namespace.
    ///
    /// When several expansions share a prefix, the first one resolved wins.
    pub fn lookup_expansion(&self, prefix: &str) -> Option<&str> {
        if prefix.is_empty() {
            return Some(&self.base_namespace);
        }
        self.expansions.get(prefix).map(String::as_str)
    }

    /// Records a known prefix without asking the service.
    pub fn insert(&mut self, expansion: impl Into<String>, prefix: impl Into<String>) {
        self.set_entry(expansion.into(), PrefixEntry::Resolved(prefix.into()));
    }

    fn set_entry(&mut self, expansion: String, entry: PrefixEntry) {
        if let Some(PrefixEntry::Resolved(old)) = self.entries.get(&expansion) {
            if self.expansions.get(old) == Some(&expansion) {
                self.expansions.remove(old);
            }
        }
        if let PrefixEntry::Resolved(prefix) = &entry {
            self.expansions
                .entry(prefix.clone())
                .or_insert_with(|| expansion.clone());
        }
        self.entries.insert(expansion, entry);
    }

    /// Drains the requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<PrefixRequest> {
        std::mem::take(&mut self.queue)
    }

    /// True while any lookup is unanswered.
    pub fn has_pending(&self) -> bool {
        self.entries
            .values()
            .any(|e| matches!(e, PrefixEntry::Pending { .. }))
    }

    /// Applies the shrink service's answer to `request`.
    ///
    /// `result` is the shrunk term (`prefix:a`). Returns false when the
    /// answer is stale and was discarded. Failures leave the raw expansion in
    /// place; they are not retried.
    pub fn complete(
        &mut self,
        request: &PrefixRequest,
        result: Result<String, ClientError>,
    ) -> bool {
        let current = match self.entries.get(&request.expansion) {
            Some(PrefixEntry::Pending { generation }) => *generation,
            _ => {
                tracing::warn!(
                    expansion = %request.expansion,
                    "discarding answer for a prefix that is no longer pending"
                );
                return false;
            }
        };
        if current != request.generation {
            tracing::warn!(
                expansion = %request.expansion,
                stale = request.generation,
                current,
                "discarding stale prefix answer"
            );
            return false;
        }

        let entry = match result {
            Ok(shrunk) => match strip_shrink_suffix(&shrunk) {
                Some(prefix) => PrefixEntry::Resolved(prefix.to_string()),
                None => {
                    tracing::warn!(
                        expansion = %request.expansion,
                        value = %shrunk,
                        "prefix service returned an unprefixed term"
                    );
                    PrefixEntry::Failed
                }
            },
            Err(e) => {
                tracing::warn!(
                    expansion = %request.expansion,
                    error = %e,
                    "prefix resolution failed"
                );
                PrefixEntry::Failed
            }
        };
        self.set_entry(request.expansion.clone(), entry);
        true
    }

    /// Forgets every entry. Answers to requests issued before now are discarded.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.expansions.clear();
        self.queue.clear();
    }
}

impl Default for PrefixCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BASE_NAMESPACE)
    }
}

fn strip_shrink_suffix(shrunk: &str) -> Option<&str> {
    shrunk
        .strip_suffix(PREFIX_SHRINK_LOCAL_NAME)
        .and_then(|rest| rest.strip_suffix(':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://example.org/ontology#";
    const FOAF: &str = "http://xmlns.com/foaf/0.1/";

    #[test]
    fn test_base_namespace_is_empty_prefix() {
        let mut cache = PrefixCache::new(BASE);
        assert_eq!(cache.resolve(BASE), "");
        assert!(cache.take_requests().is_empty());
        assert_eq!(cache.lookup_expansion(""), Some(BASE));
    }

    #[test]
    fn test_miss_queues_one_request() {
        let mut cache = PrefixCache::new(BASE);
        assert_eq!(cache.resolve(FOAF), FOAF);
        assert_eq!(cache.resolve(FOAF), FOAF);

        let requests = cache.take_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].shrink_term(), "http://xmlns.com/foaf/0.1/a");
        assert!(cache.has_pending());
    }

    #[test]
    fn test_complete_resolves() {
        let mut cache = PrefixCache::new(BASE);
        cache.resolve(FOAF);
        let request = cache.take_requests().remove(0);

        assert!(cache.complete(&request, Ok("foaf:a".to_string())));
        assert_eq!(cache.resolve(FOAF), "foaf");
        assert_eq!(cache.peek(FOAF), Some("foaf"));
        assert_eq!(cache.lookup_expansion("foaf"), Some(FOAF));
        assert!(!cache.has_pending());
    }

    #[test]
    fn test_failure_keeps_raw_expansion() {
        let mut cache = PrefixCache::new(BASE);
        cache.resolve(FOAF);
        let request = cache.take_requests().remove(0);

        assert!(cache.complete(&request, Err(ClientError::ServiceRejected(request.shrink_term()))));
        assert_eq!(cache.resolve(FOAF), FOAF);
        // No retry after a failure
        assert!(cache.take_requests().is_empty());
    }

    #[test]
    fn test_stale_answer_discarded_after_clear() {
        let mut cache = PrefixCache::new(BASE);
        cache.resolve(FOAF);
        let old = cache.take_requests().remove(0);

        cache.clear();
        cache.resolve(FOAF);
        let new = cache.take_requests().remove(0);
        assert!(new.generation > old.generation);

        assert!(!cache.complete(&old, Ok("stale:a".to_string())));
        assert_eq!(cache.peek(FOAF), None);
        assert!(cache.complete(&new, Ok("foaf:a".to_string())));
        assert_eq!(cache.peek(FOAF), Some("foaf"));
    }

    #[test]
    fn test_unprefixed_answer_is_failure() {
        let mut cache = PrefixCache::new(BASE);
        cache.resolve(FOAF);
        let request = cache.take_requests().remove(0);
        assert!(cache.complete(&request, Ok("http://xmlns.com/foaf/0.1/a".to_string())));
        assert_eq!(cache.peek(FOAF), None);
    }

    #[test]
    fn test_shared_prefix_keeps_first_expansion() {
        const FOAF_MIRROR: &str = "http://mirror.example/foaf/";
        let mut cache = PrefixCache::new(BASE);
        cache.insert(FOAF, "foaf");
        for _ in 0..10 {
            cache.insert(FOAF_MIRROR, "foaf");
            assert_eq!(cache.lookup_expansion("foaf"), Some(FOAF));
        }
        assert_eq!(cache.peek(FOAF_MIRROR), Some("foaf"));
    }

    #[test]
    fn test_reassigned_prefix_updates_lookup() {
        let mut cache = PrefixCache::new(BASE);
        cache.insert(FOAF, "f");
        cache.insert(FOAF, "foaf");
        assert_eq!(cache.lookup_expansion("f"), None);
        assert_eq!(cache.lookup_expansion("foaf"), Some(FOAF));

        cache.clear();
        assert_eq!(cache.lookup_expansion("foaf"), None);
    }
}
