// Autocomplete Index - beneficiary label suggestions
// A sorted, deduplicated label list queried by case-insensitive
// substring containment (not prefix-only). Results come back in index
// order, capped at SUGGESTION_LIMIT. Selecting a suggestion is the same
// as typing it: the returned label is the exact facet value the
// predicate engine expects.

/// Maximum suggestions returned per query.
pub const SUGGESTION_LIMIT: usize = 50;

/// Minimum query length for the dataset-wide index.
pub const MIN_QUERY_DATASET: usize = 2;

/// Minimum query length for the per-deputy detail index.
pub const MIN_QUERY_DETAIL: usize = 1;

#[derive(Debug, Clone)]
pub struct AutocompleteIndex {
    labels: Vec<String>,
    min_len: usize,
    limit: usize,
}

impl AutocompleteIndex {
    /// Build an index from raw labels: sorted, exact duplicates dropped.
    pub fn new(mut labels: Vec<String>, min_len: usize) -> Self {
        labels.sort();
        labels.dedup();
        AutocompleteIndex {
            labels,
            min_len,
            limit: SUGGESTION_LIMIT,
        }
    }

    /// Override the result cap (mostly for tests).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Substring query. Terms shorter than the configured minimum yield
    /// nothing (the UI only opens the suggestion box past the
    /// threshold).
    pub fn query(&self, term: &str) -> Vec<&str> {
        let term = term.trim().to_lowercase();
        if term.chars().count() < self.min_len {
            return Vec::new();
        }

        self.labels
            .iter()
            .filter(|label| label.to_lowercase().contains(&term))
            .map(String::as_str)
            .take(self.limit)
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
