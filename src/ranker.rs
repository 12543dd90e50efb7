use std::{
    collections::{BTreeMap, HashMap},
    sync::{PoisonError, RwLock},
};

use rayon::prelude::*;

use crate::{
    config::FuzzyThreshold,
    corpus::{Corpus, Document},
    fuzzy::{self, ScoreResult},
    query::ParsedQuery,
};

/// A document paired with its similarity to one query.
#[derive(Debug, Clone, Copy)]
pub struct RankedDocument<'a> {
    pub document: &'a Document,
    pub score: f64,
}

/// Entries a [`ScoreCache`] holds before it starts over.
pub const DEFAULT_SCORE_CACHE_LIMIT: usize = 100_000;

/// Memoized fuzzy scores keyed by `(haystack, needle)`.
///
/// Shared by every ranking task of a [`Ranker`]. Needles come from user
/// queries, so the key space is unbounded: once `limit` entries are
/// stored the cache is cleared before the next insert.
#[derive(Debug)]
pub struct ScoreCache {
    entries: RwLock<HashMap<(String, String), ScoreResult>>,
    limit: usize,
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::with_limit(DEFAULT_SCORE_CACHE_LIMIT)
    }
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            limit: limit.max(1),
        }
    }

    /// Cached [`fuzzy::score`].
    pub fn score(&self, haystack: &str, needle: &str) -> ScoreResult {
        let key = (haystack.to_string(), needle.to_string());

        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return hit.clone();
        }

        let result = fuzzy::score(haystack, needle);

        let mut entries =
            self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= self.limit {
            tracing::debug!(entries = entries.len(), "score cache full, clearing");
            entries.clear();
        }
        entries.insert(key, result.clone());
        result
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Orders documents by cosine similarity to a parsed query.
#[derive(Debug, Default)]
pub struct Ranker {
    threshold: FuzzyThreshold,
    cache: ScoreCache,
}

impl Ranker {
    pub fn new(threshold: FuzzyThreshold) -> Self {
        Self::with_cache(threshold, ScoreCache::new())
    }

    pub fn with_cache(threshold: FuzzyThreshold, cache: ScoreCache) -> Self {
        Self { threshold, cache }
    }

    pub fn threshold(&self) -> FuzzyThreshold {
        self.threshold
    }

    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    /// Score every document of `corpus` against `query`, best first.
    ///
    /// Documents are scored independently and in parallel. The order of
    /// documents with equal scores is unspecified.
    pub fn rank<'a>(
        &self,
        corpus: &'a Corpus,
        query: &ParsedQuery,
    ) -> Vec<RankedDocument<'a>> {
        let mut ranked: Vec<RankedDocument<'a>> = corpus
            .documents
            .par_iter()
            .map(|document| RankedDocument {
                document,
                score: self.similarity(document, query),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        ranked
    }

    /// Cosine similarity between `document` and its query vector.
    pub fn similarity(&self, document: &Document, query: &ParsedQuery) -> f64 {
        let query_vector = self.query_vector(document, query);
        cosine_similarity(&document.weights, &query_vector)
    }

    /// Weights of the document terms selected by `query`.
    ///
    /// Exact needles are looked up directly. Each fuzzy needle picks the
    /// best scoring term of the document's vocabulary, kept only if the
    /// score passes the threshold. Empty fuzzy needles select nothing.
    pub fn query_vector<'a>(
        &self,
        document: &'a Document,
        query: &ParsedQuery,
    ) -> BTreeMap<&'a str, f64> {
        let mut vector = BTreeMap::new();

        for needle in query.fuzzy.iter().filter(|n| !n.is_empty()) {
            let best = fuzzy::map_get_with(&document.weights, needle, |h, n| {
                self.cache.score(h, n)
            });
            if let Some(found) = best
                && self.threshold.accepts(found.score.score, needle)
            {
                vector.insert(found.key, *found.value);
            }
        }

        for needle in &query.exact {
            if let Some((term, weight)) = document.weights.get_key_value(needle)
            {
                vector.insert(term.as_str(), *weight);
            }
        }

        vector
    }
}

/// Cosine similarity of a document vector and a query vector.
///
/// The dot product runs over document terms present in the query; each
/// norm covers its whole vector. Zero when either norm is zero.
pub fn cosine_similarity(
    document: &BTreeMap<String, f64>,
    query: &BTreeMap<&str, f64>,
) -> f64 {
    let mut dot = 0.0;
    let mut document_norm = 0.0;
    for (term, a) in document {
        if let Some(b) = query.get(term.as_str()) {
            dot += a * b;
        }
        document_norm += a * a;
    }

    let query_norm: f64 = query.values().map(|b| b * b).sum();

    if document_norm == 0.0 || query_norm == 0.0 {
        return 0.0;
    }
    dot / (document_norm.sqrt() * query_norm.sqrt())
}
