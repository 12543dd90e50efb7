use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One indexed file.
///
/// `weights` maps every distinct term of the document to its TF-IDF
/// weight. It is ordered by term so that vocabulary scans visit keys in
/// the same order on every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub path: String,
    pub terms: Vec<String>,
    pub weights: BTreeMap<String, f64>,
}

impl Document {
    /// Euclidean norm of the weight vector.
    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }
}

/// Every document produced by one indexing run, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub documents: Vec<Document>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Number of distinct terms across all documents.
    pub fn vocabulary_size(&self) -> usize {
        self.documents
            .iter()
            .flat_map(|doc| doc.weights.keys())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str, weights: &[(&str, f64)]) -> Document {
        Document {
            path: path.to_string(),
            terms: weights.iter().map(|(t, _)| t.to_string()).collect(),
            weights: weights
                .iter()
                .map(|(t, w)| (t.to_string(), *w))
                .collect(),
        }
    }

    #[test]
    fn norm_of_weights() {
        let d = doc("a", &[("x", 3.0), ("y", 4.0)]);
        assert!((d.norm() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn norm_of_empty_document_is_zero() {
        assert_eq!(Document::default().norm(), 0.0);
    }

    #[test]
    fn vocabulary_counts_distinct_terms() {
        let corpus = Corpus::new(vec![
            doc("a", &[("x", 1.0), ("y", 1.0)]),
            doc("b", &[("y", 1.0), ("z", 1.0)]),
        ]);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.vocabulary_size(), 3);
    }

    #[test]
    fn empty_corpus() {
        let corpus = Corpus::default();
        assert!(corpus.is_empty());
        assert_eq!(corpus.vocabulary_size(), 0);
        assert_eq!(corpus.iter().count(), 0);
    }
}
