//! Two-pass TF-IDF indexing.
//!
//! Pass 1 tokenizes every document in parallel and records term
//! frequencies, counting how many documents contain each term. Pass 2
//! starts only after pass 1 has fully finished and scales every weight
//! by the term's inverse document frequency.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use rayon::prelude::*;

use crate::{
    corpus::{Corpus, Document},
    error::Result,
    extract::Extractor,
    terms::terms_from_str,
    walker,
};

/// Number of documents containing each term.
type DocumentFrequency = HashMap<String, usize>;

/// Walk `root`, extract every file and build a corpus from the results.
pub fn index_directory<E: Extractor>(
    root: &Path,
    extractor: &E,
) -> Result<Corpus> {
    let paths = walker::discover_files(root)?;
    tracing::info!(
        root = %root.display(),
        files = paths.len(),
        "discovered files"
    );
    Ok(build_index(&paths, extractor))
}

/// Extract text from `paths` and index it.
///
/// Files that fail extraction are logged and left out of the corpus.
pub fn build_index<E: Extractor>(paths: &[PathBuf], extractor: &E) -> Corpus {
    let sources: Vec<(String, String)> = paths
        .par_iter()
        .filter_map(|path| match extractor.extract(path) {
            Ok(text) => Some((path.to_string_lossy().into_owned(), text)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping file");
                None
            }
        })
        .collect();

    let skipped = paths.len() - sources.len();
    let corpus = build_corpus(sources);
    tracing::info!(documents = corpus.len(), skipped, "built index");
    corpus
}

/// Build TF-IDF weights for already extracted `(path, text)` pairs.
///
/// Document order follows the input order.
pub fn build_corpus(sources: Vec<(String, String)>) -> Corpus {
    let document_frequency = Mutex::new(DocumentFrequency::new());

    // Pass 1: term frequencies. Collecting the parallel iterator joins
    // every task before the frequency map is taken out of its lock.
    let mut documents: Vec<Document> = sources
        .into_par_iter()
        .map(|(path, text)| {
            let document = term_frequency_pass(path, &text);
            record_document_terms(&document_frequency, &document);
            document
        })
        .collect();

    let document_frequency = document_frequency
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);

    // Pass 2: inverse document frequencies, read-only shared state.
    let total = documents.len();
    documents.par_iter_mut().for_each(|document| {
        inverse_document_frequency_pass(document, &document_frequency, total);
    });

    tracing::debug!(
        documents = total,
        vocabulary = document_frequency.len(),
        "computed tf-idf weights"
    );

    Corpus::new(documents)
}

fn term_frequency_pass(path: String, text: &str) -> Document {
    let terms = terms_from_str(text);

    let mut weights: BTreeMap<String, f64> = BTreeMap::new();
    for term in &terms {
        *weights.entry(term.clone()).or_insert(0.0) += 1.0;
    }

    let term_count = terms.len() as f64;
    for weight in weights.values_mut() {
        *weight /= term_count;
    }

    Document {
        path,
        terms,
        weights,
    }
}

fn record_document_terms(
    document_frequency: &Mutex<DocumentFrequency>,
    document: &Document,
) {
    if document.weights.is_empty() {
        return;
    }

    let mut frequency = document_frequency
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    for term in document.weights.keys() {
        *frequency.entry(term.clone()).or_insert(0) += 1;
    }
}

fn inverse_document_frequency_pass(
    document: &mut Document,
    document_frequency: &DocumentFrequency,
    total: usize,
) {
    for (term, weight) in document.weights.iter_mut() {
        // Every term of this document was counted in pass 1, so the
        // frequency is at least 1.
        if let Some(&containing) = document_frequency.get(term) {
            *weight *= (total as f64 / containing as f64).ln();
        }
    }
}
