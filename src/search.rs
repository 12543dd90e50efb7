use serde::Serialize;

use crate::{
    config::DEFAULT_RESULT_COUNT,
    corpus::Corpus,
    query::parse_query,
    ranker::Ranker,
};

/// Options for one search run.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub count: usize,
    pub all: bool,
    pub min_score: f64,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            count: DEFAULT_RESULT_COUNT,
            all: false,
            min_score: 0.0,
        }
    }
}

/// One ranked document as shown to a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub path: String,
    pub score: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    query: &'a str,
    result_count: usize,
    results: &'a [SearchHit],
}

/// Parse, rank and truncate.
///
/// 1. Parse the raw query into exact and fuzzy needles
/// 2. Rank the whole corpus
/// 3. Filter by `min_score`
/// 4. Keep the first `count` hits unless `all` is set
///
/// An empty query yields no hits.
pub fn execute_search(
    params: &SearchParams,
    corpus: &Corpus,
    ranker: &Ranker,
) -> Vec<SearchHit> {
    let parsed = parse_query(&params.query);
    if parsed.is_empty() {
        tracing::debug!(query = %params.query, "query has no needles");
        return Vec::new();
    }

    let ranked = ranker.rank(corpus, &parsed);
    let limit = if params.all { ranked.len() } else { params.count };

    let hits: Vec<SearchHit> = ranked
        .into_iter()
        .filter(|r| r.score >= params.min_score)
        .take(limit)
        .enumerate()
        .map(|(i, r)| SearchHit {
            rank: i + 1,
            path: r.document.path.clone(),
            score: r.score,
        })
        .collect();

    tracing::debug!(
        query = %params.query,
        exact = parsed.exact.len(),
        fuzzy = parsed.fuzzy.len(),
        hits = hits.len(),
        "search finished"
    );

    hits
}

/// Format results for human-readable terminal output.
pub fn format_human(results: &[SearchHit]) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    for r in results {
        println!("{:>3}. [{:.3}] {}", r.rank, r.score, r.path);
    }
    println!("\n{} result(s)", results.len());
}

/// Format results as JSON output.
pub fn format_json(results: &[SearchHit], query: &str) -> serde_json::Result<()> {
    println!("{}", render_json(results, query)?);
    Ok(())
}

fn render_json(results: &[SearchHit], query: &str) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport {
        query,
        result_count: results.len(),
        results,
    })
}

/// Format results as plain file paths (one per line).
pub fn format_files(results: &[SearchHit]) {
    for r in results {
        println!("{}", r.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index_builder::build_corpus;

    fn setup_corpus() -> Corpus {
        let docs = vec![
            (
                "rust-guide.md",
                "Rust is a systems programming language focused on safety, \
                 concurrency, and performance. It achieves memory safety \
                 without garbage collection.",
            ),
            (
                "python-intro.md",
                "Python is a high-level interpreted programming language \
                 known for its readability and simplicity. It supports \
                 multiple programming paradigms.",
            ),
            (
                "cooking-pasta.md",
                "Boil water in a large pot. Add salt. Cook the pasta \
                 according to package directions. Drain and serve with \
                 your favorite sauce.",
            ),
            (
                "gardening.md",
                "Water your plants regularly. Ensure proper sunlight \
                 exposure. Use compost for healthy soil. Prune dead \
                 leaves periodically.",
            ),
            (
                "machine-learning.md",
                "Machine learning is a subset of artificial intelligence \
                 that enables systems to learn from data. Neural networks \
                 and deep learning are popular approaches.",
            ),
        ];

        build_corpus(
            docs.into_iter()
                .map(|(p, t)| (p.to_string(), t.to_string()))
                .collect(),
        )
    }

    #[test]
    fn returns_relevant_results() {
        let corpus = setup_corpus();
        let results = execute_search(
            &SearchParams::new("rust safety"),
            &corpus,
            &Ranker::default(),
        );

        assert!(!results.is_empty(), "search should return results");
        assert_eq!(results[0].path, "rust-guide.md");
    }

    #[test]
    fn results_have_sequential_ranks() {
        let corpus = setup_corpus();
        let results = execute_search(
            &SearchParams::new("programming"),
            &corpus,
            &Ranker::default(),
        );

        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.rank, i + 1, "ranks should be 1-indexed");
        }
    }

    #[test]
    fn respects_count_limit() {
        let corpus = setup_corpus();
        let mut params = SearchParams::new("programming");
        params.count = 1;

        let results = execute_search(&params, &corpus, &Ranker::default());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn all_flag_ignores_count() {
        let corpus = setup_corpus();
        let mut params = SearchParams::new("programming");
        params.count = 1;
        params.all = true;

        let results = execute_search(&params, &corpus, &Ranker::default());
        assert_eq!(results.len(), corpus.len());
    }

    #[test]
    fn respects_min_score() {
        let corpus = setup_corpus();
        let mut params = SearchParams::new("programming");
        params.min_score = 2.0; // cosine never exceeds 1

        let results = execute_search(&params, &corpus, &Ranker::default());
        assert!(results.is_empty());
    }

    #[test]
    fn positive_min_score_drops_unrelated_documents() {
        let corpus = setup_corpus();
        let mut params = SearchParams::new("pasta");
        params.all = true;
        params.min_score = f64::MIN_POSITIVE;

        let results = execute_search(&params, &corpus, &Ranker::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "cooking-pasta.md");
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn scores_are_descending() {
        let corpus = setup_corpus();
        let results = execute_search(
            &SearchParams::new("water language"),
            &corpus,
            &Ranker::default(),
        );

        for window in results.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
    }

    #[test]
    fn fuzzy_needle_finds_partial_word() {
        let corpus = setup_corpus();
        let results = execute_search(
            &SearchParams::new("*intellig*"),
            &corpus,
            &Ranker::default(),
        );

        assert_eq!(results[0].path, "machine-learning.md");
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn empty_query_returns_nothing() {
        let corpus = setup_corpus();
        for query in ["", "   ", "123 !!", "**"] {
            let results = execute_search(
                &SearchParams::new(query),
                &corpus,
                &Ranker::default(),
            );
            assert!(results.is_empty(), "{query:?}");
        }
    }

    #[test]
    fn json_report_shape() {
        let hits = vec![SearchHit {
            rank: 1,
            path: "a \"quoted\" path.md".to_string(),
            score: 0.5,
        }];

        let rendered = render_json(&hits, "needle").unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["query"], "needle");
        assert_eq!(value["result_count"], 1);
        assert_eq!(value["results"][0]["rank"], 1);
        assert_eq!(value["results"][0]["path"], "a \"quoted\" path.md");
        assert_eq!(value["results"][0]["score"], 0.5);
    }
}
