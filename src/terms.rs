use std::cell::RefCell;

use tantivy::tokenizer::{
    Language,
    RawTokenizer,
    Stemmer,
    TextAnalyzer,
    TokenStream,
};

thread_local! {
    // The analyzer needs `&mut self` to tokenize, so each worker thread
    // keeps its own.
    static EN_STEM: RefCell<TextAnalyzer> = RefCell::new(
        TextAnalyzer::builder(RawTokenizer::default())
            .filter(Stemmer::new(Language::English))
            .build(),
    );
}

/// Lower-case and stem a single word.
///
/// Falls back to the lower-cased word when the stemmer produces nothing.
///
/// # Examples
///
/// ```
/// use docseek::terms::normalize;
///
/// assert_eq!(normalize("Running"), "run");
/// ```
pub fn normalize(word: &str) -> String {
    let lowered = word.trim().to_lowercase();

    let stemmed = EN_STEM.with_borrow_mut(|analyzer| {
        let mut stream = analyzer.token_stream(&lowered);
        stream.next().map(|token| token.text.clone())
    });

    match stemmed {
        Some(stem) if !stem.is_empty() => stem,
        _ => lowered,
    }
}

/// Split text into normalized terms.
///
/// Runs of alphabetic characters form words; everything else (digits,
/// punctuation, whitespace) only separates them.
pub fn terms_from_str(text: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut word = String::new();

    for ch in text.chars() {
        if ch.is_alphabetic() {
            word.push(ch);
        } else if !word.is_empty() {
            terms.push(normalize(&word));
            word.clear();
        }
    }

    if !word.is_empty() {
        terms.push(normalize(&word));
    }

    terms
}
