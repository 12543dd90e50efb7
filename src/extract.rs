use std::path::Path;

use scraper::{Html, Node};

use crate::error::{Error, Result};

/// Extensions parsed as markup rather than read verbatim.
const MARKUP_EXTENSIONS: &[&str] = &["html", "htm", "xhtml", "xml"];

/// Elements whose text is never indexed.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Turns a file into the plain text that gets indexed.
pub trait Extractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String>;
}

/// Reads UTF-8 files from disk, stripping tags from markup files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl Extractor for FileExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::Extraction {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if is_markup(path) {
            Ok(text_from_html(&content))
        } else {
            Ok(content)
        }
    }
}

fn is_markup(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MARKUP_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        })
}

/// Collect the text nodes of an HTML document, separated by spaces.
///
/// Contents of `<script>` and `<style>` are dropped.
pub fn text_from_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.tree.nodes() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };

        let skipped = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()));
        if skipped {
            continue;
        }

        let trimmed = fragment.trim();
        if !trimmed.is_empty() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(trimmed);
        }
    }

    text
}
