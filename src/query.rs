use crate::terms::normalize;

/// A raw query split into exact and fuzzy needles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Stemmed words looked up verbatim in a document's vocabulary.
    pub exact: Vec<String>,
    /// Words written between `*` markers, kept as typed.
    pub fuzzy: Vec<String>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.fuzzy.is_empty()
    }
}

/// Split a raw query into exact and fuzzy needles.
///
/// Plain words become exact needles after stemming. A word opened with
/// `*` is fuzzy until the next `*`; if no closing `*` follows before the
/// word ends, the fuzzy span stays open and every later word is fuzzy
/// as well. Never fails: unbalanced markers just make the rest of the
/// query fuzzy.
///
/// # Examples
///
/// ```
/// use docseek::query::parse_query;
///
/// let parsed = parse_query("cats *dg*");
/// assert_eq!(parsed.exact, vec!["cat"]);
/// assert_eq!(parsed.fuzzy, vec!["dg"]);
/// ```
pub fn parse_query(raw: &str) -> ParsedQuery {
    let chars: Vec<char> = raw.chars().collect();
    let mut parsed = ParsedQuery::default();
    let mut inside_fuzzy = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if !ch.is_alphabetic() && ch != '*' {
            i += 1;
            continue;
        }

        if inside_fuzzy || ch == '*' {
            if !inside_fuzzy {
                // opening marker
                i += 1;
            }
            inside_fuzzy = true;

            let mut token = String::new();
            while let Some(&c) = chars.get(i) {
                if c == '*' {
                    inside_fuzzy = false;
                    i += 1;
                    break;
                }
                if !c.is_alphabetic() {
                    break;
                }
                token.push(c);
                i += 1;
            }

            if !token.is_empty() {
                parsed.fuzzy.push(token);
            }
        } else {
            let start = i;
            while i < chars.len() && chars[i].is_alphabetic() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            parsed.exact.push(normalize(&word));
        }
    }

    parsed
}
