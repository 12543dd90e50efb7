//! Fuzzy substring scoring.
//!
//! A needle is matched greedily against every starting offset of a
//! haystack. Each matched character earns one point, or five when it
//! directly follows the previously matched character, so contiguous runs
//! dominate scattered hits.

use std::collections::BTreeMap;

/// Points for a matched character that does not extend a run.
const ISOLATED_MATCH_POINTS: u64 = 1;

/// Points for a matched character directly after the previous match.
const CONTIGUOUS_MATCH_POINTS: u64 = 5;

/// Half-open byte range `[begin, end)` of one run of matched characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub begin: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: u64,
    /// Matched runs in left-to-right order, never overlapping.
    pub ranges: Vec<MatchRange>,
}

impl ScoreResult {
    /// Begin offset of the last recorded range, `usize::MAX` when there
    /// is none.
    fn last_match_begin(&self) -> usize {
        self.ranges.last().map_or(usize::MAX, |range| range.begin)
    }
}

/// Entry of a string-keyed map selected by [`map_get`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapMatch<'a, V> {
    pub key: &'a str,
    pub value: &'a V,
    pub score: ScoreResult,
}

/// Score how well `needle` matches inside `haystack`.
///
/// Every starting offset gets one greedy scan; the needle does not have
/// to be fully consumed. The attempt with the strictly highest score
/// wins, so ties keep the earliest starting offset.
///
/// # Examples
///
/// ```
/// use docseek::fuzzy::{score, MatchRange};
///
/// let result = score("hello world", "wor");
/// assert_eq!(result.score, 11);
/// assert_eq!(result.ranges, vec![MatchRange { begin: 6, end: 9 }]);
/// ```
pub fn score(haystack: &str, needle: &str) -> ScoreResult {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() {
        return ScoreResult::default();
    }

    // (byte offset, char) pairs; ranges are reported in byte offsets.
    let chars: Vec<(usize, char)> = haystack.char_indices().collect();

    let mut best = ScoreResult::default();
    for start in 0..chars.len() {
        let current = scan_from(haystack, &chars, start, &needle);
        if current.score > best.score {
            best = current;
        }
    }

    best
}

/// One greedy scan of `needle` through `chars[start..]`.
fn scan_from(
    haystack: &str,
    chars: &[(usize, char)],
    start: usize,
    needle: &[char],
) -> ScoreResult {
    let mut result = ScoreResult::default();
    let mut open: Option<MatchRange> = None;
    let mut prev_match: Option<usize> = None;
    let mut needle_idx = 0;

    for (cursor, &(offset, ch)) in chars.iter().enumerate().skip(start) {
        if needle_idx >= needle.len() {
            break;
        }
        if ch != needle[needle_idx] {
            continue;
        }

        let end = chars
            .get(cursor + 1)
            .map_or(haystack.len(), |&(next, _)| next);

        let extends_run = prev_match.is_some_and(|prev| prev + 1 == cursor);
        match open.as_mut() {
            Some(range) if extends_run => {
                result.score += CONTIGUOUS_MATCH_POINTS;
                range.end = end;
            }
            _ => {
                result.score += ISOLATED_MATCH_POINTS;
                if let Some(range) = open.take() {
                    result.ranges.push(range);
                }
                open = Some(MatchRange { begin: offset, end });
            }
        }

        needle_idx += 1;
        prev_match = Some(cursor);
    }

    if let Some(range) = open {
        result.ranges.push(range);
    }

    result
}

/// Highest score `needle` can reach: every character matched contiguously.
pub fn best_score_from_needle(needle: &str) -> u64 {
    match needle.chars().count() as u64 {
        0 => 0,
        len => CONTIGUOUS_MATCH_POINTS * (len - 1) + ISOLATED_MATCH_POINTS,
    }
}

/// Ordering used to pick the best fuzzy match.
///
/// Scores compare first. On equal scores the begin offset of the *last*
/// recorded range decides, with a missing range treated as `usize::MAX`.
pub fn score_result_less(a: &ScoreResult, b: &ScoreResult) -> bool {
    if a.score == b.score {
        return a.last_match_begin() < b.last_match_begin();
    }
    a.score < b.score
}

/// Return the entry of `map` whose key scores best against `needle`.
///
/// Keys are visited in map order; a later key replaces the current best
/// only when it compares strictly greater.
pub fn map_get<'a, V>(
    map: &'a BTreeMap<String, V>,
    needle: &str,
) -> Option<MapMatch<'a, V>> {
    map_get_with(map, needle, score)
}

/// [`map_get`] with a caller-supplied scoring function, so results can be
/// served from a cache.
pub fn map_get_with<'a, V, F>(
    map: &'a BTreeMap<String, V>,
    needle: &str,
    mut scorer: F,
) -> Option<MapMatch<'a, V>>
where
    F: FnMut(&str, &str) -> ScoreResult,
{
    let mut best: Option<MapMatch<'a, V>> = None;

    for (key, value) in map {
        let candidate = scorer(key.as_str(), needle);
        let replace = match &best {
            None => true,
            Some(current) => score_result_less(&current.score, &candidate),
        };
        if replace {
            best = Some(MapMatch {
                key: key.as_str(),
                value,
                score: candidate,
            });
        }
    }

    best
}

/// Score every haystack against `needle`, ordered ascending by
/// [`score_result_less`].
pub fn score_many<'a>(
    haystacks: &[&'a str],
    needle: &str,
) -> Vec<(&'a str, ScoreResult)> {
    let mut scored: Vec<(&str, ScoreResult)> = haystacks
        .iter()
        .map(|haystack| (*haystack, score(haystack, needle)))
        .collect();

    scored.sort_by(|(_, a), (_, b)| {
        if score_result_less(a, b) {
            std::cmp::Ordering::Less
        } else if score_result_less(b, a) {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    });

    scored
}
