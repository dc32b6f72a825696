//! The match engine: an exact phase over the flat projection, falling back
//! to a ranked fuzzy phase built from prefix, suffix, mid-string, and
//! prefix+suffix-combined candidates.

use crate::automaton::SuffixAutomaton;
use crate::span::{count_non_ws, expand_left, expand_right};
use crate::text::FlatView;
use crate::zarray::{prefix_match_lengths, suffix_match_lengths};

const MAX_SPANS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Prefix,
    Suffix,
    Mid,
    Combined,
}

#[derive(Debug, Clone, Copy)]
struct RawMatch {
    kind: MatchKind,
    flat_start: usize,
    flat_end_excl: usize,
    matched_len: usize,
}

/// A located match, carrying both its flat-projection coordinates (for
/// internal bookkeeping) and its raw-text coordinates (for editing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub flat_start: usize,
    pub flat_end_excl: usize,
    pub raw_start: usize,
    pub raw_end_excl: usize,
}

#[derive(Debug, Clone)]
pub enum MatchResult {
    Exact(Vec<MatchSpan>),
    Fuzzy(Vec<MatchSpan>),
}

impl MatchResult {
    pub fn spans(&self) -> &[MatchSpan] {
        match self {
            MatchResult::Exact(spans) | MatchResult::Fuzzy(spans) => spans,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, MatchResult::Exact(_))
    }
}

/// Minimum length a fuzzy candidate must reach to be considered at all.
fn min_match_len(m: usize) -> usize {
    if m <= 8 {
        3.min(m)
    } else {
        let percent = 0.4 + 0.4 * (m as f64 / 1500.0).min(1.0);
        (m as f64 * percent).ceil() as usize
    }
}

fn find_exact(text: &[char], pattern: &[char]) -> Vec<usize> {
    let mut starts = Vec::new();
    let n = text.len();
    let m = pattern.len();
    if m == 0 || m > n {
        return starts;
    }
    let mut start = 0usize;
    while start + m <= n && starts.len() < MAX_SPANS {
        if &text[start..start + m] == pattern {
            starts.push(start);
        }
        start += 1;
    }
    starts
}

/// Locate `search` inside `raw`, ignoring whitespace differences. Returns
/// `Exact` with up to 3 overlapping literal spans if any exist in the flat
/// projection, otherwise a best-effort `Fuzzy` ranking with up to 3
/// candidates (empty if nothing clears the fuzzy floor).
pub fn find_matches(raw: &[char], search: &str) -> MatchResult {
    let pattern: Vec<char> = search.chars().filter(|c| !c.is_whitespace()).collect();
    if pattern.is_empty() {
        return MatchResult::Fuzzy(Vec::new());
    }

    let view = FlatView::build(raw);
    let raw_len = raw.len();

    let exact_starts = find_exact(&view.flat, &pattern);
    if !exact_starts.is_empty() {
        let spans = exact_starts
            .into_iter()
            .map(|flat_start| {
                let flat_end_excl = flat_start + pattern.len();
                to_span(&view, raw_len, flat_start, flat_end_excl)
            })
            .collect();
        return MatchResult::Exact(spans);
    }

    MatchResult::Fuzzy(fuzzy_matches(raw, &view, &pattern))
}

fn to_span(view: &FlatView, raw_len: usize, flat_start: usize, flat_end_excl: usize) -> MatchSpan {
    MatchSpan {
        flat_start,
        flat_end_excl,
        raw_start: view.point_to_raw(flat_start, raw_len),
        raw_end_excl: view.end_to_raw(flat_end_excl, raw_len),
    }
}

/// Locate the last exact occurrence of `search` in `raw`'s flat projection,
/// with no cap on how many occurrences are scanned. `find_matches` caps the
/// exact phase at [`MAX_SPANS`] for disambiguation purposes; block-end-marker
/// resolution needs the true last occurrence even when a marker recurs more
/// than three times, so it walks the whole buffer here instead.
pub fn find_last_exact(raw: &[char], search: &str) -> Option<MatchSpan> {
    let pattern: Vec<char> = search.chars().filter(|c| !c.is_whitespace()).collect();
    if pattern.is_empty() {
        return None;
    }

    let view = FlatView::build(raw);
    let raw_len = raw.len();
    let m = pattern.len();
    let n = view.flat.len();
    if m > n {
        return None;
    }

    let mut last_start = None;
    let mut start = 0usize;
    while start + m <= n {
        if view.flat[start..start + m] == pattern[..] {
            last_start = Some(start);
        }
        start += 1;
    }

    last_start.map(|flat_start| to_span(&view, raw_len, flat_start, flat_start + m))
}

fn fuzzy_matches(raw: &[char], view: &FlatView, pattern: &[char]) -> Vec<MatchSpan> {
    let m = pattern.len();
    let min_len = min_match_len(m);
    let half_threshold = (min_len / 2).max(1);

    let prefix_lens = prefix_match_lengths(pattern, &view.flat);
    let suffix_lens = suffix_match_lengths(pattern, &view.flat);
    let automaton = SuffixAutomaton::build(pattern);
    let mid_raw: Vec<RawMatch> = automaton
        .scan(&view.flat, min_len)
        .into_iter()
        .filter(|m| !m.is_prefix && !m.is_suffix)
        .map(|m| RawMatch {
            kind: MatchKind::Mid,
            flat_start: m.flat_start,
            flat_end_excl: m.flat_end_excl,
            matched_len: m.matched_len,
        })
        .collect();

    let prefix_raw: Vec<RawMatch> = prefix_lens
        .iter()
        .enumerate()
        .filter(|(_, &len)| len > 0)
        .map(|(p, &len)| RawMatch {
            kind: MatchKind::Prefix,
            flat_start: p,
            flat_end_excl: p + len,
            matched_len: len,
        })
        .collect();

    let suffix_raw: Vec<RawMatch> = suffix_lens
        .iter()
        .enumerate()
        .filter(|(_, &len)| len > 0)
        .map(|(s, &len)| RawMatch {
            kind: MatchKind::Suffix,
            flat_start: s,
            flat_end_excl: s + len,
            matched_len: len,
        })
        .collect();

    let kept_prefix: Vec<&RawMatch> = prefix_raw
        .iter()
        .filter(|rm| rm.matched_len >= half_threshold)
        .collect();
    let mut kept_suffix: Vec<&RawMatch> = suffix_raw
        .iter()
        .filter(|rm| rm.matched_len >= half_threshold)
        .collect();
    kept_suffix.sort_by_key(|rm| rm.flat_start);

    let low_bound = (0.75 * m as f64).ceil() as usize;
    let high_bound = (1.25 * m as f64).floor() as usize;

    let mut combined = Vec::new();
    for pre in &kept_prefix {
        for suf in &kept_suffix {
            if suf.flat_start < pre.flat_end_excl {
                continue;
            }
            let span_len = suf.flat_end_excl - pre.flat_start;
            if span_len > high_bound {
                break;
            }
            if span_len < low_bound {
                continue;
            }
            if pre.matched_len + suf.matched_len < min_len {
                continue;
            }
            combined.push(RawMatch {
                kind: MatchKind::Combined,
                flat_start: pre.flat_start,
                flat_end_excl: suf.flat_end_excl,
                matched_len: pre.matched_len + suf.matched_len,
            });
        }
    }

    let mut pool: Vec<RawMatch> = Vec::new();
    pool.extend(mid_raw);
    pool.extend(combined);
    pool.extend(prefix_raw.iter().filter(|rm| rm.matched_len >= min_len).copied());
    pool.extend(suffix_raw.iter().filter(|rm| rm.matched_len >= min_len).copied());

    if pool.is_empty() {
        return Vec::new();
    }

    let max_len = pool.iter().map(|rm| rm.matched_len).max().unwrap();
    pool.retain(|rm| rm.matched_len == max_len);
    pool.sort_by_key(|rm| (rm.flat_start, rm.flat_end_excl));
    pool.dedup_by_key(|rm| (rm.flat_start, rm.flat_end_excl));
    pool.truncate(MAX_SPANS);

    pool.into_iter()
        .map(|rm| materialize(raw, view, m, rm))
        .collect()
}

fn materialize(raw: &[char], view: &FlatView, m: usize, rm: RawMatch) -> MatchSpan {
    let raw_len = raw.len();
    let (raw_start, raw_end_excl) = match rm.kind {
        MatchKind::Prefix => {
            let start = view.point_to_raw(rm.flat_start, raw_len);
            let mut end = expand_right(raw, start);
            while count_non_ws(raw, start, end) < m && end < raw_len {
                end = expand_right(raw, end + 1);
            }
            (start, end)
        }
        MatchKind::Suffix => {
            let end = view.end_to_raw(rm.flat_end_excl, raw_len);
            let mut start = expand_left(raw, end);
            while count_non_ws(raw, start, end) < m && start > 0 {
                start = expand_left(raw, start - 1);
            }
            (start, end)
        }
        MatchKind::Mid => {
            let mut start = expand_left(raw, view.point_to_raw(rm.flat_start, raw_len));
            let mut end = expand_right(raw, view.end_to_raw(rm.flat_end_excl, raw_len));
            loop {
                if count_non_ws(raw, start, end) >= m {
                    break;
                }
                let mut changed = false;
                if start > 0 {
                    let new_start = expand_left(raw, start - 1);
                    if new_start < start {
                        start = new_start;
                        changed = true;
                    }
                }
                if count_non_ws(raw, start, end) >= m {
                    break;
                }
                if end < raw_len {
                    let new_end = expand_right(raw, end + 1);
                    if new_end > end {
                        end = new_end;
                        changed = true;
                    }
                }
                if !changed {
                    break;
                }
            }
            (start, end)
        }
        MatchKind::Combined => (
            view.point_to_raw(rm.flat_start, raw_len),
            view.end_to_raw(rm.flat_end_excl, raw_len),
        ),
    };

    MatchSpan {
        flat_start: rm.flat_start,
        flat_end_excl: rm.flat_end_excl,
        raw_start,
        raw_end_excl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn exact_phase_finds_overlapping_literal_hits() {
        let raw = chars("aaaa");
        let result = find_matches(&raw, "aa");
        assert!(result.is_exact());
        // Overlapping scan with +1 advance: starts at 0, 1, 2.
        assert_eq!(result.spans().len(), 3);
    }

    #[test]
    fn exact_phase_ignores_whitespace_differences() {
        let raw = chars("fn   foo ( ) {}");
        let result = find_matches(&raw, "foo()");
        assert!(result.is_exact());
        assert_eq!(result.spans().len(), 1);
        let span = &result.spans()[0];
        let matched: String = raw[span.raw_start..span.raw_end_excl].iter().collect();
        assert_eq!(matched, "foo ( )");
    }

    #[test]
    fn empty_search_text_yields_no_spans() {
        let raw = chars("anything at all");
        let result = find_matches(&raw, "   ");
        assert!(result.spans().is_empty());
    }

    #[test]
    fn fuzzy_phase_activates_when_no_exact_hit() {
        let raw = chars("the quick brown fox jumps over the lazy dog");
        // Not present verbatim (extra word inserted), but close.
        let result = find_matches(&raw, "the quick red brown fox jumps");
        match result {
            MatchResult::Fuzzy(spans) => assert!(!spans.is_empty()),
            MatchResult::Exact(_) => panic!("expected a fuzzy result"),
        }
    }

    #[test]
    fn unrelated_search_text_yields_no_fuzzy_spans() {
        let raw = chars("completely unrelated content over here");
        let result = find_matches(&raw, "zzzzzzzzzzzzzzzzzzzz");
        assert!(result.spans().is_empty());
    }

    #[test]
    fn find_last_exact_looks_past_the_three_match_cap() {
        // "x" occurs 5 times; find_matches caps the exact phase at 3 (the
        // first three), but find_last_exact must report the true last one.
        let raw = chars("x x x x x");
        let capped = find_matches(&raw, "x");
        assert_eq!(capped.spans().len(), 3);

        let last = find_last_exact(&raw, "x").unwrap();
        assert_eq!(last.raw_start, 8);
        assert_eq!(last.raw_end_excl, 9);
    }

    #[test]
    fn find_last_exact_returns_none_without_a_match() {
        let raw = chars("nothing here");
        assert!(find_last_exact(&raw, "zzz").is_none());
    }
}
