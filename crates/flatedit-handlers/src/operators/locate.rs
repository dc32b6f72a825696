//! Shared anchor/search resolution used by the text-mutating operators:
//! turns a [`MatchResult`] into either a usable span set or a structured
//! no-match / multiple-matches [`FzError`].

use flatedit_foundation::{suggestion, FzError, Suggestion};
use flatedit_match::{expand_to_unique, find_matches, MatchResult, MatchSpan, RawSpan};

fn raw_text(raw: &[char], start: usize, end: usize) -> String {
    raw[start..end].iter().collect()
}

fn fuzzy_suggestions(raw: &[char], spans: &[MatchSpan], param: &str) -> Vec<Suggestion> {
    spans
        .iter()
        .map(|s| suggestion(param, raw_text(raw, s.raw_start, s.raw_end_excl)))
        .collect()
}

fn disambiguated_suggestions(raw: &[char], spans: &[MatchSpan], param: &str) -> Vec<Suggestion> {
    let raw_spans: Vec<RawSpan> = spans
        .iter()
        .map(|s| RawSpan {
            start: s.raw_start,
            end: s.raw_end_excl,
        })
        .collect();
    expand_to_unique(raw, &raw_spans)
        .into_iter()
        .map(|s| suggestion(param, raw_text(raw, s.start, s.end)))
        .collect()
}

/// Locate `search` for an operation that may target one or all occurrences
/// (`replace_matching_text` / `delete_matching_text`). Returns the spans to
/// operate on — either the single disambiguated match, or every exact match
/// found when `all` is true.
pub fn locate_for_edit(
    raw: &[char],
    search: &str,
    all: bool,
    param: &str,
) -> Result<Vec<MatchSpan>, FzError> {
    match find_matches(raw, search) {
        MatchResult::Fuzzy(spans) => Err(FzError::no_match(
            param,
            fuzzy_suggestions(raw, &spans, param),
        )),
        MatchResult::Exact(spans) => {
            if spans.len() > 1 && !all {
                Err(FzError::multiple_matches(
                    param,
                    disambiguated_suggestions(raw, &spans, param),
                ))
            } else {
                Ok(spans)
            }
        }
    }
}

/// Locate `search` for an operation that requires exactly one match (an
/// anchor, or the text being moved).
pub fn locate_single(raw: &[char], search: &str, param: &str) -> Result<MatchSpan, FzError> {
    match find_matches(raw, search) {
        MatchResult::Fuzzy(spans) => Err(FzError::no_match(
            param,
            fuzzy_suggestions(raw, &spans, param),
        )),
        MatchResult::Exact(spans) if spans.len() > 1 => Err(FzError::multiple_matches(
            param,
            disambiguated_suggestions(raw, &spans, param),
        )),
        MatchResult::Exact(spans) => spans.into_iter().next().ok_or_else(|| {
            FzError::no_match(param, Vec::new())
        }),
    }
}

/// Locate `search` for an anchor restricted to a `[block_start, block_end)`
/// raw range (used by `insert_text` / `move_text`'s block markers), adjusting
/// the resulting span back into whole-buffer coordinates.
pub fn locate_single_in_range(
    raw: &[char],
    range: std::ops::Range<usize>,
    search: &str,
    param: &str,
) -> Result<MatchSpan, FzError> {
    let slice = &raw[range.clone()];
    let span = locate_single(slice, search, param)?;
    Ok(MatchSpan {
        flat_start: span.flat_start,
        flat_end_excl: span.flat_end_excl,
        raw_start: span.raw_start + range.start,
        raw_end_excl: span.raw_end_excl + range.start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn single_exact_match_resolves() {
        let raw = chars("let x = 1;");
        let span = locate_single(&raw, "x = 1", "anchorText").unwrap();
        assert_eq!(&raw[span.raw_start..span.raw_end_excl].iter().collect::<String>(), "x = 1");
    }

    #[test]
    fn no_match_carries_suggestions() {
        let raw = chars("console.log('hi');");
        let err = locate_single(&raw, "console.log(hi)", "searchText").unwrap_err();
        assert!(matches!(err, FzError::NoMatch { .. }));
    }

    #[test]
    fn multiple_matches_carries_disambiguation() {
        let raw = chars("Only bar\nbar and foo\nonly foo no bar but could have been only bar");
        let err = locate_for_edit(&raw, "bar", false, "searchText").unwrap_err();
        assert!(matches!(err, FzError::MultipleMatches { .. }));
    }
}
