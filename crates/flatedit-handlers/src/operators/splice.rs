//! Descending-order multi-span splicing, shared by `replace` and `delete`.

use flatedit_match::MatchSpan;

/// Replace every span's raw text with `replacement`, processing spans in
/// descending `raw_start` order so earlier splices don't invalidate later
/// raw indices.
pub fn splice_all(raw: &mut Vec<char>, spans: &[MatchSpan], replacement: &str) {
    let mut ordered: Vec<&MatchSpan> = spans.iter().collect();
    ordered.sort_by(|a, b| b.raw_start.cmp(&a.raw_start));
    let replacement_chars: Vec<char> = replacement.chars().collect();
    for span in ordered {
        raw.splice(span.raw_start..span.raw_end_excl, replacement_chars.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn span(start: usize, end: usize) -> MatchSpan {
        MatchSpan {
            flat_start: start,
            flat_end_excl: end,
            raw_start: start,
            raw_end_excl: end,
        }
    }

    #[test]
    fn splicing_descending_matches_sequential_right_to_left() {
        let mut raw = chars("foo foo foo");
        splice_all(&mut raw, &[span(0, 3), span(4, 7), span(8, 11)], "bar");
        assert_eq!(raw.iter().collect::<String>(), "bar bar bar");
    }

    #[test]
    fn splicing_with_shorter_replacement_shifts_correctly() {
        let mut raw = chars("aaa bbb ccc");
        splice_all(&mut raw, &[span(0, 3), span(8, 11)], "x");
        assert_eq!(raw.iter().collect::<String>(), "x bbb x");
    }
}
