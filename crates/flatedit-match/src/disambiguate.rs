//! Disambiguation of ambiguous exact matches: widen each span one token at a
//! time, on both sides, until its whitespace-stripped projection is unique
//! among the set.

use std::collections::HashMap;

use crate::span::{expand_left, expand_right};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSpan {
    pub start: usize,
    pub end: usize,
}

fn projection(raw: &[char], span: RawSpan) -> Vec<char> {
    raw[span.start..span.end]
        .iter()
        .copied()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Widen each of `spans` by whole tokens until no two share the same
/// whitespace-stripped text, or until none can widen any further.
pub fn expand_to_unique(raw: &[char], spans: &[RawSpan]) -> Vec<RawSpan> {
    let mut spans: Vec<RawSpan> = spans.to_vec();
    let mut expandable = vec![true; spans.len()];

    loop {
        let mut groups: HashMap<Vec<char>, Vec<usize>> = HashMap::new();
        for (i, &span) in spans.iter().enumerate() {
            groups.entry(projection(raw, span)).or_default().push(i);
        }

        let duplicate_indices: Vec<usize> = groups
            .values()
            .filter(|idxs| idxs.len() >= 2)
            .flatten()
            .copied()
            .collect();
        if duplicate_indices.is_empty() {
            break;
        }

        let mut progressed = false;
        for i in duplicate_indices {
            if !expandable[i] {
                continue;
            }
            let span = spans[i];
            let new_start = if span.start > 0 {
                expand_left(raw, span.start - 1)
            } else {
                span.start
            };
            let new_end = if span.end < raw.len() {
                expand_right(raw, span.end + 1)
            } else {
                span.end
            };
            if new_start == span.start && new_end == span.end {
                expandable[i] = false;
            } else {
                spans[i] = RawSpan {
                    start: new_start,
                    end: new_end,
                };
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn widens_ambiguous_spans_until_distinct() {
        // Two occurrences of "foo" whose enclosing tokens differ.
        let raw = chars("call foo(1) and call foo(2)");
        let foo_a = raw.windows(3).position(|w| w == ['f', 'o', 'o']).unwrap();
        let foo_b = raw[foo_a + 1..]
            .windows(3)
            .position(|w| w == ['f', 'o', 'o'])
            .unwrap()
            + foo_a
            + 1;
        let spans = vec![
            RawSpan { start: foo_a, end: foo_a + 3 },
            RawSpan { start: foo_b, end: foo_b + 3 },
        ];
        let widened = expand_to_unique(&raw, &spans);
        let a: String = raw[widened[0].start..widened[0].end].iter().collect();
        let b: String = raw[widened[1].start..widened[1].end].iter().collect();
        assert_ne!(a, b);
    }

    #[test]
    fn leaves_already_unique_spans_untouched() {
        let raw = chars("alpha beta gamma");
        let spans = vec![
            RawSpan { start: 0, end: 5 },
            RawSpan { start: 6, end: 10 },
        ];
        let widened = expand_to_unique(&raw, &spans);
        assert_eq!(widened, spans);
    }

    #[test]
    fn stops_when_identical_spans_cannot_widen_further() {
        let raw = chars("foo foo");
        let spans = vec![
            RawSpan { start: 0, end: 3 },
            RawSpan { start: 4, end: 7 },
        ];
        // Both expand to the full buffer and remain identical; must
        // terminate rather than loop forever.
        let widened = expand_to_unique(&raw, &spans);
        assert_eq!(widened[0], widened[1]);
    }
}
