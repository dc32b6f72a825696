//! Raw scalar buffers and the whitespace-stripped "flat" projection used by
//! every matching stage.

/// A text buffer addressed by Unicode scalar value, not byte or UTF-16 code
/// unit. `char` already merges surrogate pairs, so a plain `Vec<char>` is
/// sufficient here.
pub fn to_scalars(text: &str) -> Vec<char> {
    text.chars().collect()
}

/// The whitespace-stripped projection of a raw scalar buffer, with index maps
/// back and forth to the raw buffer.
#[derive(Debug, Clone)]
pub struct FlatView {
    pub flat: Vec<char>,
    /// For each raw index, the flat index a character at or immediately
    /// before it projects to. Whitespace positions map to the flat index of
    /// the next non-whitespace scalar (or `|flat|` if none follows).
    pub raw_to_flat: Vec<usize>,
    /// For each flat index, the raw index of the scalar it was built from.
    pub flat_to_raw: Vec<usize>,
}

impl FlatView {
    pub fn build(raw: &[char]) -> Self {
        let mut flat = Vec::with_capacity(raw.len());
        let mut raw_to_flat = vec![0usize; raw.len()];
        let mut flat_to_raw = Vec::with_capacity(raw.len());

        for (i, &c) in raw.iter().enumerate() {
            raw_to_flat[i] = flat.len();
            if !c.is_whitespace() {
                flat_to_raw.push(i);
                flat.push(c);
            }
        }

        Self {
            flat,
            raw_to_flat,
            flat_to_raw,
        }
    }

    /// Raw index that flat index `i` was built from, or `raw_len` if `i` is
    /// the flat buffer's own exclusive end.
    pub fn point_to_raw(&self, flat_index: usize, raw_len: usize) -> usize {
        if flat_index < self.flat_to_raw.len() {
            self.flat_to_raw[flat_index]
        } else {
            raw_len
        }
    }

    /// Raw index immediately after the scalar flat index `flat_end_excl - 1`
    /// was built from (i.e. the raw position a flat *exclusive end* points
    /// at).
    pub fn end_to_raw(&self, flat_end_excl: usize, raw_len: usize) -> usize {
        if flat_end_excl == 0 {
            return 0;
        }
        if flat_end_excl - 1 < self.flat_to_raw.len() {
            self.flat_to_raw[flat_end_excl - 1] + 1
        } else {
            raw_len
        }
    }
}

/// Scan the raw buffer once for the first line ending, preferring `\r\n` over
/// a bare `\n` or `\r`. Defaults to `\n` when the buffer has none.
pub fn detect_line_ending(raw: &[char]) -> &'static str {
    for (i, &c) in raw.iter().enumerate() {
        if c == '\r' {
            return if raw.get(i + 1) == Some(&'\n') {
                "\r\n"
            } else {
                "\r"
            };
        }
        if c == '\n' {
            return "\n";
        }
    }
    "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_view_strips_whitespace_both_ways() {
        let raw = to_scalars("fn  foo(\n  x\n)");
        let view = FlatView::build(&raw);
        let flat_str: String = view.flat.iter().collect();
        assert_eq!(flat_str, "fnfoo(x)");
        for (flat_idx, &raw_idx) in view.flat_to_raw.iter().enumerate() {
            assert_eq!(view.raw_to_flat[raw_idx], flat_idx);
        }
    }

    #[test]
    fn flat_view_of_all_whitespace_is_empty() {
        let raw = to_scalars("   \n\t  ");
        let view = FlatView::build(&raw);
        assert!(view.flat.is_empty());
        assert!(raw.iter().all(|_| true));
        assert_eq!(*view.raw_to_flat.last().unwrap(), 0);
    }

    #[test]
    fn line_ending_prefers_crlf() {
        assert_eq!(detect_line_ending(&to_scalars("a\r\nb\nc")), "\r\n");
        assert_eq!(detect_line_ending(&to_scalars("a\nb\r\nc")), "\n");
        assert_eq!(detect_line_ending(&to_scalars("a\rb")), "\r");
        assert_eq!(detect_line_ending(&to_scalars("no newline here")), "\n");
    }
}
