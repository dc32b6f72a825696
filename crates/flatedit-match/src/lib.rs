//! Whitespace-insensitive matching over raw Unicode-scalar text: a flat
//! (whitespace-stripped) projection, a Z-array-based exact/prefix/suffix
//! analyzer, a suffix automaton for mid-string occurrences, token-boundary
//! span reconstruction, and ambiguity disambiguation for exact hits.

mod automaton;
mod disambiguate;
mod engine;
mod span;
mod text;
mod zarray;

pub use disambiguate::{expand_to_unique, RawSpan};
pub use engine::{find_last_exact, find_matches, MatchKind, MatchResult, MatchSpan};
pub use span::{count_non_ws, expand_left, expand_right};
pub use text::{detect_line_ending, to_scalars, FlatView};
