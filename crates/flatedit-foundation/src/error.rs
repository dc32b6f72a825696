//! Error types shared across the flatedit workspace.

use serde::Serialize;
use thiserror::Error;

use crate::protocol::{Suggestion, ToolResponse};

/// Result type alias used throughout flatedit.
pub type FzResult<T> = Result<T, FzError>;

/// Core error type for flatedit operations.
///
/// Covers parameter-schema violations, path access failures, binary-content
/// refusal, identical-text, no-match, multiple-matches, overlap,
/// directory-missing, target-exists, and a catch-all "unexpected" wrapper.
#[derive(Debug, Error)]
pub enum FzError {
    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("path not found or not accessible: {path}")]
    PathNotFound { path: String },

    #[error("refusing to edit binary file: {path}")]
    BinaryFile { path: String },

    #[error("searchText and replacementText are identical")]
    IdenticalText,

    #[error("no match found for {parameter}")]
    NoMatch {
        parameter: String,
        suggestions: Vec<Suggestion>,
    },

    #[error("multiple matches found for {parameter}")]
    MultipleMatches {
        parameter: String,
        suggestions: Vec<Suggestion>,
    },

    #[error("insertion point lies inside the span being moved")]
    Overlap,

    #[error("parent directory does not exist: {path}")]
    DirectoryMissing { path: String },

    #[error("target already exists: {path}")]
    TargetExists { path: String },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<std::io::Error> for FzError {
    fn from(err: std::io::Error) -> Self {
        FzError::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl FzError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        FzError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn path_not_found(path: impl Into<String>) -> Self {
        FzError::PathNotFound { path: path.into() }
    }

    pub fn binary_file(path: impl Into<String>) -> Self {
        FzError::BinaryFile { path: path.into() }
    }

    pub fn no_match(parameter: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        FzError::NoMatch {
            parameter: parameter.into(),
            suggestions,
        }
    }

    pub fn multiple_matches(parameter: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        FzError::MultipleMatches {
            parameter: parameter.into(),
            suggestions,
        }
    }

    pub fn directory_missing(path: impl Into<String>) -> Self {
        FzError::DirectoryMissing { path: path.into() }
    }

    pub fn target_exists(path: impl Into<String>) -> Self {
        FzError::TargetExists { path: path.into() }
    }

    /// Suggestions carried by this error, if any (populated for NoMatch /
    /// MultipleMatches so the dispatcher can fill `SuggestedParameterValues`
    /// without re-deriving them).
    pub fn suggestions(&self) -> Option<&[Suggestion]> {
        match self {
            FzError::NoMatch { suggestions, .. } => Some(suggestions),
            FzError::MultipleMatches { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}

impl From<&FzError> for ToolResponse {
    fn from(err: &FzError) -> Self {
        let suggestions = err.suggestions().map(|s| s.to_vec());
        ToolResponse::error(err.to_string(), suggestions)
    }
}

impl From<FzError> for ToolResponse {
    fn from(err: FzError) -> Self {
        ToolResponse::from(&err)
    }
}

/// Machine-readable error code, used only for the JSON-RPC transport framing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ErrorCode(pub i32);

impl FzError {
    /// JSON-RPC-ish error code for transports that want one. The core
    /// dispatcher never needs this — it always produces a `ToolResponse` —
    /// but the stdio transport surfaces it on parse failures.
    pub fn code(&self) -> i32 {
        match self {
            FzError::InvalidRequest { .. } => -32602,
            FzError::PathNotFound { .. } => -32001,
            FzError::BinaryFile { .. } => -32002,
            FzError::IdenticalText => -32003,
            FzError::NoMatch { .. } => -32004,
            FzError::MultipleMatches { .. } => -32005,
            FzError::Overlap => -32006,
            FzError::DirectoryMissing { .. } => -32007,
            FzError::TargetExists { .. } => -32008,
            FzError::Io { .. } => -32009,
            FzError::Unexpected(_) => -32603,
        }
    }
}
