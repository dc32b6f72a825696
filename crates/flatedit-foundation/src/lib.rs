//! Foundation layer for flatedit: error types and protocol envelopes shared
//! by the matcher, handlers, and transport crates.

pub mod error;
pub mod mcp;
pub mod protocol;

pub use error::{FzError, FzResult};
pub use mcp::{McpError, McpRequest, McpResponse};
pub use protocol::{suggestion, Suggestion, ToolCall, ToolResponse};
