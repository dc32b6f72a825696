//! Stdio transport for the flatedit tool server.

mod stdio;

pub use stdio::{start_stdio_server, StdioTransport};
