//! Tool handlers and edit operators: binary-file guard, the nine edit
//! operators, and the dispatcher that routes named tool calls to them.

pub mod binary_guard;
mod context;
mod dispatcher;
mod handler;
mod operators;

pub use context::{FileAccess, ToolHandlerContext, TokioFileAccess};
pub use dispatcher::Dispatcher;
pub use handler::ToolHandler;
