//! The unified tool-handler trait every operator group implements.

use async_trait::async_trait;
use flatedit_foundation::{ToolCall, ToolResponse};

use crate::context::ToolHandlerContext;

/// A group of related named tools (e.g. the text-editing operators, or the
/// whole-file operators). Never lets an error escape as anything but a
/// [`ToolResponse`] — see [`crate::dispatcher::Dispatcher`].
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn tool_names(&self) -> &[&str];

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> ToolResponse;
}
