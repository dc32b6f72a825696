//! Maps a named tool call to its handler, validates nothing escapes as a
//! raw error, and wraps each call in a tracing span carrying the tool name
//! and a generated request id.

use flatedit_foundation::{FzError, ToolCall, ToolResponse};

use crate::context::ToolHandlerContext;
use crate::handler::ToolHandler;
use crate::operators::{FileOpsHandler, InsertTextHandler, MoveTextHandler, ReplaceDeleteHandler};

pub struct Dispatcher {
    handlers: Vec<Box<dyn ToolHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            handlers: vec![
                Box::new(ReplaceDeleteHandler),
                Box::new(InsertTextHandler),
                Box::new(MoveTextHandler),
                Box::new(FileOpsHandler),
            ],
        }
    }

    pub async fn dispatch(&self, context: &ToolHandlerContext, tool_call: &ToolCall) -> ToolResponse {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("tool_call", tool = %tool_call.name, request_id = %request_id);
        let _enter = span.enter();

        match self.handlers.iter().find(|h| h.tool_names().contains(&tool_call.name.as_str())) {
            Some(handler) => {
                tracing::debug!("dispatching tool call");
                handler.handle_tool_call(context, tool_call).await
            }
            None => {
                tracing::warn!("no handler registered for tool");
                ToolResponse::from(FzError::invalid_request(format!(
                    "unknown tool: {}",
                    tool_call.name
                )))
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileAccess;
    use async_trait::async_trait;
    use serde_json::json;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    struct NoopFs;

    #[async_trait]
    impl FileAccess for NoopFs {
        async fn exists(&self, _: &Path) -> bool {
            false
        }
        async fn read_to_scalars(&self, path: &Path) -> Result<Vec<char>, FzError> {
            Err(FzError::path_not_found(path.display().to_string()))
        }
        async fn write_scalars(&self, _: &Path, _: &[char]) -> Result<(), FzError> {
            Ok(())
        }
        async fn create_file(&self, _: &Path, _: &str, _: bool) -> Result<(), FzError> {
            Ok(())
        }
        async fn delete_file(&self, _: &Path) -> Result<(), FzError> {
            Ok(())
        }
        async fn rename(&self, _: &Path, _: &Path, _: bool) -> Result<(), FzError> {
            Ok(())
        }
        fn parent_exists(&self, _: &Path) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn unknown_tool_becomes_error_response_not_a_panic() {
        let dispatcher = Dispatcher::new();
        let context = ToolHandlerContext::new(Arc::new(NoopFs), PathBuf::from("/"));
        let call = ToolCall {
            name: "does_not_exist".to_string(),
            arguments: Some(json!({})),
        };
        let response = dispatcher.dispatch(&context, &call).await;
        assert!(response.is_error);
    }

    #[tokio::test]
    async fn missing_file_becomes_structured_error() {
        let dispatcher = Dispatcher::new();
        let context = ToolHandlerContext::new(Arc::new(NoopFs), PathBuf::from("/"));
        let call = ToolCall {
            name: "replace_matching_text".to_string(),
            arguments: Some(json!({
                "filePath": "/missing.txt",
                "searchText": "a",
                "replacementText": "b",
            })),
        };
        let response = dispatcher.dispatch(&context, &call).await;
        assert!(response.is_error);
    }
}
