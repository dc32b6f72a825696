//! Stdio transport: newline-delimited framing plus the request/response
//! loop that bridges framed JSON to the dispatcher.

use std::sync::Arc;

use flatedit_foundation::{McpError, McpRequest, McpResponse, ToolCall};
use flatedit_handlers::{Dispatcher, ToolHandlerContext};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Frame delimiter used to separate JSON messages. A multi-character
/// delimiter avoids confusion with newlines embedded in error messages.
const FRAME_DELIMITER: &[u8] = b"\n---FRAME---\n";

/// Stdio transport with message framing for reliable JSON parsing.
pub struct StdioTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R: tokio::io::AsyncRead + Unpin, W: tokio::io::AsyncWrite + Unpin> StdioTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Read a single framed message. Returns `None` at EOF.
    pub async fn read_message(&mut self) -> Result<Option<String>, std::io::Error> {
        let mut buffer = Vec::new();

        loop {
            let bytes_read = self.reader.read_until(b'\n', &mut buffer).await?;

            if bytes_read == 0 {
                if buffer.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(String::from_utf8_lossy(&buffer).to_string()));
            }

            if buffer.ends_with(FRAME_DELIMITER) {
                buffer.truncate(buffer.len() - FRAME_DELIMITER.len());
                let message = String::from_utf8_lossy(&buffer).trim().to_string();
                return Ok(Some(message));
            }
        }
    }

    pub async fn write_message(&mut self, message: &str) -> Result<(), std::io::Error> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(FRAME_DELIMITER).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Run the stdio server loop until EOF, dispatching every framed request
/// through `dispatcher` and writing back a framed response.
pub async fn start_stdio_server(
    dispatcher: Arc<Dispatcher>,
    context: Arc<ToolHandlerContext>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let mut transport = StdioTransport::new(stdin, stdout);

    tracing::info!("flatedit server running on stdio");

    loop {
        let message = match transport.read_message().await {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                tracing::info!("EOF reached, shutting down stdio server");
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "error reading from stdin");
                break;
            }
        };

        if message.trim().is_empty() {
            continue;
        }

        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("stdio_request", request_id = %request_id);
        let _enter = span.enter();

        let request: McpRequest = match serde_json::from_str(&message) {
            Ok(req) => req,
            Err(e) => {
                tracing::error!(error = %e, "failed to parse request");
                let response = McpResponse::failure(
                    None,
                    McpError::parse_error(format!("Parse error: {e}")),
                );
                let response_json = serde_json::to_string(&response)?;
                transport.write_message(&response_json).await?;
                continue;
            }
        };

        let response = handle_request(&dispatcher, &context, request).await;
        let response_json = serde_json::to_string(&response)?;
        transport.write_message(&response_json).await?;
    }

    tracing::info!("stdio server stopped");
    Ok(())
}

async fn handle_request(
    dispatcher: &Dispatcher,
    context: &ToolHandlerContext,
    request: McpRequest,
) -> McpResponse {
    let id = request.id.clone();

    let tool_call: ToolCall = match request.params {
        Some(params) => match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return McpResponse::failure(
                    id,
                    McpError::parse_error(format!("invalid tool call params: {e}")),
                );
            }
        },
        None => {
            return McpResponse::failure(
                id,
                McpError::parse_error("missing params on tool call request"),
            );
        }
    };

    let tool_response = dispatcher.dispatch(context, &tool_call).await;
    let result = match serde_json::to_value(&tool_response) {
        Ok(value) => value,
        Err(e) => {
            return McpResponse::failure(
                id,
                McpError::parse_error(format!("failed to serialize tool response: {e}")),
            );
        }
    };

    McpResponse::success(id, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn reads_one_message_per_frame() {
        let input = b"{\"a\":1}\n---FRAME---\n{\"b\":2}\n---FRAME---\n".to_vec();
        let mut transport = StdioTransport::new(Cursor::new(input), Vec::new());

        let first = transport.read_message().await.unwrap().unwrap();
        assert_eq!(first, "{\"a\":1}");
        let second = transport.read_message().await.unwrap().unwrap();
        assert_eq!(second, "{\"b\":2}");
        let third = transport.read_message().await.unwrap();
        assert!(third.is_none());
    }

    #[tokio::test]
    async fn write_message_appends_delimiter() {
        let mut out = Vec::new();
        let mut transport = StdioTransport::new(Cursor::new(Vec::new()), &mut out);
        transport.write_message("hello").await.unwrap();
        assert_eq!(out, b"hello\n---FRAME---\n");
    }

    #[tokio::test]
    async fn malformed_params_become_parse_error_response() {
        use flatedit_handlers::{Dispatcher, TokioFileAccess, ToolHandlerContext};
        let dispatcher = Dispatcher::new();
        let context = ToolHandlerContext::new(
            std::sync::Arc::new(TokioFileAccess),
            std::path::PathBuf::from("/"),
        );
        let request = McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(serde_json::json!(1)),
            method: "tools/call".to_string(),
            params: Some(serde_json::json!(["not", "an", "object"])),
        };
        let response = handle_request(&dispatcher, &context, request).await;
        assert!(response.error.is_some());
    }
}
