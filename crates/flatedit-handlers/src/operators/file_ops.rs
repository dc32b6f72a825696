//! Whole-file operators that don't run the matcher: `create_file`,
//! `overwrite_file_content`, `append_text_to_file`, `move_or_rename_file`,
//! `delete_file`.

use async_trait::async_trait;
use flatedit_foundation::{FzError, ToolCall, ToolResponse};
use flatedit_match::detect_line_ending;

use crate::context::ToolHandlerContext;
use crate::handler::ToolHandler;
use crate::operators::params::{coerce_bool, optional_string_or_default, required_string};

fn args_of(tool_call: &ToolCall) -> serde_json::Value {
    tool_call.arguments.clone().unwrap_or(serde_json::Value::Null)
}

pub struct FileOpsHandler;

#[async_trait]
impl ToolHandler for FileOpsHandler {
    fn tool_names(&self) -> &[&str] {
        &[
            "create_file",
            "overwrite_file_content",
            "append_text_to_file",
            "move_or_rename_file",
            "delete_file",
        ]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> ToolResponse {
        let args = args_of(tool_call);
        let result = match tool_call.name.as_str() {
            "create_file" => create_file(context, &args).await,
            "overwrite_file_content" => overwrite_file_content(context, &args).await,
            "append_text_to_file" => append_text_to_file(context, &args).await,
            "move_or_rename_file" => move_or_rename_file(context, &args).await,
            "delete_file" => delete_file(context, &args).await,
            other => Err(FzError::invalid_request(format!("unknown tool: {other}"))),
        };
        result.unwrap_or_else(ToolResponse::from)
    }
}

async fn create_file(context: &ToolHandlerContext, args: &serde_json::Value) -> Result<ToolResponse, FzError> {
    let file_path = required_string(args, "filePath")?;
    let content = optional_string_or_default(args, "fileContent", "");
    let create_missing_directories = coerce_bool(args, "createMissingDirectories", false);

    let path = context.resolve(&file_path)?;
    context
        .file_access
        .create_file(&path, &content, create_missing_directories)
        .await?;

    Ok(ToolResponse::success(format!("Created {file_path}")))
}

async fn overwrite_file_content(
    context: &ToolHandlerContext,
    args: &serde_json::Value,
) -> Result<ToolResponse, FzError> {
    let file_path = required_string(args, "filePath")?;
    let content = required_string(args, "fileContent")?;

    let path = context.resolve(&file_path)?;
    if !context.file_access.exists(&path).await {
        return Err(FzError::path_not_found(file_path));
    }
    let scalars: Vec<char> = content.chars().collect();
    context.file_access.write_scalars(&path, &scalars).await?;

    Ok(ToolResponse::success(format!("Overwrote {file_path}")))
}

async fn append_text_to_file(
    context: &ToolHandlerContext,
    args: &serde_json::Value,
) -> Result<ToolResponse, FzError> {
    let file_path = required_string(args, "filePath")?;
    let append_text = required_string(args, "appendText")?;
    let add_new_line_before = coerce_bool(args, "addNewLineBeforeAppending", true);

    let path = context.resolve(&file_path)?;
    let mut raw = context.file_access.read_to_scalars(&path).await?;
    let line_ending = detect_line_ending(&raw);

    let ends_with_line_ending = raw.len() >= line_ending.chars().count()
        && raw[raw.len() - line_ending.chars().count()..]
            .iter()
            .collect::<String>()
            == line_ending;

    if add_new_line_before && !raw.is_empty() && !ends_with_line_ending {
        raw.extend(line_ending.chars());
    }
    raw.extend(append_text.chars());

    context.file_access.write_scalars(&path, &raw).await?;

    Ok(ToolResponse::success(format!("Appended text to {file_path}")))
}

async fn move_or_rename_file(
    context: &ToolHandlerContext,
    args: &serde_json::Value,
) -> Result<ToolResponse, FzError> {
    let source = required_string(args, "sourceFilePath")?;
    let target = required_string(args, "targetFilePath")?;
    let create_missing_directories = coerce_bool(args, "createMissingDirectories", false);

    let from = context.resolve(&source)?;
    let to = context.resolve(&target)?;
    context
        .file_access
        .rename(&from, &to, create_missing_directories)
        .await?;

    Ok(ToolResponse::success(format!("Moved {source} to {target}")))
}

async fn delete_file(context: &ToolHandlerContext, args: &serde_json::Value) -> Result<ToolResponse, FzError> {
    let file_path = required_string(args, "filePath")?;
    let path = context.resolve(&file_path)?;
    context.file_access.delete_file(&path).await?;
    Ok(ToolResponse::success(format!("Deleted {file_path}")))
}
