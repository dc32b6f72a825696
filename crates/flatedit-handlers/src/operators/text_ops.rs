//! `replace_matching_text`, `delete_matching_text`, and `insert_text`: the
//! match-driven operators that splice text into a single file.

use async_trait::async_trait;
use flatedit_foundation::{FzError, ToolCall, ToolResponse};
use flatedit_match::{detect_line_ending, find_last_exact, find_matches, MatchResult};

use crate::context::ToolHandlerContext;
use crate::handler::ToolHandler;
use crate::operators::locate::{locate_for_edit, locate_single_in_range};
use crate::operators::params::{coerce_bool, required_string};
use crate::operators::splice::splice_all;

fn args_of(tool_call: &ToolCall) -> serde_json::Value {
    tool_call.arguments.clone().unwrap_or(serde_json::Value::Null)
}

/// `replace_matching_text` / `delete_matching_text`.
pub struct ReplaceDeleteHandler;

#[async_trait]
impl ToolHandler for ReplaceDeleteHandler {
    fn tool_names(&self) -> &[&str] {
        &["replace_matching_text", "delete_matching_text"]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> ToolResponse {
        let result = match tool_call.name.as_str() {
            "replace_matching_text" => replace(context, &args_of(tool_call)).await,
            "delete_matching_text" => delete(context, &args_of(tool_call)).await,
            other => Err(FzError::invalid_request(format!("unknown tool: {other}"))),
        };
        result.unwrap_or_else(ToolResponse::from)
    }
}

async fn replace(context: &ToolHandlerContext, args: &serde_json::Value) -> Result<ToolResponse, FzError> {
    let file_path = required_string(args, "filePath")?;
    let search_text = required_string(args, "searchText")?;
    let replacement_text = required_string(args, "replacementText")?;
    let all = coerce_bool(args, "replaceAllOccurrencesOfSearchText", false);

    if search_text == replacement_text {
        return Err(FzError::IdenticalText);
    }

    let path = context.resolve(&file_path)?;
    let mut raw = context.file_access.read_to_scalars(&path).await?;
    let spans = locate_for_edit(&raw, &search_text, all, "searchText")?;
    splice_all(&mut raw, &spans, &replacement_text);
    context.file_access.write_scalars(&path, &raw).await?;

    Ok(ToolResponse::success(format!(
        "Replaced {} occurrence(s) in {}",
        spans.len(),
        file_path
    )))
}

async fn delete(context: &ToolHandlerContext, args: &serde_json::Value) -> Result<ToolResponse, FzError> {
    let file_path = required_string(args, "filePath")?;
    let search_text = required_string(args, "searchText")?;
    let all = coerce_bool(args, "deleteAllOccurrencesOfSearchText", false);

    let path = context.resolve(&file_path)?;
    let mut raw = context.file_access.read_to_scalars(&path).await?;
    let spans = locate_for_edit(&raw, &search_text, all, "searchText")?;
    splice_all(&mut raw, &spans, "");
    context.file_access.write_scalars(&path, &raw).await?;

    Ok(ToolResponse::success(format!(
        "Deleted {} occurrence(s) in {}",
        spans.len(),
        file_path
    )))
}

/// `insert_text`.
pub struct InsertTextHandler;

#[async_trait]
impl ToolHandler for InsertTextHandler {
    fn tool_names(&self) -> &[&str] {
        &["insert_text"]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> ToolResponse {
        insert(context, &args_of(tool_call))
            .await
            .unwrap_or_else(ToolResponse::from)
    }
}

/// Resolve the `[start, end)` raw range that a block-scoped anchor search
/// must be found within. Absent markers default to the whole buffer.
pub(crate) async fn resolve_block_range(
    raw: &[char],
    start_marker: Option<&str>,
    end_marker: Option<&str>,
) -> Result<std::ops::Range<usize>, FzError> {
    let start = match start_marker {
        None => 0,
        Some(marker) => match find_matches(raw, marker) {
            MatchResult::Exact(spans) => spans
                .into_iter()
                .next()
                .map(|s| s.raw_end_excl)
                .ok_or_else(|| FzError::no_match("anchorBlockStartMarker", Vec::new()))?,
            MatchResult::Fuzzy(_) => {
                return Err(FzError::no_match("anchorBlockStartMarker", Vec::new()))
            }
        },
    };
    let end = match end_marker {
        None => raw.len(),
        // The end marker can recur past `find_matches`'s 3-match exact-phase
        // cap, so its true last occurrence needs an uncapped scan rather
        // than the last of an up-to-3-element list.
        Some(marker) => find_last_exact(&raw[start..], marker)
            .map(|s| s.raw_start + start)
            .ok_or_else(|| FzError::no_match("anchorBlockEndMarker", Vec::new()))?,
    };
    Ok(start..end.max(start))
}

async fn insert(context: &ToolHandlerContext, args: &serde_json::Value) -> Result<ToolResponse, FzError> {
    let file_path = required_string(args, "filePath")?;
    let text_to_insert = required_string(args, "textToBeInserted")?;
    let anchor_text = required_string(args, "anchorText")?;
    let position = required_string(args, "positionRelativeToAnchorText")?;
    if position != "before" && position != "after" {
        return Err(FzError::invalid_request(
            "positionRelativeToAnchorText must be \"before\" or \"after\"",
        ));
    }
    let start_marker = args.get("anchorBlockStartMarker").and_then(|v| v.as_str());
    let end_marker = args.get("anchorBlockEndMarker").and_then(|v| v.as_str());
    let add_new_line = coerce_bool(args, "addNewLine", false);

    let path = context.resolve(&file_path)?;
    let mut raw = context.file_access.read_to_scalars(&path).await?;

    let range = resolve_block_range(&raw, start_marker, end_marker).await?;
    let anchor = locate_single_in_range(&raw, range, &anchor_text, "anchorText")?;

    let line_ending = detect_line_ending(&raw);
    let (insert_at, text) = if position == "before" {
        let text = if add_new_line {
            format!("{text_to_insert}{line_ending}")
        } else {
            text_to_insert.clone()
        };
        (anchor.raw_start, text)
    } else {
        let text = if add_new_line {
            format!("{line_ending}{text_to_insert}")
        } else {
            text_to_insert.clone()
        };
        (anchor.raw_end_excl, text)
    };

    raw.splice(insert_at..insert_at, text.chars());
    context.file_access.write_scalars(&path, &raw).await?;

    Ok(ToolResponse::success(format!(
        "Inserted text {} anchor in {}",
        position, file_path
    )))
}
