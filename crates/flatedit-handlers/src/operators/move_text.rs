//! `move_text`: relocates a span of text relative to an anchor, switching
//! between line-granular and intra-line splicing depending on whether both
//! the moved text and the anchor sit on whole-line boundaries.

use async_trait::async_trait;
use flatedit_foundation::{FzError, ToolCall, ToolResponse};
use flatedit_match::detect_line_ending;

use crate::context::ToolHandlerContext;
use crate::handler::ToolHandler;
use crate::operators::locate::{locate_single, locate_single_in_range};
use crate::operators::params::required_string;
use crate::operators::text_ops::resolve_block_range;

pub struct MoveTextHandler;

#[async_trait]
impl ToolHandler for MoveTextHandler {
    fn tool_names(&self) -> &[&str] {
        &["move_text"]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> ToolResponse {
        let args = tool_call.arguments.clone().unwrap_or(serde_json::Value::Null);
        move_text(context, &args).await.unwrap_or_else(ToolResponse::from)
    }
}

/// Walk left from `start` over whitespace that isn't a newline scalar; stop
/// at index 0 or just past a `\n`/`\r`. `None` if a non-whitespace scalar is
/// met first.
fn find_line_boundary_left(raw: &[char], start: usize) -> Option<usize> {
    let mut i = start;
    loop {
        if i == 0 {
            return Some(0);
        }
        let c = raw[i - 1];
        if c == '\n' || c == '\r' {
            return Some(i);
        }
        if !c.is_whitespace() {
            return None;
        }
        i -= 1;
    }
}

/// Symmetric right-hand variant of [`find_line_boundary_left`].
fn find_line_boundary_right(raw: &[char], end: usize) -> Option<usize> {
    let n = raw.len();
    let mut i = end;
    loop {
        if i == n {
            return Some(n);
        }
        let c = raw[i];
        if c == '\n' || c == '\r' {
            return Some(i);
        }
        if !c.is_whitespace() {
            return None;
        }
        i += 1;
    }
}

async fn move_text(context: &ToolHandlerContext, args: &serde_json::Value) -> Result<ToolResponse, FzError> {
    let file_path = required_string(args, "filePath")?;
    let text_to_move = required_string(args, "textToBeMoved")?;
    let anchor_text = required_string(args, "anchorText")?;
    let position = required_string(args, "positionRelativeToAnchorText")?;
    if position != "before" && position != "after" {
        return Err(FzError::invalid_request(
            "positionRelativeToAnchorText must be \"before\" or \"after\"",
        ));
    }
    let start_marker = args.get("anchorBlockStartMarker").and_then(|v| v.as_str());
    let end_marker = args.get("anchorBlockEndMarker").and_then(|v| v.as_str());

    let path = context.resolve(&file_path)?;
    let mut raw = context.file_access.read_to_scalars(&path).await?;

    let move_span = locate_single(&raw, &text_to_move, "textToBeMoved")?;
    let range = resolve_block_range(&raw, start_marker, end_marker).await?;
    let anchor = locate_single_in_range(&raw, range, &anchor_text, "anchorText")?;

    let move_left = find_line_boundary_left(&raw, move_span.raw_start);
    let move_right = find_line_boundary_right(&raw, move_span.raw_end_excl);
    let move_at_line_boundary = move_left.is_some() && move_right.is_some();

    let anchor_at_line_boundary = if position == "before" {
        find_line_boundary_left(&raw, anchor.raw_start).is_some()
    } else {
        find_line_boundary_right(&raw, anchor.raw_end_excl).is_some()
    };

    let is_line_boundary_move = move_at_line_boundary && anchor_at_line_boundary;
    let line_ending = detect_line_ending(&raw);

    let (deletion_start, deletion_end, insertion_point, moved_text) = if is_line_boundary_move {
        let deletion_start = move_left.unwrap();
        let boundary_right = move_right.unwrap();
        let mut deletion_end = boundary_right;
        while deletion_end < raw.len() && (raw[deletion_end] == '\n' || raw[deletion_end] == '\r') {
            deletion_end += 1;
        }

        let insertion_point = if position == "before" {
            find_line_boundary_left(&raw, anchor.raw_start).unwrap()
        } else {
            find_line_boundary_right(&raw, anchor.raw_end_excl).unwrap()
        };

        let core: String = raw[deletion_start..boundary_right].iter().collect();
        let moved_text = if position == "before" {
            format!("{core}{line_ending}")
        } else {
            format!("{line_ending}{core}")
        };

        (deletion_start, deletion_end, insertion_point, moved_text)
    } else {
        let insertion_point = if position == "before" {
            anchor.raw_start
        } else {
            anchor.raw_end_excl
        };
        let moved_text: String = raw[move_span.raw_start..move_span.raw_end_excl].iter().collect();
        (move_span.raw_start, move_span.raw_end_excl, insertion_point, moved_text)
    };

    if insertion_point > deletion_start && insertion_point < deletion_end {
        return Err(FzError::Overlap);
    }

    let deletion_len = deletion_end - deletion_start;
    raw.splice(deletion_start..deletion_end, std::iter::empty());
    let adjusted_insertion_point = if insertion_point > deletion_start {
        insertion_point - deletion_len
    } else {
        insertion_point
    };
    raw.splice(adjusted_insertion_point..adjusted_insertion_point, moved_text.chars());

    context.file_access.write_scalars(&path, &raw).await?;

    Ok(ToolResponse::success(format!(
        "Moved text {} anchor in {}",
        position, file_path
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileAccess;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    struct InMemoryFs(Mutex<HashMap<PathBuf, String>>);

    impl InMemoryFs {
        fn new(path: &str, content: &str) -> Arc<Self> {
            let mut map = HashMap::new();
            map.insert(PathBuf::from(path), content.to_string());
            Arc::new(Self(Mutex::new(map)))
        }
    }

    #[async_trait]
    impl FileAccess for InMemoryFs {
        async fn exists(&self, path: &Path) -> bool {
            self.0.lock().unwrap().contains_key(path)
        }
        async fn read_to_scalars(&self, path: &Path) -> Result<Vec<char>, FzError> {
            self.0
                .lock()
                .unwrap()
                .get(path)
                .map(|s| s.chars().collect())
                .ok_or_else(|| FzError::path_not_found(path.display().to_string()))
        }
        async fn write_scalars(&self, path: &Path, content: &[char]) -> Result<(), FzError> {
            self.0
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.iter().collect());
            Ok(())
        }
        async fn create_file(&self, _: &Path, _: &str, _: bool) -> Result<(), FzError> {
            unimplemented!()
        }
        async fn delete_file(&self, _: &Path) -> Result<(), FzError> {
            unimplemented!()
        }
        async fn rename(&self, _: &Path, _: &Path, _: bool) -> Result<(), FzError> {
            unimplemented!()
        }
        fn parent_exists(&self, _: &Path) -> bool {
            true
        }
    }

    fn ctx(fs: Arc<InMemoryFs>) -> ToolHandlerContext {
        ToolHandlerContext::new(fs, PathBuf::from("/"))
    }

    #[tokio::test]
    async fn line_boundary_move_before() {
        let fs = InMemoryFs::new(
            "/f.js",
            "function alpha() {\n  const a = 1;\n  const b = 2;\n  const c = 3;\n}",
        );
        let context = ctx(fs.clone());
        let args = json!({
            "filePath": "/f.js",
            "textToBeMoved": "const b = 2;",
            "anchorText": "const a = 1;",
            "positionRelativeToAnchorText": "before",
        });
        move_text(&context, &args).await.unwrap();
        let content = fs.0.lock().unwrap().get(Path::new("/f.js")).cloned().unwrap();
        assert_eq!(
            content,
            "function alpha() {\n  const b = 2;\n  const a = 1;\n  const c = 3;\n}"
        );
    }

    #[tokio::test]
    async fn intra_line_move_after() {
        let fs = InMemoryFs::new(
            "/f.js",
            "function alpha() {\n  const a = 1;\n  const b = 2;\n  const c = 3; return c;\n}",
        );
        let context = ctx(fs.clone());
        let args = json!({
            "filePath": "/f.js",
            "textToBeMoved": "const b = 2;",
            "anchorText": "const c = 3;",
            "positionRelativeToAnchorText": "after",
        });
        move_text(&context, &args).await.unwrap();
        let content = fs.0.lock().unwrap().get(Path::new("/f.js")).cloned().unwrap();
        assert_eq!(
            content,
            "function alpha() {\n  const a = 1;\n  \n  const c = 3;const b = 2; return c;\n}"
        );
    }
}
