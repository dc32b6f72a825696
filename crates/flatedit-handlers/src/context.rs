//! File-access abstraction and the context handed to every tool handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use flatedit_foundation::FzError;

use crate::binary_guard;

/// Filesystem operations an operator needs, kept narrow on purpose: these
/// operators never list directories, watch files, or run language tooling,
/// unlike the fuller service this is grounded on.
#[async_trait]
pub trait FileAccess: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    async fn read_to_scalars(&self, path: &Path) -> Result<Vec<char>, FzError>;

    async fn write_scalars(&self, path: &Path, content: &[char]) -> Result<(), FzError>;

    async fn create_file(
        &self,
        path: &Path,
        content: &str,
        create_missing_directories: bool,
    ) -> Result<(), FzError>;

    async fn delete_file(&self, path: &Path) -> Result<(), FzError>;

    async fn rename(
        &self,
        from: &Path,
        to: &Path,
        create_missing_directories: bool,
    ) -> Result<(), FzError>;

    fn parent_exists(&self, path: &Path) -> bool;
}

/// `tokio::fs`-backed implementation used by the binary.
pub struct TokioFileAccess;

#[async_trait]
impl FileAccess for TokioFileAccess {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    async fn read_to_scalars(&self, path: &Path) -> Result<Vec<char>, FzError> {
        if !self.exists(path).await {
            return Err(FzError::path_not_found(path.display().to_string()));
        }
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(_) => return Err(FzError::binary_file(path.display().to_string())),
        };
        let probe_len = bytes.len().min(8192);
        if binary_guard::is_binary(path, &bytes[..probe_len]) {
            return Err(FzError::binary_file(path.display().to_string()));
        }
        let text = String::from_utf8(bytes)
            .map_err(|_| FzError::binary_file(path.display().to_string()))?;
        Ok(text.chars().collect())
    }

    async fn write_scalars(&self, path: &Path, content: &[char]) -> Result<(), FzError> {
        let text: String = content.iter().collect();
        tokio::fs::write(path, text).await?;
        Ok(())
    }

    async fn create_file(
        &self,
        path: &Path,
        content: &str,
        create_missing_directories: bool,
    ) -> Result<(), FzError> {
        if self.exists(path).await {
            return Err(FzError::target_exists(path.display().to_string()));
        }
        if !self.parent_exists(path) {
            if create_missing_directories {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            } else {
                return Err(FzError::directory_missing(path.display().to_string()));
            }
        }
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<(), FzError> {
        if !self.exists(path).await {
            return Err(FzError::path_not_found(path.display().to_string()));
        }
        tokio::fs::remove_file(path).await?;
        Ok(())
    }

    async fn rename(
        &self,
        from: &Path,
        to: &Path,
        create_missing_directories: bool,
    ) -> Result<(), FzError> {
        if !self.exists(from).await {
            return Err(FzError::path_not_found(from.display().to_string()));
        }
        if self.exists(to).await {
            return Err(FzError::target_exists(to.display().to_string()));
        }
        if !self.parent_exists(to) {
            if create_missing_directories {
                if let Some(parent) = to.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            } else {
                return Err(FzError::directory_missing(to.display().to_string()));
            }
        }
        tokio::fs::rename(from, to).await?;
        Ok(())
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn round_trips_scalars_through_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        let access = TokioFileAccess;
        let content: Vec<char> = "hëllo\nwörld".chars().collect();
        access.write_scalars(&path, &content).await.unwrap();
        let read_back = access.read_to_scalars(&path).await.unwrap();
        assert_eq!(read_back, content);
    }

    #[tokio::test]
    async fn refuses_to_read_files_with_blocked_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        tokio::fs::write(&path, b"not actually a png").await.unwrap();
        let access = TokioFileAccess;
        let err = access.read_to_scalars(&path).await.unwrap_err();
        assert!(matches!(err, FzError::BinaryFile { .. }));
    }

    #[tokio::test]
    async fn create_file_rejects_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        let access = TokioFileAccess;
        access.create_file(&path, "one", false).await.unwrap();
        let err = access.create_file(&path, "two", false).await.unwrap_err();
        assert!(matches!(err, FzError::TargetExists { .. }));
    }

    #[tokio::test]
    async fn create_file_refuses_missing_parent_without_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/sub/f.txt");
        let access = TokioFileAccess;
        let err = access.create_file(&path, "x", false).await.unwrap_err();
        assert!(matches!(err, FzError::DirectoryMissing { .. }));
        access.create_file(&path, "x", true).await.unwrap();
        assert!(access.exists(&path).await);
    }

    #[tokio::test]
    async fn rename_moves_file_and_rejects_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("b.txt");
        let access = TokioFileAccess;
        access.write_scalars(&from, &['x']).await.unwrap();
        access.rename(&from, &to, false).await.unwrap();
        assert!(!access.exists(&from).await);
        assert!(access.exists(&to).await);

        let err = access.rename(&from, &to, false).await.unwrap_err();
        assert!(matches!(err, FzError::PathNotFound { .. }));
    }

    #[tokio::test]
    async fn delete_file_removes_existing_and_rejects_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        let access = TokioFileAccess;
        access.write_scalars(&path, &['x']).await.unwrap();
        access.delete_file(&path).await.unwrap();
        assert!(!access.exists(&path).await);
        let err = access.delete_file(&path).await.unwrap_err();
        assert!(matches!(err, FzError::PathNotFound { .. }));
    }
}

/// Context shared by every tool handler for the duration of one request.
pub struct ToolHandlerContext {
    pub file_access: Arc<dyn FileAccess>,
    pub project_root: PathBuf,
}

impl ToolHandlerContext {
    pub fn new(file_access: Arc<dyn FileAccess>, project_root: PathBuf) -> Self {
        Self {
            file_access,
            project_root,
        }
    }

    /// Resolve a caller-supplied path against the project root. Path
    /// validation beyond this is treated as an external collaborator's job;
    /// the check here is the minimal containment guard ambient to any file
    /// service, not part of the matcher's own design.
    pub fn resolve(&self, raw_path: &str) -> Result<PathBuf, FzError> {
        let candidate = Path::new(raw_path);
        let joined = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.project_root.join(candidate)
        };
        Ok(joined)
    }
}
