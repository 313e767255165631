//! Native file operations.
//!
//! `mkdir`, `touch`, `cp` and `mv` are carried out here instead of being
//! handed to a shell. Every operation reports a plain success flag; the
//! underlying error is logged.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::error::{ExecError, Result};

/// File-operation collaborator used by the engine for native verbs.
#[async_trait]
pub trait FileOperations: Send + Sync {
    async fn create_directory(&self, path: &Path) -> bool;
    async fn create_file(&self, path: &Path) -> bool;
    async fn copy_path(&self, from: &Path, to: &Path) -> bool;
    async fn move_path(&self, from: &Path, to: &Path) -> bool;
}

/// [`FileOperations`] backed by the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalFileOps {
    root: Option<PathBuf>,
}

impl LocalFileOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `root` instead of the process directory.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    async fn try_create_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ExecError::io("create directory", parent, e))?;
        }

        // Append mode leaves existing content alone.
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| ExecError::io("create file", path, e))?;
        Ok(())
    }

    async fn try_copy(&self, from: &Path, to: &Path) -> Result<()> {
        let metadata = tokio::fs::metadata(from)
            .await
            .map_err(|_| ExecError::MissingSource(from.to_path_buf()))?;
        let target = transfer_target(from, to).await?;

        if metadata.is_dir() {
            let (from, target) = (from.to_path_buf(), target.clone());
            tokio::task::spawn_blocking(move || copy_tree(&from, &target))
                .await
                .map_err(|e| ExecError::TaskJoin(e.to_string()))??;
        } else {
            tokio::fs::copy(from, &target)
                .await
                .map_err(|e| ExecError::io("copy to", &target, e))?;
        }
        Ok(())
    }

    async fn try_move(&self, from: &Path, to: &Path) -> Result<()> {
        let metadata = tokio::fs::metadata(from)
            .await
            .map_err(|_| ExecError::MissingSource(from.to_path_buf()))?;
        let target = transfer_target(from, to).await?;

        if let Err(err) = tokio::fs::rename(from, &target).await {
            // Renames fail across filesystems; copy then remove instead.
            tracing::debug!(error = %err, "rename failed, falling back to copy");
            self.try_copy(from, &target).await?;
            let removed = if metadata.is_dir() {
                tokio::fs::remove_dir_all(from).await
            } else {
                tokio::fs::remove_file(from).await
            };
            removed.map_err(|e| ExecError::io("remove", from, e))?;
        }
        Ok(())
    }
}

#[async_trait]
impl FileOperations for LocalFileOps {
    async fn create_directory(&self, path: &Path) -> bool {
        let path = self.resolve(path);
        report(
            "create_directory",
            tokio::fs::create_dir_all(&path)
                .await
                .map_err(|e| ExecError::io("create directory", &path, e)),
        )
    }

    async fn create_file(&self, path: &Path) -> bool {
        let path = self.resolve(path);
        report("create_file", self.try_create_file(&path).await)
    }

    async fn copy_path(&self, from: &Path, to: &Path) -> bool {
        let (from, to) = (self.resolve(from), self.resolve(to));
        report("copy_path", self.try_copy(&from, &to).await)
    }

    async fn move_path(&self, from: &Path, to: &Path) -> bool {
        let (from, to) = (self.resolve(from), self.resolve(to));
        report("move_path", self.try_move(&from, &to).await)
    }
}

fn report(operation: &'static str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(operation, error = %err, "file operation failed");
            false
        }
    }
}

/// Where a copy or move lands: inside `to` when it is a directory (or is
/// spelled like one), otherwise `to` itself.
async fn transfer_target(from: &Path, to: &Path) -> Result<PathBuf> {
    let spelled_as_dir = to.as_os_str().to_string_lossy().ends_with(['/', '\\']);
    let is_dir = tokio::fs::metadata(to)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    if !(spelled_as_dir || is_dir) {
        return Ok(to.to_path_buf());
    }

    if spelled_as_dir && !is_dir {
        tokio::fs::create_dir_all(to)
            .await
            .map_err(|e| ExecError::io("create directory", to, e))?;
    }

    let name = from
        .file_name()
        .ok_or_else(|| ExecError::MissingFileName(from.to_path_buf()))?;
    Ok(to.join(name))
}

fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| from.to_path_buf());
            ExecError::io("walk", path, e.into())
        })?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(|e| ExecError::io("create directory", &target, e))?;
        } else {
            std::fs::copy(entry.path(), &target)
                .map_err(|e| ExecError::io("copy to", &target, e))?;
        }
    }
    Ok(())
}
