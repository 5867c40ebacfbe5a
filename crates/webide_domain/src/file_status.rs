use bytes::Bytes;
use strum_macros::Display;

/// Discriminant of a [`FileStatus`], without the content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FileStatusType {
    Created,
    Modified,
    Deleted,
}

/// How a path differs from the commit the workspace was opened at.
///
/// Content travels with the variant so a deleted file can never carry bytes
/// and a created or modified file always does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatusKind {
    Created(Bytes),
    Modified(Bytes),
    Deleted,
}

/// A single uncommitted change in the virtual file system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub path: String,
    pub kind: FileStatusKind,
}

impl FileStatus {
    pub fn created(path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self { path: path.into(), kind: FileStatusKind::Created(content.into()) }
    }

    pub fn modified(path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self { path: path.into(), kind: FileStatusKind::Modified(content.into()) }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self { path: path.into(), kind: FileStatusKind::Deleted }
    }

    pub fn status_type(&self) -> FileStatusType {
        match self.kind {
            FileStatusKind::Created(_) => FileStatusType::Created,
            FileStatusKind::Modified(_) => FileStatusType::Modified,
            FileStatusKind::Deleted => FileStatusType::Deleted,
        }
    }

    pub fn content(&self) -> Option<&Bytes> {
        match &self.kind {
            FileStatusKind::Created(content) | FileStatusKind::Modified(content) => Some(content),
            FileStatusKind::Deleted => None,
        }
    }

    /// Path without leading separators, the form GitLab uses for repository
    /// paths.
    pub fn repository_path(&self) -> &str {
        repository_path(&self.path)
    }
}

/// Strips any leading `/` so workspace paths and repository paths compare
/// equal.
pub fn repository_path(path: &str) -> &str {
    path.trim_start_matches('/')
}
