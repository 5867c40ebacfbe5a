use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use tracing::debug;
use webide_domain::{FileStatus, repository_path};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChangesetError {
    #[error("Expected REMOTE=LOCAL, got '{0}'")]
    InvalidMapping(String),

    #[error("Repository path must not be empty")]
    EmptyPath,

    #[error("'{0}' is changed more than once")]
    DuplicatePath(String),
}

/// One local change to commit, addressed by its repository path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Create { path: String, local: PathBuf },
    Modify { path: String, local: PathBuf },
    Delete { path: String },
}

impl Change {
    pub fn path(&self) -> &str {
        match self {
            Change::Create { path, .. } | Change::Modify { path, .. } | Change::Delete { path } => {
                path
            }
        }
    }
}

/// Parses `REMOTE=LOCAL`, where REMOTE is the path in the repository and
/// LOCAL the file holding its new content
pub fn parse_mapping(value: &str) -> Result<(String, PathBuf), ChangesetError> {
    let (remote, local) = value
        .split_once('=')
        .ok_or_else(|| ChangesetError::InvalidMapping(value.to_string()))?;
    let remote = parse_path(remote)?;
    if local.is_empty() {
        return Err(ChangesetError::InvalidMapping(value.to_string()));
    }
    Ok((remote, PathBuf::from(local)))
}

/// Normalises a repository path given on the command line
pub fn parse_path(value: &str) -> Result<String, ChangesetError> {
    let path = repository_path(value.trim());
    if path.is_empty() {
        return Err(ChangesetError::EmptyPath);
    }
    Ok(path.to_string())
}

/// Reads the content of every created or modified file. Each repository
/// path may appear once.
pub async fn load_changeset(changes: &[Change]) -> anyhow::Result<Vec<FileStatus>> {
    let mut seen = HashSet::new();
    let mut status = Vec::with_capacity(changes.len());

    for change in changes {
        if !seen.insert(change.path()) {
            return Err(ChangesetError::DuplicatePath(change.path().to_string()).into());
        }

        let file = match change {
            Change::Create { path, local } => FileStatus::created(path, read(local).await?),
            Change::Modify { path, local } => FileStatus::modified(path, read(local).await?),
            Change::Delete { path } => FileStatus::deleted(path),
        };
        debug!(path = %file.path, status = %file.status_type(), "Loaded change");
        status.push(file);
    }

    Ok(status)
}

async fn read(local: &Path) -> anyhow::Result<Bytes> {
    let content = tokio::fs::read(local)
        .await
        .with_context(|| format!("Failed to read {}", local.display()))?;
    Ok(Bytes::from(content))
}
