use std::sync::Arc;

use derive_setters::Setters;
use futures::future::try_join_all;
use indexmap::IndexMap;
use tracing::debug;
use webide_domain::{
    ApiError, Commit, CommitError, CommitPayload, CommitPayloadOptions, DiffEntry, FileStatus,
    FileStatusKind, ProjectId, build_commit_payload, repository_path,
};

use crate::GitLabInfra;

#[derive(Debug, Clone, Setters)]
#[setters(into)]
pub struct AmendPayloadOptions {
    pub project_id: ProjectId,
    /// Tip commit being amended
    pub starting_sha: String,
    pub status: Vec<FileStatus>,
    /// Falls back to the amended commit's message when empty
    pub commit_message: String,
    pub branch_name: String,
    pub is_new_branch: bool,
}

impl AmendPayloadOptions {
    pub fn new(project_id: impl Into<ProjectId>, starting_sha: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            starting_sha: starting_sha.into(),
            status: Vec::new(),
            commit_message: String::new(),
            branch_name: String::new(),
            is_new_branch: false,
        }
    }
}

/// Rebuilds the tip commit relative to its parent with the current changes
/// folded in, so it can be force pushed in place of the original.
pub struct AmendPayloadBuilder<I> {
    infra: Arc<I>,
}

impl<I: GitLabInfra> AmendPayloadBuilder<I> {
    pub fn new(infra: Arc<I>) -> Self {
        Self { infra }
    }

    pub async fn build(&self, options: AmendPayloadOptions) -> Result<CommitPayload, CommitError> {
        let AmendPayloadOptions {
            project_id,
            starting_sha,
            status,
            commit_message,
            branch_name,
            is_new_branch,
        } = options;

        let (original_commit, original_status) = self
            .fetch_original(&project_id, &starting_sha)
            .await
            .map_err(|error| {
                debug!(sha = %starting_sha, error = %error, "Failed to load commit to amend");
                CommitError::AmendCommitInfo
            })?;

        let parent_sha = original_commit
            .parent_ids
            .first()
            .cloned()
            .unwrap_or_else(|| starting_sha.clone());

        let commit_status = merge_status(original_status, status);
        let commit_message = if commit_message.is_empty() {
            original_commit.message
        } else {
            commit_message
        };

        Ok(build_commit_payload(CommitPayloadOptions {
            status: commit_status,
            commit_message,
            branch_name,
            is_new_branch,
            starting_sha: parent_sha,
            force: true,
        }))
    }

    async fn fetch_original(
        &self,
        project_id: &ProjectId,
        sha: &str,
    ) -> Result<(Commit, Vec<FileStatus>), ApiError> {
        let commit = self.infra.get_commit(project_id, sha).await?;
        let diff = self.infra.get_commit_diff(project_id, sha).await?;

        let entries = try_join_all(
            diff.iter()
                .map(|entry| self.diff_entry_status(project_id, sha, entry)),
        )
        .await?;

        Ok((commit, entries.into_iter().flatten().collect()))
    }

    /// What the amended commit did to one path, relative to its parent.
    /// A rename becomes a creation at the new path and a deletion at the old
    /// one.
    async fn diff_entry_status(
        &self,
        project_id: &ProjectId,
        sha: &str,
        entry: &DiffEntry,
    ) -> Result<Vec<FileStatus>, ApiError> {
        if entry.deleted_file {
            return Ok(vec![FileStatus::deleted(&entry.old_path)]);
        }

        let content = self
            .infra
            .get_file_raw(project_id, &entry.new_path, sha)
            .await?;

        if entry.new_file {
            Ok(vec![FileStatus::created(&entry.new_path, content)])
        } else if entry.renamed_file && entry.old_path != entry.new_path {
            Ok(vec![
                FileStatus::created(&entry.new_path, content),
                FileStatus::deleted(&entry.old_path),
            ])
        } else {
            Ok(vec![FileStatus::modified(&entry.new_path, content)])
        }
    }
}

/// Folds the current changes into what the original commit changed, keyed
/// by repository path. Paths keep the order they first appeared in.
fn merge_status(original: Vec<FileStatus>, current: Vec<FileStatus>) -> Vec<FileStatus> {
    let mut files: IndexMap<String, FileStatus> = original
        .into_iter()
        .map(|file| (file.repository_path().to_string(), file))
        .collect();

    for file in current {
        let key = repository_path(&file.path).to_string();
        let original_created = matches!(
            files.get(&key).map(|original| &original.kind),
            Some(FileStatusKind::Created(_))
        );

        match file.kind {
            FileStatusKind::Deleted if original_created => {
                files.shift_remove(&key);
            }
            FileStatusKind::Modified(content) if original_created => {
                files.insert(key, FileStatus::created(file.path, content));
            }
            kind => {
                files.insert(key, FileStatus { path: file.path, kind });
            }
        }
    }

    files.into_values().collect()
}
