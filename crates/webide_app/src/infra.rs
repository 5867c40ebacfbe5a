use bytes::Bytes;
use strum_macros::Display;
use url::Url;
use webide_domain::{
    ApiError, Branch, Commit, CommitPayload, CommitSequence, CreatedCommit, CurrentUser, DiffEntry,
    MergeRequest, Project, ProjectId,
};

/// Typed access to the GitLab REST API
#[async_trait::async_trait]
pub trait GitLabInfra: Send + Sync + 'static {
    /// `POST /projects/:id/repository/commits`
    async fn create_commit(
        &self,
        project_id: &ProjectId,
        payload: &CommitPayload,
    ) -> Result<CreatedCommit, ApiError>;

    /// `GET /projects/:id/repository/commits/:sha`
    async fn get_commit(&self, project_id: &ProjectId, sha: &str) -> Result<Commit, ApiError>;

    /// `GET /projects/:id/repository/commits/:sha/diff`
    async fn get_commit_diff(
        &self,
        project_id: &ProjectId,
        sha: &str,
    ) -> Result<Vec<DiffEntry>, ApiError>;

    /// `GET /projects/:id/repository/files/:path/raw?ref=:git_ref`
    async fn get_file_raw(
        &self,
        project_id: &ProjectId,
        path: &str,
        git_ref: &str,
    ) -> Result<Bytes, ApiError>;

    /// `GET /projects/:id/repository/branches/:name`
    async fn get_branch(&self, project_id: &ProjectId, name: &str) -> Result<Branch, ApiError>;

    /// `GET /projects/:id/repository/commits/:sha/sequence`
    async fn get_commit_sequence(
        &self,
        project_id: &ProjectId,
        sha: &str,
    ) -> Result<CommitSequence, ApiError>;

    /// Project metadata including its push rules
    async fn get_project(&self, project_id: &ProjectId) -> Result<Project, ApiError>;

    /// `GET /user`
    async fn get_current_user(&self) -> Result<CurrentUser, ApiError>;

    /// Open merge requests whose source is `source_branch`
    async fn find_merge_requests(
        &self,
        project_id: &ProjectId,
        source_branch: &str,
    ) -> Result<Vec<MergeRequest>, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Interaction with the person committing. Every method resolves to `None`
/// when the prompt is dismissed.
#[async_trait::async_trait]
pub trait UserInfra: Send + Sync + 'static {
    /// Free-text input. `placeholder` is shown as a hint and is not returned
    /// when the input is left empty.
    async fn prompt_question(
        &self,
        question: &str,
        placeholder: Option<&str>,
    ) -> anyhow::Result<Option<String>>;

    /// Modal choice between `options`
    async fn select_one(
        &self,
        message: &str,
        detail: Option<&str>,
        options: Vec<String>,
    ) -> anyhow::Result<Option<String>>;

    async fn notify(&self, level: NotificationLevel, message: &str) -> anyhow::Result<()>;
}

/// Durable per-user flags
#[async_trait::async_trait]
pub trait PreferenceRepository: Send + Sync + 'static {
    async fn get_flag(&self, key: &str) -> anyhow::Result<bool>;
    async fn set_flag(&self, key: &str, value: bool) -> anyhow::Result<()>;
}

/// Host editor commands the engine can trigger
#[async_trait::async_trait]
pub trait WorkbenchInfra: Send + Sync + 'static {
    /// Reloads the workspace from `branch` after a commit
    async fn reload_workspace(&self, branch: &str) -> anyhow::Result<()>;
    async fn open_url(&self, url: &Url) -> anyhow::Result<()>;
    async fn switch_branch(&self) -> anyhow::Result<()>;
    async fn sign_in(&self) -> anyhow::Result<()>;
    async fn show_logs(&self) -> anyhow::Result<()>;
}
