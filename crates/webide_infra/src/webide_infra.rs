use std::sync::Arc;

use bytes::Bytes;
use url::Url;
use webide_app::{
    GitLabInfra, NotificationLevel, PreferenceRepository, UserInfra, WorkbenchInfra,
};
use webide_config::IdeConfig;
use webide_domain::{
    ApiError, Branch, Commit, CommitPayload, CommitSequence, CreatedCommit, CurrentUser, DiffEntry,
    MergeRequest, Project, ProjectId,
};

use crate::http::GitLabHttpService;
use crate::inquire::WebIdeInquire;
use crate::preferences::JsonPreferenceStore;
use crate::workbench::TerminalWorkbench;

/// Every capability the commit engine needs, backed by GitLab over HTTP and
/// the terminal
#[derive(Clone)]
pub struct WebIdeInfra {
    gitlab_service: Arc<GitLabHttpService>,
    inquire_service: Arc<WebIdeInquire>,
    preference_store: Arc<JsonPreferenceStore>,
    workbench_service: Arc<TerminalWorkbench>,
}

impl WebIdeInfra {
    pub fn new(config: &IdeConfig) -> anyhow::Result<Self> {
        Ok(Self {
            gitlab_service: Arc::new(GitLabHttpService::new(config)?),
            inquire_service: Arc::new(WebIdeInquire::new()),
            preference_store: Arc::new(JsonPreferenceStore::new(config.preferences_file()?)),
            workbench_service: Arc::new(TerminalWorkbench::new()),
        })
    }
}

#[async_trait::async_trait]
impl GitLabInfra for WebIdeInfra {
    async fn create_commit(
        &self,
        project_id: &ProjectId,
        payload: &CommitPayload,
    ) -> Result<CreatedCommit, ApiError> {
        self.gitlab_service.create_commit(project_id, payload).await
    }

    async fn get_commit(&self, project_id: &ProjectId, sha: &str) -> Result<Commit, ApiError> {
        self.gitlab_service.get_commit(project_id, sha).await
    }

    async fn get_commit_diff(
        &self,
        project_id: &ProjectId,
        sha: &str,
    ) -> Result<Vec<DiffEntry>, ApiError> {
        self.gitlab_service.get_commit_diff(project_id, sha).await
    }

    async fn get_file_raw(
        &self,
        project_id: &ProjectId,
        path: &str,
        git_ref: &str,
    ) -> Result<Bytes, ApiError> {
        self.gitlab_service.get_file_raw(project_id, path, git_ref).await
    }

    async fn get_branch(&self, project_id: &ProjectId, name: &str) -> Result<Branch, ApiError> {
        self.gitlab_service.get_branch(project_id, name).await
    }

    async fn get_commit_sequence(
        &self,
        project_id: &ProjectId,
        sha: &str,
    ) -> Result<CommitSequence, ApiError> {
        self.gitlab_service.get_commit_sequence(project_id, sha).await
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<Project, ApiError> {
        self.gitlab_service.get_project(project_id).await
    }

    async fn get_current_user(&self) -> Result<CurrentUser, ApiError> {
        self.gitlab_service.get_current_user().await
    }

    async fn find_merge_requests(
        &self,
        project_id: &ProjectId,
        source_branch: &str,
    ) -> Result<Vec<MergeRequest>, ApiError> {
        self.gitlab_service
            .find_merge_requests(project_id, source_branch)
            .await
    }
}

#[async_trait::async_trait]
impl UserInfra for WebIdeInfra {
    async fn prompt_question(
        &self,
        question: &str,
        placeholder: Option<&str>,
    ) -> anyhow::Result<Option<String>> {
        self.inquire_service.prompt_question(question, placeholder).await
    }

    async fn select_one(
        &self,
        message: &str,
        detail: Option<&str>,
        options: Vec<String>,
    ) -> anyhow::Result<Option<String>> {
        self.inquire_service.select_one(message, detail, options).await
    }

    async fn notify(&self, level: NotificationLevel, message: &str) -> anyhow::Result<()> {
        self.inquire_service.notify(level, message).await
    }
}

#[async_trait::async_trait]
impl PreferenceRepository for WebIdeInfra {
    async fn get_flag(&self, key: &str) -> anyhow::Result<bool> {
        self.preference_store.get_flag(key).await
    }

    async fn set_flag(&self, key: &str, value: bool) -> anyhow::Result<()> {
        self.preference_store.set_flag(key, value).await
    }
}

#[async_trait::async_trait]
impl WorkbenchInfra for WebIdeInfra {
    async fn reload_workspace(&self, branch: &str) -> anyhow::Result<()> {
        self.workbench_service.reload_workspace(branch).await
    }

    async fn open_url(&self, url: &Url) -> anyhow::Result<()> {
        self.workbench_service.open_url(url).await
    }

    async fn switch_branch(&self) -> anyhow::Result<()> {
        self.workbench_service.switch_branch().await
    }

    async fn sign_in(&self) -> anyhow::Result<()> {
        self.workbench_service.sign_in().await
    }

    async fn show_logs(&self) -> anyhow::Result<()> {
        self.workbench_service.show_logs().await
    }
}
