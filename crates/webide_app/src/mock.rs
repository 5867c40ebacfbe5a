use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use serde_json::{Value, json};
use tokio::sync::Barrier;
use url::Url;
use webide_domain::{
    ApiError, Branch, Commit, CommitPayload, CommitSequence, CreatedCommit, CurrentUser, DiffEntry,
    GitLabRef, MergeRequest, Project, ProjectId,
};

use crate::{GitLabInfra, NotificationLevel, PreferenceRepository, UserInfra, WorkbenchInfra};

/// In-memory stand-in for every capability the engine consumes. Records
/// each call so tests can assert on what was (not) requested.
#[derive(Default)]
pub struct MockInfra {
    commits: HashMap<String, Commit>,
    diffs: HashMap<String, Vec<DiffEntry>>,
    files: HashMap<(String, String), Bytes>,
    branches: HashMap<String, Branch>,
    sequences: HashMap<String, u64>,
    merge_requests: Vec<MergeRequest>,
    failing: HashSet<&'static str>,
    raw_fetch_barrier: Option<Arc<Barrier>>,
    commit_failures: Mutex<VecDeque<(u16, Option<Value>)>>,
    prompt_answers: Mutex<VecDeque<Option<String>>>,
    select_answers: Mutex<VecDeque<Option<String>>>,
    flags: Mutex<HashMap<String, bool>>,
    calls: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
    submitted: Mutex<Vec<CommitPayload>>,
    notifications: Mutex<Vec<(NotificationLevel, String)>>,
    workbench: Mutex<Vec<String>>,
}

impl MockInfra {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commit(mut self, commit: Commit) -> Self {
        self.commits.insert(commit.id.clone(), commit);
        self
    }

    pub fn with_diff(mut self, sha: &str, diff: Vec<DiffEntry>) -> Self {
        self.diffs.insert(sha.to_string(), diff);
        self
    }

    pub fn with_file(mut self, path: &str, git_ref: &str, content: &str) -> Self {
        self.files
            .insert((path.to_string(), git_ref.to_string()), Bytes::from(content.to_string()));
        self
    }

    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branches.insert(branch.name.clone(), branch);
        self
    }

    pub fn with_sequence(mut self, sha: &str, count: u64) -> Self {
        self.sequences.insert(sha.to_string(), count);
        self
    }

    pub fn with_merge_request(mut self, merge_request: MergeRequest) -> Self {
        self.merge_requests.push(merge_request);
        self
    }

    /// Holds each `get_file_raw` until `parties` fetches are in flight
    pub fn with_raw_fetch_barrier(mut self, parties: usize) -> Self {
        self.raw_fetch_barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    /// Makes every call to the named `GitLabInfra` method fail with a 500
    pub fn failing(mut self, call: &'static str) -> Self {
        self.failing.insert(call);
        self
    }

    /// Queues a failure for the next `create_commit`
    pub fn with_commit_failure(self, status: u16, message: Option<&str>) -> Self {
        let body = message.map(|message| json!({ "message": message }));
        self.commit_failures.lock().unwrap().push_back((status, body));
        self
    }

    pub fn answer_prompt(self, answer: Option<&str>) -> Self {
        self.prompt_answers.lock().unwrap().push_back(answer.map(str::to_string));
        self
    }

    pub fn answer_select(self, answer: Option<&str>) -> Self {
        self.select_answers.lock().unwrap().push_back(answer.map(str::to_string));
        self
    }

    pub fn with_flag(self, key: &str, value: bool) -> Self {
        self.flags.lock().unwrap().insert(key.to_string(), value);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<CommitPayload> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<(NotificationLevel, String)> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn workbench_calls(&self) -> Vec<String> {
        self.workbench.lock().unwrap().clone()
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.flags.lock().unwrap().get(key).copied()
    }

    fn record(&self, name: &'static str, arg: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(format!("{name}:{arg}"));
        if self.failing.contains(name) {
            return Err(ApiError::http(500, Some(json!({ "message": "mock failure" }))));
        }
        Ok(())
    }

    fn found<T: Clone>(value: Option<&T>) -> Result<T, ApiError> {
        value.cloned().ok_or_else(|| ApiError::http(404, None))
    }
}

#[async_trait::async_trait]
impl GitLabInfra for MockInfra {
    async fn create_commit(
        &self,
        _: &ProjectId,
        payload: &CommitPayload,
    ) -> Result<CreatedCommit, ApiError> {
        self.record("create_commit", &payload.branch)?;
        self.submitted.lock().unwrap().push(payload.clone());
        if let Some((status, body)) = self.commit_failures.lock().unwrap().pop_front() {
            return Err(ApiError::http(status, body));
        }
        Ok(CreatedCommit { id: "created-sha".to_string() })
    }

    async fn get_commit(&self, _: &ProjectId, sha: &str) -> Result<Commit, ApiError> {
        self.record("get_commit", sha)?;
        Self::found(self.commits.get(sha))
    }

    async fn get_commit_diff(&self, _: &ProjectId, sha: &str) -> Result<Vec<DiffEntry>, ApiError> {
        self.record("get_commit_diff", sha)?;
        Self::found(self.diffs.get(sha))
    }

    async fn get_file_raw(
        &self,
        _: &ProjectId,
        path: &str,
        git_ref: &str,
    ) -> Result<Bytes, ApiError> {
        self.record("get_file_raw", path)?;
        if let Some(barrier) = &self.raw_fetch_barrier {
            barrier.wait().await;
        }
        Self::found(self.files.get(&(path.to_string(), git_ref.to_string())))
    }

    async fn get_branch(&self, _: &ProjectId, name: &str) -> Result<Branch, ApiError> {
        self.record("get_branch", name)?;
        Self::found(self.branches.get(name))
    }

    async fn get_commit_sequence(
        &self,
        _: &ProjectId,
        sha: &str,
    ) -> Result<CommitSequence, ApiError> {
        self.record("get_commit_sequence", sha)?;
        Self::found(self.sequences.get(sha)).map(|count| CommitSequence { count })
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<Project, ApiError> {
        self.record("get_project", project_id.as_str())?;
        Ok(fixture_project(false))
    }

    async fn get_current_user(&self) -> Result<CurrentUser, ApiError> {
        self.record("get_current_user", "")?;
        Err(ApiError::http(404, None))
    }

    async fn find_merge_requests(
        &self,
        _: &ProjectId,
        source_branch: &str,
    ) -> Result<Vec<MergeRequest>, ApiError> {
        self.record("find_merge_requests", source_branch)?;
        Ok(self
            .merge_requests
            .iter()
            .filter(|mr| mr.source_branch == source_branch)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl UserInfra for MockInfra {
    async fn prompt_question(
        &self,
        question: &str,
        _placeholder: Option<&str>,
    ) -> anyhow::Result<Option<String>> {
        self.prompts.lock().unwrap().push(question.to_string());
        Ok(self.prompt_answers.lock().unwrap().pop_front().flatten())
    }

    async fn select_one(
        &self,
        message: &str,
        _detail: Option<&str>,
        options: Vec<String>,
    ) -> anyhow::Result<Option<String>> {
        self.prompts.lock().unwrap().push(message.to_string());
        let answer = self.select_answers.lock().unwrap().pop_front().flatten();
        Ok(answer.filter(|answer| options.contains(answer)))
    }

    async fn notify(&self, level: NotificationLevel, message: &str) -> anyhow::Result<()> {
        self.notifications.lock().unwrap().push((level, message.to_string()));
        Ok(())
    }
}

#[async_trait::async_trait]
impl PreferenceRepository for MockInfra {
    async fn get_flag(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.flag(key).unwrap_or(false))
    }

    async fn set_flag(&self, key: &str, value: bool) -> anyhow::Result<()> {
        self.flags.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

#[async_trait::async_trait]
impl WorkbenchInfra for MockInfra {
    async fn reload_workspace(&self, branch: &str) -> anyhow::Result<()> {
        self.workbench.lock().unwrap().push(format!("reload:{branch}"));
        Ok(())
    }

    async fn open_url(&self, url: &Url) -> anyhow::Result<()> {
        self.workbench.lock().unwrap().push(format!("open:{url}"));
        Ok(())
    }

    async fn switch_branch(&self) -> anyhow::Result<()> {
        self.workbench.lock().unwrap().push("switch_branch".to_string());
        Ok(())
    }

    async fn sign_in(&self) -> anyhow::Result<()> {
        self.workbench.lock().unwrap().push("sign_in".to_string());
        Ok(())
    }

    async fn show_logs(&self) -> anyhow::Result<()> {
        self.workbench.lock().unwrap().push("show_logs".to_string());
        Ok(())
    }
}

pub fn fixture_project(empty_repo: bool) -> Project {
    Project {
        id: 42,
        path_with_namespace: "group/project".to_string(),
        web_url: Url::parse("https://gitlab.example.com/group/project").unwrap(),
        default_branch: Some("main".to_string()),
        empty_repo,
        push_rules: None,
    }
}

pub fn fixture_branch(name: &str, sha: &str) -> Branch {
    serde_json::from_value(json!({
        "name": name,
        "commit": { "id": sha },
        "can_push": true,
        "default": false
    }))
    .unwrap()
}

pub fn fixture_branch_ref(branch: Branch) -> GitLabRef {
    let sha = branch.commit.id.clone();
    GitLabRef::Branch { branch, sha }
}
