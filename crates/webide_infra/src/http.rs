use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use webide_app::GitLabInfra;
use webide_config::IdeConfig;
use webide_domain::{
    ApiError, Branch, Commit, CommitPayload, CommitSequence, CreatedCommit, CurrentUser, DiffEntry,
    MergeRequest, Project, ProjectId, PushRules,
};

const PRIVATE_TOKEN: HeaderName = HeaderName::from_static("private-token");
const NEXT_PAGE: &str = "x-next-page";
const PER_PAGE: &str = "100";

/// GitLab REST v4 client authenticated with a personal access token
pub struct GitLabHttpService {
    client: Client,
    api_base: Url,
    token: Option<String>,
}

impl GitLabHttpService {
    pub fn new(config: &IdeConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.http_connect_timeout_secs))
            .user_agent(concat!("webide/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut api_base = config.gitlab_url.clone();
        if let Ok(mut segments) = api_base.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "v4"]);
        }

        Ok(Self { client, api_base, token: config.token.clone() })
    }

    /// Appends each segment percent-encoded, so project paths, branch names
    /// and file paths containing `/` stay a single segment.
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn project_url(&self, project_id: &ProjectId, segments: &[&str]) -> Url {
        self.url(
            ["projects", project_id.as_str()]
                .into_iter()
                .chain(segments.iter().copied()),
        )
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token
            && let Ok(mut value) = HeaderValue::from_str(token)
        {
            value.set_sensitive(true);
            headers.insert(PRIVATE_TOKEN, value);
        }
        debug!(headers = ?Self::sanitize_headers(&headers), "Request Headers");
        headers
    }

    fn sanitize_headers(headers: &HeaderMap) -> HeaderMap {
        headers
            .iter()
            .map(|(name, value)| {
                let value = if *name == PRIVATE_TOKEN {
                    HeaderValue::from_static("[REDACTED]")
                } else {
                    value.clone()
                };
                (name.clone(), value)
            })
            .collect()
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .headers(self.headers())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        debug!(url = %response.url(), status = %status, "GitLab response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok());
        Err(ApiError::http(status.as_u16(), body))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.send(self.client.get(url))
            .await?
            .json()
            .await
            .map_err(transport)
    }

    /// Follows `x-next-page` until GitLab reports no further page
    async fn get_all<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page = "1".to_string();
        loop {
            let mut page_url = url.clone();
            page_url
                .query_pairs_mut()
                .append_pair("per_page", PER_PAGE)
                .append_pair("page", &page);

            let response = self.send(self.client.get(page_url)).await?;
            let next_page = response
                .headers()
                .get(NEXT_PAGE)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            let batch: Vec<T> = response.json().await.map_err(transport)?;
            items.extend(batch);

            match next_page {
                Some(next) => page = next,
                None => return Ok(items),
            }
        }
    }

    async fn get_push_rules(&self, project_id: &ProjectId) -> Option<PushRules> {
        match self
            .get::<Option<PushRules>>(self.project_url(project_id, &["push_rule"]))
            .await
        {
            Ok(push_rules) => push_rules,
            Err(error) => {
                debug!(project = %project_id, error = %error, "No push rules available");
                None
            }
        }
    }
}

fn transport(error: reqwest::Error) -> ApiError {
    ApiError::Transport(error.into())
}

#[async_trait::async_trait]
impl GitLabInfra for GitLabHttpService {
    async fn create_commit(
        &self,
        project_id: &ProjectId,
        payload: &CommitPayload,
    ) -> Result<CreatedCommit, ApiError> {
        let url = self.project_url(project_id, &["repository", "commits"]);
        self.send(self.client.post(url).json(payload))
            .await?
            .json()
            .await
            .map_err(transport)
    }

    async fn get_commit(&self, project_id: &ProjectId, sha: &str) -> Result<Commit, ApiError> {
        self.get(self.project_url(project_id, &["repository", "commits", sha]))
            .await
    }

    async fn get_commit_diff(
        &self,
        project_id: &ProjectId,
        sha: &str,
    ) -> Result<Vec<DiffEntry>, ApiError> {
        self.get_all(self.project_url(project_id, &["repository", "commits", sha, "diff"]))
            .await
    }

    async fn get_file_raw(
        &self,
        project_id: &ProjectId,
        path: &str,
        git_ref: &str,
    ) -> Result<Bytes, ApiError> {
        let mut url = self.project_url(project_id, &["repository", "files", path, "raw"]);
        url.query_pairs_mut().append_pair("ref", git_ref);
        self.send(self.client.get(url))
            .await?
            .bytes()
            .await
            .map_err(transport)
    }

    async fn get_branch(&self, project_id: &ProjectId, name: &str) -> Result<Branch, ApiError> {
        self.get(self.project_url(project_id, &["repository", "branches", name]))
            .await
    }

    async fn get_commit_sequence(
        &self,
        project_id: &ProjectId,
        sha: &str,
    ) -> Result<CommitSequence, ApiError> {
        self.get(self.project_url(project_id, &["repository", "commits", sha, "sequence"]))
            .await
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<Project, ApiError> {
        let mut project: Project = self.get(self.project_url(project_id, &[])).await?;
        project.push_rules = self.get_push_rules(project_id).await;
        Ok(project)
    }

    async fn get_current_user(&self) -> Result<CurrentUser, ApiError> {
        self.get(self.url(["user"])).await
    }

    async fn find_merge_requests(
        &self,
        project_id: &ProjectId,
        source_branch: &str,
    ) -> Result<Vec<MergeRequest>, ApiError> {
        let mut url = self.project_url(project_id, &["merge_requests"]);
        url.query_pairs_mut()
            .append_pair("source_branch", source_branch)
            .append_pair("state", "opened");
        self.get(url).await
    }
}
