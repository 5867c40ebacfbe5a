use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use strum_macros::Display as StrumDisplay;
use url::Url;

use crate::PushRules;

/// Numeric id or full path (`group/project`) of a GitLab project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl ToString) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub path_with_namespace: String,
    pub web_url: Url,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub empty_repo: bool,
    /// Loaded from the push-rule endpoint, not part of the project response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_rules: Option<PushRules>,
}

impl Project {
    pub fn project_id(&self) -> ProjectId {
        ProjectId::new(self.id)
    }

    /// Web page that opens a merge request from `source_branch`
    pub fn new_merge_request_url(&self, source_branch: &str) -> Url {
        let mut url = self.web_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["-", "merge_requests", "new"]);
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("merge_request[source_branch]", source_branch);
        url
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCommit {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub commit: BranchCommit,
    #[serde(default)]
    pub can_push: bool,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub parent_ids: Vec<String>,
    pub message: String,
}

/// Entry of `GET /projects/:id/repository/commits/:sha/diff`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub old_path: String,
    pub new_path: String,
    #[serde(default)]
    pub new_file: bool,
    #[serde(default)]
    pub deleted_file: bool,
    #[serde(default)]
    pub renamed_file: bool,
}

/// Number of commits reachable from a sha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSequence {
    pub count: u64,
}

/// Response of the create-commit endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCommit {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub iid: u64,
    pub web_url: Url,
    pub source_branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum RefType {
    Branch,
    Tag,
    Commit,
}

/// Ref the workspace was opened at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitLabRef {
    Branch { branch: Branch, sha: String },
    Tag { name: String, sha: String },
    Commit { sha: String },
}

impl GitLabRef {
    pub fn ref_type(&self) -> RefType {
        match self {
            GitLabRef::Branch { .. } => RefType::Branch,
            GitLabRef::Tag { .. } => RefType::Tag,
            GitLabRef::Commit { .. } => RefType::Commit,
        }
    }

    pub fn sha(&self) -> &str {
        match self {
            GitLabRef::Branch { sha, .. }
            | GitLabRef::Tag { sha, .. }
            | GitLabRef::Commit { sha } => sha,
        }
    }

    /// Branch or tag name, or the sha for a detached commit
    pub fn name(&self) -> &str {
        match self {
            GitLabRef::Branch { branch, .. } => &branch.name,
            GitLabRef::Tag { name, .. } => name,
            GitLabRef::Commit { sha } => sha,
        }
    }

    pub fn branch(&self) -> Option<&Branch> {
        match self {
            GitLabRef::Branch { branch, .. } => Some(branch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn fixture_project() -> Project {
        serde_json::from_value(json!({
            "id": 42,
            "path_with_namespace": "group/project",
            "web_url": "https://gitlab.example.com/group/project",
            "default_branch": "main"
        }))
        .unwrap()
    }

    #[test]
    fn test_project_defaults_missing_fields() {
        let actual = fixture_project();

        assert_eq!(actual.empty_repo, false);
        assert_eq!(actual.push_rules, None);
        assert_eq!(actual.project_id(), ProjectId::from("42"));
    }

    #[test]
    fn test_new_merge_request_url() {
        let actual = fixture_project().new_merge_request_url("root-main-patch-1a2b");

        assert_eq!(
            actual.as_str(),
            "https://gitlab.example.com/group/project/-/merge_requests/new?merge_request%5Bsource_branch%5D=root-main-patch-1a2b"
        );
    }

    #[test]
    fn test_ref_accessors() {
        let branch: Branch = serde_json::from_value(json!({
            "name": "feature",
            "commit": {"id": "abc"},
            "can_push": true
        }))
        .unwrap();
        let fixture = GitLabRef::Branch { branch, sha: "abc".to_string() };

        assert_eq!(fixture.ref_type(), RefType::Branch);
        assert_eq!(fixture.name(), "feature");
        assert_eq!(fixture.sha(), "abc");
        assert_eq!(fixture.branch().map(|b| b.default), Some(false));

        let tag = GitLabRef::Tag { name: "v1.0".to_string(), sha: "def".to_string() };
        assert_eq!(tag.ref_type().to_string(), "tag");
        assert_eq!(tag.branch(), None);
    }
}
