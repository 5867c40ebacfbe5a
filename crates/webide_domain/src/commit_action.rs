use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_setters::Setters;
use serde::Serialize;

/// Encoding of the `content` field of a commit action. GitLab also accepts
/// `text`, but file content is opaque bytes here so it is always base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentEncoding {
    Base64,
}

/// File content as it travels on the wire: `{"content": ..., "encoding": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedContent {
    pub content: String,
    pub encoding: ContentEncoding,
}

impl EncodedContent {
    pub fn base64(bytes: impl AsRef<[u8]>) -> Self {
        Self { content: STANDARD.encode(bytes), encoding: ContentEncoding::Base64 }
    }
}

/// One entry of the `actions` array accepted by the GitLab create-commit
/// endpoint. Each variant carries exactly the fields GitLab allows for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum CommitAction {
    Create {
        file_path: String,
        #[serde(flatten)]
        content: EncodedContent,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_commit_id: Option<String>,
    },
    Update {
        file_path: String,
        #[serde(flatten)]
        content: EncodedContent,
        #[serde(skip_serializing_if = "Option::is_none")]
        last_commit_id: Option<String>,
    },
    Delete {
        file_path: String,
    },
}

impl CommitAction {
    pub fn file_path(&self) -> &str {
        match self {
            CommitAction::Create { file_path, .. }
            | CommitAction::Update { file_path, .. }
            | CommitAction::Delete { file_path } => file_path,
        }
    }

    pub fn last_commit_id(&self) -> Option<&str> {
        match self {
            CommitAction::Create { last_commit_id, .. }
            | CommitAction::Update { last_commit_id, .. } => last_commit_id.as_deref(),
            CommitAction::Delete { .. } => None,
        }
    }
}

/// Body of `POST /projects/:id/repository/commits`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Setters)]
#[setters(strip_option, into)]
pub struct CommitPayload {
    pub commit_message: String,
    pub branch: String,
    pub actions: Vec<CommitAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}
