use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use strum_macros::Display;

/// Failure of a GitLab REST call.
///
/// HTTP failures keep their status and the decoded JSON body so callers can
/// match on them without re-parsing error strings.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("GitLab responded with status {status}")]
    Http { status: u16, body: Option<Value> },

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl ApiError {
    pub fn http(status: u16, body: Option<Value>) -> Self {
        Self::Http { status, body }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The `message` (or `error`) field of the response body as text.
    /// GitLab sometimes returns an object or array there, which is
    /// rendered as JSON.
    pub fn message(&self) -> Option<String> {
        let ApiError::Http { body: Some(body), .. } = self else {
            return None;
        };
        let message = body.get("message").or_else(|| body.get("error"))?;
        match message {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// What the user can do about a failed commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RecoveryAction {
    #[strum(serialize = "Close")]
    Close,
    #[strum(serialize = "Switch branch")]
    SwitchBranch,
    #[strum(serialize = "Show logs")]
    ShowLogs,
    #[strum(serialize = "Re-enter branch name")]
    ReenterBranchName,
    #[strum(serialize = "Sign in")]
    SignIn,
    #[strum(serialize = "Create new branch")]
    CreateNewBranch,
}

/// Why a commit attempt failed, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitError {
    #[error("Failed to commit changes. The commit was denied by a push rule: {message}")]
    PushRuleViolation { message: String },

    #[error("Failed to commit changes. The branch already exists: {message}")]
    BranchAlreadyExists { message: String },

    #[error(
        "Failed to commit changes. Some files have changed on the remote since you opened them. Reload the workspace and try again."
    )]
    ConcurrentModification,

    #[error("Failed to commit changes. Secret push protection found secrets in your changes.")]
    SecretDetected { message: String },

    #[error("Failed to commit changes. The branch name is invalid: {message}")]
    InvalidBranchName { message: String },

    #[error(
        "Failed to commit changes. {}",
        .message.as_deref().unwrap_or("The request was rejected by GitLab.")
    )]
    GenericBadRequest { message: Option<String> },

    #[error("Your session has expired. Sign in again to commit your changes.")]
    SessionExpired,

    #[error(
        "You don't have permission to push to this branch. Create a new branch to commit your changes."
    )]
    Forbidden,

    #[error("Failed to commit changes. An unexpected error occurred: {detail}")]
    ServerOrUnknown { detail: String },

    #[error("Unable to get commit information. Please try again.")]
    AmendCommitInfo,
}

lazy_static! {
    static ref PUSH_RULE_PATTERN: Regex = Regex::new(r"(?i)denied by custom hooks").unwrap();
    static ref BRANCH_EXISTS_PATTERN: Regex =
        Regex::new(r"(?i)branch\b.*\balready exists").unwrap();
    static ref FILE_CHANGED_PATTERN: Regex =
        Regex::new(r"(?i)file has changed|has changed since you started editing").unwrap();
    static ref SECRET_DETECTED_PATTERN: Regex =
        Regex::new(r"(?i)\bpush blocked: secrets detected\b").unwrap();
    static ref INVALID_BRANCH_NAME_PATTERN: Regex =
        Regex::new(r"(?i)branch name is invalid|invalid branch name").unwrap();
}

impl CommitError {
    /// Classifies a failed create-commit request
    pub fn from_api_error(error: &ApiError) -> Self {
        match error {
            ApiError::Http { status: 400, .. } => Self::from_bad_request(error.message()),
            ApiError::Http { status: 401, .. } => Self::SessionExpired,
            ApiError::Http { status: 403, .. } => Self::Forbidden,
            ApiError::Http { status, .. } => Self::ServerOrUnknown {
                detail: error.message().unwrap_or_else(|| format!("status {status}")),
            },
            ApiError::Transport(source) => Self::ServerOrUnknown { detail: source.to_string() },
        }
    }

    fn from_bad_request(message: Option<String>) -> Self {
        let Some(message) = message else {
            return Self::GenericBadRequest { message: None };
        };

        if PUSH_RULE_PATTERN.is_match(&message) {
            Self::PushRuleViolation { message }
        } else if BRANCH_EXISTS_PATTERN.is_match(&message) {
            Self::BranchAlreadyExists { message }
        } else if FILE_CHANGED_PATTERN.is_match(&message) {
            Self::ConcurrentModification
        } else if SECRET_DETECTED_PATTERN.is_match(&message) {
            Self::SecretDetected { message }
        } else if INVALID_BRANCH_NAME_PATTERN.is_match(&message) {
            Self::InvalidBranchName { message }
        } else {
            Self::GenericBadRequest { message: Some(message) }
        }
    }

    pub fn recovery(&self) -> RecoveryAction {
        match self {
            CommitError::BranchAlreadyExists { .. } => RecoveryAction::SwitchBranch,
            CommitError::SecretDetected { .. } => RecoveryAction::ShowLogs,
            CommitError::InvalidBranchName { .. } => RecoveryAction::ReenterBranchName,
            CommitError::SessionExpired => RecoveryAction::SignIn,
            CommitError::Forbidden => RecoveryAction::CreateNewBranch,
            CommitError::PushRuleViolation { .. }
            | CommitError::ConcurrentModification
            | CommitError::GenericBadRequest { .. }
            | CommitError::ServerOrUnknown { .. }
            | CommitError::AmendCommitInfo => RecoveryAction::Close,
        }
    }
}
