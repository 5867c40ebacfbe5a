use derive_setters::Setters;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Commit message constraints configured on a GitLab project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(strip_option, into)]
pub struct PushRules {
    #[serde(default)]
    pub commit_message_regex: Option<String>,
    #[serde(default)]
    pub commit_message_negative_regex: Option<String>,
}

/// Checks a commit message against the project's push rules.
///
/// Returns the violation to show the user, or `None` when the message is
/// acceptable. A missing, empty or invalid pattern disables its check.
pub fn lint_commit_message(value: &str, push_rules: Option<&PushRules>) -> Option<String> {
    let push_rules = push_rules?;
    if value.is_empty() {
        return None;
    }

    let must_match = compile(push_rules.commit_message_regex.as_deref());
    let must_not_match = compile(push_rules.commit_message_negative_regex.as_deref());

    if let Some(pattern) = must_match
        && !pattern.is_match(value)
    {
        return Some(format!(
            "The commit message must match the pattern: {}",
            pattern.as_str()
        ));
    }

    if let Some(pattern) = must_not_match
        && pattern.is_match(value)
    {
        return Some(format!(
            "The commit message must not match the pattern: {}",
            pattern.as_str()
        ));
    }

    None
}

fn compile(pattern: Option<&str>) -> Option<Regex> {
    let pattern = pattern.filter(|pattern| !pattern.is_empty())?;
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(error) => {
            debug!(pattern, error = %error, "Ignoring push rule that does not compile");
            None
        }
    }
}
