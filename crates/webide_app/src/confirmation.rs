use std::sync::Arc;

use derive_setters::Setters;
use tracing::debug;

use crate::UserInfra;

pub const PERMANENTLY_OVERWRITE: &str = "Permanently Overwrite";

#[derive(Debug, Clone, Copy, Default, Setters)]
pub struct ConfirmationOptions {
    pub force: bool,
    pub amend: bool,
    /// Commits on the remote branch that the push would discard
    pub existing_commits: u64,
}

/// Asks before a commit rewrites remote history
pub struct ForcePushConfirmationGate<I> {
    infra: Arc<I>,
}

impl<I: UserInfra> ForcePushConfirmationGate<I> {
    pub fn new(infra: Arc<I>) -> Self {
        Self { infra }
    }

    /// Resolves `true` when the commit may proceed. Nothing is asked when no
    /// history would be lost.
    pub async fn confirm(&self, options: ConfirmationOptions) -> anyhow::Result<bool> {
        let Some(message) = confirmation_message(options) else {
            return Ok(true);
        };

        let choice = self
            .infra
            .select_one(
                &message,
                Some("This action cannot be undone."),
                vec![PERMANENTLY_OVERWRITE.to_string()],
            )
            .await?;

        let confirmed = choice.as_deref() == Some(PERMANENTLY_OVERWRITE);
        debug!(confirmed, "Force push confirmation answered");
        Ok(confirmed)
    }
}

fn confirmation_message(options: ConfirmationOptions) -> Option<String> {
    let ConfirmationOptions { force, amend, existing_commits } = options;
    let commits = match existing_commits {
        1 => "1 commit".to_string(),
        count => format!("{count} commits"),
    };

    if force && existing_commits > 0 {
        Some(format!(
            "You are about to permanently delete {commits} in the remote branch. Are you sure?"
        ))
    } else if amend && existing_commits > 0 {
        Some(format!(
            "You are about to permanently delete {commits} and overwrite the latest commit in the remote branch. Are you sure?"
        ))
    } else if amend {
        Some(
            "You are about to permanently overwrite the latest commit in the remote branch. Are you sure?"
                .to_string(),
        )
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::MockInfra;

    #[test]
    fn test_message_for_force_with_commits() {
        let actual = confirmation_message(
            ConfirmationOptions::default().force(true).existing_commits(3u64),
        );
        let expected = Some(
            "You are about to permanently delete 3 commits in the remote branch. Are you sure?"
                .to_string(),
        );

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_message_for_amend_with_commits() {
        let actual = confirmation_message(
            ConfirmationOptions::default().amend(true).existing_commits(1u64),
        );
        let expected = Some(
            "You are about to permanently delete 1 commit and overwrite the latest commit in the remote branch. Are you sure?"
                .to_string(),
        );

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_message_for_amend_without_commits() {
        let actual = confirmation_message(ConfirmationOptions::default().amend(true));
        let expected = Some(
            "You are about to permanently overwrite the latest commit in the remote branch. Are you sure?"
                .to_string(),
        );

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_force_takes_precedence_over_amend() {
        let actual = confirmation_message(
            ConfirmationOptions::default().force(true).amend(true).existing_commits(2u64),
        );

        let expected = Some(
            "You are about to permanently delete 2 commits in the remote branch. Are you sure?"
                .to_string(),
        );

        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_plain_commit_needs_no_prompt() {
        let infra = Arc::new(MockInfra::new());
        let gate = ForcePushConfirmationGate::new(infra.clone());

        let actual = gate.confirm(ConfirmationOptions::default()).await.unwrap();

        assert_eq!(actual, true);
        assert_eq!(infra.prompts(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_force_without_divergence_auto_approves() {
        let infra = Arc::new(MockInfra::new());
        let gate = ForcePushConfirmationGate::new(infra.clone());

        let actual = gate.confirm(ConfirmationOptions::default().force(true)).await.unwrap();

        assert_eq!(actual, true);
        assert_eq!(infra.prompts(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_confirmed_with_destructive_action() {
        let infra = Arc::new(MockInfra::new().answer_select(Some(PERMANENTLY_OVERWRITE)));
        let gate = ForcePushConfirmationGate::new(infra.clone());

        let actual = gate.confirm(ConfirmationOptions::default().amend(true)).await.unwrap();

        assert_eq!(actual, true);
        assert_eq!(infra.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_dismissed_prompt_declines() {
        let infra = Arc::new(MockInfra::new().answer_select(None));
        let gate = ForcePushConfirmationGate::new(infra);

        let actual = gate
            .confirm(ConfirmationOptions::default().force(true).existing_commits(4u64))
            .await
            .unwrap();

        assert_eq!(actual, false);
    }
}
