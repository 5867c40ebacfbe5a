use std::sync::Arc;

use derive_setters::Setters;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use webide_domain::{
    BranchSelection, CommitError, CommitPayload, CommitPayloadOptions, FileStatus, GitLabRef,
    Project, ProjectId, RecoveryAction, build_commit_payload, generate_commit_message,
    lint_commit_message,
};

use crate::{
    AmendPayloadBuilder, AmendPayloadOptions, BranchSelectionOptions, BranchSelectionPolicy,
    ConfirmationOptions, ForcePushConfirmationGate, GitLabInfra, NotificationLevel,
    PreferenceRepository, RemoteDivergenceProbe, UserInfra, WorkbenchInfra, notify_success,
};

pub const NO_CHANGES_MESSAGE: &str = "No changes found";

/// Everything the host workspace knows about the commit being made
#[derive(Debug, Clone)]
pub struct CommitContext {
    pub project: Project,
    /// Ref the workspace was opened at
    pub git_ref: GitLabRef,
    pub status: Vec<FileStatus>,
    /// Message typed by the user, empty when none was given
    pub commit_message: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Setters)]
pub struct CommitOptions {
    pub force: bool,
    pub amend: bool,
    pub should_prompt_branch_name: bool,
}

#[derive(Debug)]
pub enum CommitOutcome {
    NoChanges,
    Cancelled,
    Committed {
        commit_id: String,
        branch_name: String,
        /// Resolves once the success notification has been handled
        follow_up: JoinHandle<()>,
    },
    Failed(CommitError),
}

enum Attempt {
    Done(CommitOutcome),
    PromptForBranch,
}

/// Drives one commit from change detection to submission
pub struct CommitOrchestrator<I> {
    infra: Arc<I>,
    divergence: RemoteDivergenceProbe<I>,
    confirmation: ForcePushConfirmationGate<I>,
    branch_selection: BranchSelectionPolicy<I>,
    amend: AmendPayloadBuilder<I>,
}

impl<I> CommitOrchestrator<I>
where
    I: GitLabInfra + UserInfra + PreferenceRepository + WorkbenchInfra,
{
    pub fn new(infra: Arc<I>) -> Self {
        Self {
            divergence: RemoteDivergenceProbe::new(infra.clone()),
            confirmation: ForcePushConfirmationGate::new(infra.clone()),
            branch_selection: BranchSelectionPolicy::new(infra.clone()),
            amend: AmendPayloadBuilder::new(infra.clone()),
            infra,
        }
    }

    /// Runs the commit flow. Errors are only returned when talking to the
    /// user fails; GitLab rejections surface as [`CommitOutcome::Failed`].
    pub async fn execute(
        &self,
        context: &CommitContext,
        options: CommitOptions,
    ) -> anyhow::Result<CommitOutcome> {
        let mut options = options;
        loop {
            match self.attempt(context, options).await? {
                Attempt::Done(outcome) => return Ok(outcome),
                Attempt::PromptForBranch => {
                    debug!("Retrying commit on a new branch");
                    options.should_prompt_branch_name = true;
                }
            }
        }
    }

    async fn attempt(
        &self,
        context: &CommitContext,
        options: CommitOptions,
    ) -> anyhow::Result<Attempt> {
        let CommitOptions { force, amend, should_prompt_branch_name } = options;

        let has_changes =
            !context.status.is_empty() || (amend && !context.commit_message.is_empty());
        if !has_changes {
            self.infra
                .notify(NotificationLevel::Info, NO_CHANGES_MESSAGE)
                .await?;
            return Ok(Attempt::Done(CommitOutcome::NoChanges));
        }

        let project_id = context.project.project_id();
        let existing_commits = if force || amend {
            self.existing_commits(&project_id, &context.git_ref).await
        } else {
            0
        };

        let confirmed = self
            .confirmation
            .confirm(ConfirmationOptions { force, amend, existing_commits })
            .await?;
        if !confirmed {
            return Ok(Attempt::Done(CommitOutcome::Cancelled));
        }

        let selection = self
            .branch_selection
            .select(BranchSelectionOptions {
                project: &context.project,
                git_ref: &context.git_ref,
                username: context.username.as_deref(),
                should_prompt_branch_name,
            })
            .await?;
        let Some(selection) = selection else {
            return Ok(Attempt::Done(CommitOutcome::Cancelled));
        };

        let Some(commit_message) = self.resolve_commit_message(context, amend).await? else {
            return Ok(Attempt::Done(CommitOutcome::Cancelled));
        };

        let payload = if amend {
            let options = AmendPayloadOptions::new(project_id.clone(), context.git_ref.sha())
                .status(context.status.clone())
                .commit_message(commit_message)
                .branch_name(selection.branch_name.clone())
                .is_new_branch(selection.is_new_branch);
            match self.amend.build(options).await {
                Ok(payload) => payload,
                Err(error) => return self.present_failure(error).await,
            }
        } else {
            build_commit_payload(CommitPayloadOptions {
                status: context.status.clone(),
                commit_message,
                branch_name: selection.branch_name.clone(),
                is_new_branch: selection.is_new_branch,
                starting_sha: context.git_ref.sha().to_string(),
                force,
            })
        };

        self.submit(context, &project_id, &payload, selection).await
    }

    async fn existing_commits(&self, project_id: &ProjectId, git_ref: &GitLabRef) -> u64 {
        match self.divergence.compute(project_id, git_ref).await {
            Ok(count) => count,
            Err(error) => {
                warn!(
                    error = %error,
                    "Could not compare with the remote branch, assuming 1 commit"
                );
                1
            }
        }
    }

    /// Explicit message or a generated one, re-prompting until it satisfies
    /// the project's push rules. An empty amend message is kept so the
    /// amended commit's message is reused.
    async fn resolve_commit_message(
        &self,
        context: &CommitContext,
        amend: bool,
    ) -> anyhow::Result<Option<String>> {
        let mut message = if context.commit_message.is_empty() && !amend {
            generate_commit_message(&context.status)
        } else {
            context.commit_message.clone()
        };
        if message.is_empty() {
            return Ok(Some(message));
        }

        let push_rules = context.project.push_rules.as_ref();
        while let Some(violation) = lint_commit_message(&message, push_rules) {
            warn!(violation = %violation, "Commit message rejected by push rules");
            let question = format!("{violation}. Enter a new commit message");
            let answer = self
                .infra
                .prompt_question(&question, Some(&message))
                .await?;
            match answer {
                Some(answer) if !answer.trim().is_empty() => message = answer,
                Some(_) => {}
                None => return Ok(None),
            }
        }

        Ok(Some(message))
    }

    async fn submit(
        &self,
        context: &CommitContext,
        project_id: &ProjectId,
        payload: &CommitPayload,
        selection: BranchSelection,
    ) -> anyhow::Result<Attempt> {
        info!(
            project = %project_id,
            branch = %payload.branch,
            actions = payload.actions.len(),
            force = payload.force.unwrap_or(false),
            "Submitting commit"
        );

        let created = match self.infra.create_commit(project_id, payload).await {
            Ok(created) => created,
            Err(api_error) => {
                let commit_error = CommitError::from_api_error(&api_error);
                error!(
                    status = ?api_error.status(),
                    error = %api_error,
                    kind = %commit_error,
                    "Commit rejected"
                );
                return self.present_failure(commit_error).await;
            }
        };

        info!(sha = %created.id, branch = %selection.branch_name, "Commit created");

        let branch_name = selection.branch_name.clone();
        let follow_up = {
            let infra = self.infra.clone();
            let project = context.project.clone();
            tokio::spawn(async move {
                if let Err(error) = notify_success(infra, project, selection).await {
                    warn!(error = %error, "Success notification failed");
                }
            })
        };

        if let Err(error) = self.infra.reload_workspace(&branch_name).await {
            warn!(branch = %branch_name, error = %error, "Failed to reload workspace");
        }

        Ok(Attempt::Done(CommitOutcome::Committed {
            commit_id: created.id,
            branch_name,
            follow_up,
        }))
    }

    /// Shows `error` with its recovery action and runs the one picked
    async fn present_failure(&self, error: CommitError) -> anyhow::Result<Attempt> {
        let recovery = error.recovery();
        let mut options = vec![RecoveryAction::Close.to_string()];
        if recovery != RecoveryAction::Close {
            options.insert(0, recovery.to_string());
        }

        let choice = self
            .infra
            .select_one(&error.to_string(), None, options)
            .await?;
        let chosen = choice.as_deref() == Some(recovery.to_string().as_str());

        if chosen {
            match recovery {
                RecoveryAction::ReenterBranchName | RecoveryAction::CreateNewBranch => {
                    return Ok(Attempt::PromptForBranch);
                }
                RecoveryAction::SwitchBranch => self.infra.switch_branch().await?,
                RecoveryAction::SignIn => self.infra.sign_in().await?,
                RecoveryAction::ShowLogs => self.infra.show_logs().await?,
                RecoveryAction::Close => {}
            }
        }

        Ok(Attempt::Done(CommitOutcome::Failed(error)))
    }
}
