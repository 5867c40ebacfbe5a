use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use tracing::{debug, info};
use webide_app::{CommitContext, CommitOptions, CommitOrchestrator, CommitOutcome, GitLabInfra};
use webide_config::IdeConfig;
use webide_domain::{Branch, BranchCommit, GitLabRef, Project, ProjectId};
use webide_infra::{WebIdeInfra, load_changeset};

use crate::CommitArgs;

/// Commits from an empty repository land here when the project has no
/// default branch yet
const INITIAL_BRANCH: &str = "main";

pub async fn run_commit(config: IdeConfig, args: CommitArgs) -> anyhow::Result<ExitCode> {
    let project_id = args
        .project
        .clone()
        .or_else(|| config.project.clone())
        .map(ProjectId::new)
        .context("No project given, pass --project or set `project` in the configuration")?;

    let infra = Arc::new(WebIdeInfra::new(&config)?);

    let status = load_changeset(&args.changes()).await?;
    let project = infra
        .get_project(&project_id)
        .await
        .with_context(|| format!("Failed to load project {project_id}"))?;
    let git_ref = resolve_ref(infra.as_ref(), &project, &args).await?;
    let username = match infra.get_current_user().await {
        Ok(user) => Some(user.username),
        Err(error) => {
            debug!(
                error = %error,
                "Could not load current user, branch suggestions have no prefix"
            );
            None
        }
    };

    info!(
        project = %project.path_with_namespace,
        git_ref = %git_ref.name(),
        ref_type = %git_ref.ref_type(),
        changes = status.len(),
        "Preparing commit"
    );

    let context = CommitContext {
        project,
        git_ref,
        status,
        commit_message: args.message.clone().unwrap_or_default(),
        username,
    };
    let options = CommitOptions::default()
        .force(args.force)
        .amend(args.amend)
        .should_prompt_branch_name(args.new_branch);

    let orchestrator = CommitOrchestrator::new(infra);
    match orchestrator.execute(&context, options).await? {
        CommitOutcome::NoChanges => Ok(ExitCode::SUCCESS),
        CommitOutcome::Cancelled => {
            eprintln!("{}", "Commit cancelled".yellow());
            Ok(ExitCode::FAILURE)
        }
        CommitOutcome::Failed(_) => Ok(ExitCode::FAILURE),
        CommitOutcome::Committed { commit_id, branch_name, follow_up } => {
            println!("{commit_id}");
            debug!(branch = %branch_name, "Waiting for follow-up");
            follow_up.await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Looks up the commit the changes were made against
async fn resolve_ref<I: GitLabInfra>(
    infra: &I,
    project: &Project,
    args: &CommitArgs,
) -> anyhow::Result<GitLabRef> {
    let project_id = project.project_id();

    if let Some(sha) = &args.sha {
        return Ok(GitLabRef::Commit { sha: sha.clone() });
    }

    if let Some(tag) = &args.tag {
        let commit = infra
            .get_commit(&project_id, tag)
            .await
            .with_context(|| format!("Failed to resolve tag {tag}"))?;
        return Ok(GitLabRef::Tag { name: tag.clone(), sha: commit.id });
    }

    let name = args
        .branch
        .clone()
        .or_else(|| project.default_branch.clone())
        .unwrap_or_else(|| INITIAL_BRANCH.to_string());

    match infra.get_branch(&project_id, &name).await {
        Ok(branch) => {
            let sha = branch.commit.id.clone();
            Ok(GitLabRef::Branch { branch, sha })
        }
        Err(error) if project.empty_repo && error.is_not_found() => {
            debug!(branch = %name, "Repository has no commits yet");
            Ok(GitLabRef::Branch { branch: unborn_branch(name), sha: String::new() })
        }
        Err(error) => Err(error).with_context(|| format!("Failed to resolve branch {name}")),
    }
}

fn unborn_branch(name: String) -> Branch {
    Branch {
        name,
        commit: BranchCommit { id: String::new() },
        can_push: true,
        default: true,
    }
}
