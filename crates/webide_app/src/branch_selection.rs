use std::sync::Arc;

use tracing::debug;
use webide_domain::{BranchSelection, GitLabRef, Project, suggest_branch_name};

use crate::{PreferenceRepository, UserInfra};

const CREATE_NEW_BRANCH: &str = "Create new branch";
const CONTINUE: &str = "Continue";

#[derive(Debug, Clone, Copy)]
pub struct BranchSelectionOptions<'a> {
    pub project: &'a Project,
    pub git_ref: &'a GitLabRef,
    /// GitLab username used to prefix suggested branch names
    pub username: Option<&'a str>,
    pub should_prompt_branch_name: bool,
}

/// Decides which branch a commit goes to
pub struct BranchSelectionPolicy<I> {
    infra: Arc<I>,
}

/// Preference key remembering that the user accepted committing straight to
/// the default branch of `project`
pub fn default_branch_preference_key(project: &Project) -> String {
    format!("commit-to-default-branch-accepted:{}", project.path_with_namespace)
}

impl<I: UserInfra + PreferenceRepository> BranchSelectionPolicy<I> {
    pub fn new(infra: Arc<I>) -> Self {
        Self { infra }
    }

    /// Returns `None` when the user backs out of any prompt
    pub async fn select(
        &self,
        options: BranchSelectionOptions<'_>,
    ) -> anyhow::Result<Option<BranchSelection>> {
        let BranchSelectionOptions { project, git_ref, username, should_prompt_branch_name } =
            options;

        let branch = match git_ref.branch() {
            Some(branch) if !should_prompt_branch_name => branch,
            _ => return self.prompt_new_branch(username, git_ref.name()).await,
        };

        if project.empty_repo {
            debug!(branch = %branch.name, "Empty repository, committing to current branch");
            return Ok(Some(BranchSelection::existing(&branch.name)));
        }

        if !branch.can_push {
            let choice = self
                .infra
                .select_one(
                    &format!("You can't push to the branch '{}'.", branch.name),
                    Some("Create a new branch to commit your changes."),
                    vec![CREATE_NEW_BRANCH.to_string()],
                )
                .await?;
            return match choice.as_deref() {
                Some(CREATE_NEW_BRANCH) => self.prompt_new_branch(username, &branch.name).await,
                _ => Ok(None),
            };
        }

        let preference_key = default_branch_preference_key(project);
        if branch.default && !self.infra.get_flag(&preference_key).await? {
            let choice = self
                .infra
                .select_one(
                    &format!(
                        "You're committing your changes to the default branch '{}'. \
                         Do you want to continue?",
                        branch.name
                    ),
                    None,
                    vec![CONTINUE.to_string(), CREATE_NEW_BRANCH.to_string()],
                )
                .await?;
            return match choice.as_deref() {
                Some(CONTINUE) => {
                    self.infra.set_flag(&preference_key, true).await?;
                    Ok(Some(BranchSelection::existing(&branch.name)))
                }
                Some(CREATE_NEW_BRANCH) => self.prompt_new_branch(username, &branch.name).await,
                _ => Ok(None),
            };
        }

        Ok(Some(BranchSelection::existing(&branch.name)))
    }

    async fn prompt_new_branch(
        &self,
        username: Option<&str>,
        ref_name: &str,
    ) -> anyhow::Result<Option<BranchSelection>> {
        let suggestion = suggest_branch_name(username, ref_name);
        let answer = self
            .infra
            .prompt_question(
                &format!("Enter a new branch name (leave empty to use '{suggestion}')"),
                Some(&suggestion),
            )
            .await?;

        Ok(answer.map(|name| {
            let name = name.trim();
            if name.is_empty() {
                BranchSelection::new_branch(suggestion)
            } else {
                BranchSelection::new_branch(name)
            }
        }))
    }
}
