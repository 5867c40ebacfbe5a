use std::sync::Arc;

use strum_macros::Display;
use tracing::debug;
use url::Url;
use webide_domain::{BranchSelection, Project};

use crate::{GitLabInfra, UserInfra, WorkbenchInfra};

pub const SUCCESS_MESSAGE: &str = "Your changes have been committed successfully.";

/// Follow-ups offered once a commit lands
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SuccessAction {
    #[strum(serialize = "Go to Project")]
    GoToProject,
    #[strum(serialize = "Create MR")]
    CreateMergeRequest,
    #[strum(serialize = "View MR")]
    ViewMergeRequest(Url),
    #[strum(serialize = "Continue working")]
    ContinueWorking,
}

/// Picks follow-ups for the branch that was committed to. Existing feature
/// branches link to their open merge request when there is one.
pub async fn success_actions<I: GitLabInfra>(
    infra: &I,
    project: &Project,
    selection: &BranchSelection,
) -> Vec<SuccessAction> {
    let is_default_branch =
        project.default_branch.as_deref() == Some(selection.branch_name.as_str());

    let primary = if is_default_branch {
        SuccessAction::GoToProject
    } else if selection.is_new_branch {
        SuccessAction::CreateMergeRequest
    } else {
        match infra
            .find_merge_requests(&project.project_id(), &selection.branch_name)
            .await
        {
            Ok(merge_requests) => merge_requests
                .into_iter()
                .next()
                .map(|mr| SuccessAction::ViewMergeRequest(mr.web_url))
                .unwrap_or(SuccessAction::CreateMergeRequest),
            Err(error) => {
                debug!(error = %error, "Merge request lookup failed");
                SuccessAction::CreateMergeRequest
            }
        }
    };

    vec![primary, SuccessAction::ContinueWorking]
}

/// Shows the success notification and runs the follow-up the user picks
pub async fn notify_success<I: GitLabInfra + UserInfra + WorkbenchInfra>(
    infra: Arc<I>,
    project: Project,
    selection: BranchSelection,
) -> anyhow::Result<()> {
    let actions = success_actions(infra.as_ref(), &project, &selection).await;
    let labels = actions.iter().map(ToString::to_string).collect();

    let choice = infra.select_one(SUCCESS_MESSAGE, None, labels).await?;
    let Some(action) = choice.and_then(|label| actions.into_iter().find(|a| a.to_string() == label))
    else {
        return Ok(());
    };

    match action {
        SuccessAction::GoToProject => infra.open_url(&project.web_url).await,
        SuccessAction::CreateMergeRequest => {
            infra
                .open_url(&project.new_merge_request_url(&selection.branch_name))
                .await
        }
        SuccessAction::ViewMergeRequest(url) => infra.open_url(&url).await,
        SuccessAction::ContinueWorking => Ok(()),
    }
}
