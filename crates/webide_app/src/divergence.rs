use std::sync::Arc;

use tracing::debug;
use webide_domain::{GitLabRef, ProjectId};

use crate::GitLabInfra;

/// Counts the commits the remote branch has on top of the commit the
/// workspace was opened at.
pub struct RemoteDivergenceProbe<I> {
    infra: Arc<I>,
}

impl<I: GitLabInfra> RemoteDivergenceProbe<I> {
    pub fn new(infra: Arc<I>) -> Self {
        Self { infra }
    }

    /// Returns 0 without calling GitLab for tags, commits and unresolved
    /// branches. Errors mean the divergence is unknown; callers should assume
    /// at least one commit would be lost.
    pub async fn compute(
        &self,
        project_id: &ProjectId,
        git_ref: &GitLabRef,
    ) -> anyhow::Result<u64> {
        let GitLabRef::Branch { branch, sha } = git_ref else {
            return Ok(0);
        };
        if sha.is_empty() {
            return Ok(0);
        }

        let local = self.infra.get_commit_sequence(project_id, sha).await?;
        let remote_branch = self.infra.get_branch(project_id, &branch.name).await?;
        let remote = self
            .infra
            .get_commit_sequence(project_id, &remote_branch.commit.id)
            .await?;

        let divergence = remote.count.saturating_sub(local.count);
        debug!(
            branch = %branch.name,
            local = local.count,
            remote = remote.count,
            divergence,
            "Computed remote divergence"
        );
        Ok(divergence)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::{MockInfra, fixture_branch, fixture_branch_ref};

    fn fixture_project_id() -> ProjectId {
        ProjectId::from("42")
    }

    #[tokio::test]
    async fn test_counts_remote_commits_beyond_local() {
        let infra = Arc::new(
            MockInfra::new()
                .with_branch(fixture_branch("main", "remote-sha"))
                .with_sequence("local-sha", 10)
                .with_sequence("remote-sha", 13),
        );
        let probe = RemoteDivergenceProbe::new(infra.clone());
        let git_ref = fixture_branch_ref(fixture_branch("main", "local-sha"));

        let actual = probe.compute(&fixture_project_id(), &git_ref).await.unwrap();

        assert_eq!(actual, 3);
        assert_eq!(
            infra.calls(),
            vec![
                "get_commit_sequence:local-sha",
                "get_branch:main",
                "get_commit_sequence:remote-sha"
            ]
        );
    }

    #[tokio::test]
    async fn test_up_to_date_branch() {
        let infra = Arc::new(
            MockInfra::new()
                .with_branch(fixture_branch("main", "sha"))
                .with_sequence("sha", 5),
        );
        let probe = RemoteDivergenceProbe::new(infra);
        let git_ref = fixture_branch_ref(fixture_branch("main", "sha"));

        let actual = probe.compute(&fixture_project_id(), &git_ref).await.unwrap();

        assert_eq!(actual, 0);
    }

    #[tokio::test]
    async fn test_tag_ref_makes_no_calls() {
        let infra = Arc::new(MockInfra::new());
        let probe = RemoteDivergenceProbe::new(infra.clone());
        let git_ref = GitLabRef::Tag { name: "v1.0".to_string(), sha: "abc".to_string() };

        let actual = probe.compute(&fixture_project_id(), &git_ref).await.unwrap();

        assert_eq!(actual, 0);
        assert_eq!(infra.calls(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_empty_sha_makes_no_calls() {
        let infra = Arc::new(MockInfra::new());
        let probe = RemoteDivergenceProbe::new(infra.clone());
        let git_ref = GitLabRef::Branch { branch: fixture_branch("main", ""), sha: String::new() };

        let actual = probe.compute(&fixture_project_id(), &git_ref).await.unwrap();

        assert_eq!(actual, 0);
        assert_eq!(infra.calls(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_branch_lookup_failure_propagates() {
        let infra = Arc::new(MockInfra::new().with_sequence("local-sha", 1).failing("get_branch"));
        let probe = RemoteDivergenceProbe::new(infra);
        let git_ref = fixture_branch_ref(fixture_branch("main", "local-sha"));

        let actual = probe.compute(&fixture_project_id(), &git_ref).await;

        assert!(actual.is_err());
    }
}
