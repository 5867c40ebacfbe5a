use derive_setters::Setters;

use crate::{CommitAction, CommitPayload, EncodedContent, FileStatus, FileStatusKind};

/// Inputs of [`build_commit_payload`]
#[derive(Debug, Clone, Default, Setters)]
#[setters(into)]
pub struct CommitPayloadOptions {
    pub status: Vec<FileStatus>,
    pub commit_message: String,
    pub branch_name: String,
    pub is_new_branch: bool,
    /// Commit the changes were made against. Used as the optimistic
    /// concurrency token and, for new branches and force pushes, as the
    /// commit the branch starts from.
    pub starting_sha: String,
    pub force: bool,
}

/// Turns a file-status set into the create-commit request body.
///
/// Actions keep the order of `status`. `last_commit_id` is only sent when the
/// commit extends an existing branch without force, because that is the only
/// case where GitLab can meaningfully reject a stale file.
///
/// Exception: an empty `starting_sha` (a repository without commits) omits
/// both `last_commit_id` and `start_sha`, since GitLab rejects an empty sha
/// and there is no earlier commit to compare against.
pub fn build_commit_payload(options: CommitPayloadOptions) -> CommitPayload {
    let CommitPayloadOptions {
        status,
        commit_message,
        branch_name,
        is_new_branch,
        starting_sha,
        force,
    } = options;

    let has_start = !starting_sha.is_empty();
    let last_commit_id = (has_start && !force && !is_new_branch).then(|| starting_sha.clone());

    let actions = status
        .into_iter()
        .map(|file| {
            let file_path = file.repository_path().to_string();
            match file.kind {
                FileStatusKind::Created(content) => CommitAction::Create {
                    file_path,
                    content: EncodedContent::base64(&content),
                    last_commit_id: last_commit_id.clone(),
                },
                FileStatusKind::Modified(content) => CommitAction::Update {
                    file_path,
                    content: EncodedContent::base64(&content),
                    last_commit_id: last_commit_id.clone(),
                },
                FileStatusKind::Deleted => CommitAction::Delete { file_path },
            }
        })
        .collect();

    CommitPayload {
        commit_message,
        branch: branch_name,
        actions,
        start_sha: (has_start && (is_new_branch || force)).then_some(starting_sha),
        force: force.then_some(true),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn fixture_status() -> Vec<FileStatus> {
        vec![
            FileStatus::created("/src/new.js", "new"),
            FileStatus::modified("/src/app.js", "changed"),
            FileStatus::deleted("/src/old.js"),
        ]
    }

    fn fixture_options() -> CommitPayloadOptions {
        CommitPayloadOptions::default()
            .status(fixture_status())
            .commit_message("Update 3 files")
            .branch_name("main")
            .starting_sha("abc123")
    }

    #[test]
    fn test_actions_follow_input_order_and_type() {
        let actual = build_commit_payload(fixture_options());

        let expected = CommitPayload {
            commit_message: "Update 3 files".to_string(),
            branch: "main".to_string(),
            actions: vec![
                CommitAction::Create {
                    file_path: "src/new.js".to_string(),
                    content: EncodedContent::base64("new"),
                    last_commit_id: Some("abc123".to_string()),
                },
                CommitAction::Update {
                    file_path: "src/app.js".to_string(),
                    content: EncodedContent::base64("changed"),
                    last_commit_id: Some("abc123".to_string()),
                },
                CommitAction::Delete { file_path: "src/old.js".to_string() },
            ],
            start_sha: None,
            force: None,
        };

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_new_branch_drops_last_commit_id_and_sets_start_sha() {
        let actual = build_commit_payload(fixture_options().is_new_branch(true));

        let last_commit_ids: Vec<_> = actual.actions.iter().map(|a| a.last_commit_id()).collect();
        assert_eq!(last_commit_ids, vec![None, None, None]);
        assert_eq!(actual.start_sha, Some("abc123".to_string()));
        assert_eq!(actual.force, None);
    }

    #[test]
    fn test_force_sets_start_sha_and_force_flag() {
        let actual = build_commit_payload(fixture_options().force(true));

        let last_commit_ids: Vec<_> = actual.actions.iter().map(|a| a.last_commit_id()).collect();
        assert_eq!(last_commit_ids, vec![None, None, None]);
        assert_eq!(actual.start_sha, Some("abc123".to_string()));
        assert_eq!(actual.force, Some(true));
    }

    #[test]
    fn test_force_combines_with_new_branch() {
        let actual = build_commit_payload(fixture_options().force(true).is_new_branch(true));

        assert_eq!(actual.start_sha, Some("abc123".to_string()));
        assert_eq!(actual.force, Some(true));
    }

    #[test]
    fn test_empty_status_builds_empty_action_list() {
        let actual = build_commit_payload(fixture_options().status(vec![]));

        assert_eq!(actual.actions, vec![]);
    }

    #[test]
    fn test_repository_without_commits_sends_no_shas() {
        let actual = build_commit_payload(fixture_options().starting_sha("").force(true));

        assert_eq!(actual.start_sha, None);
        assert_eq!(actual.actions[0].last_commit_id(), None);
        assert_eq!(actual.force, Some(true));
    }

    #[test]
    fn test_one_action_per_distinct_path() {
        let status: Vec<_> = (0..25)
            .map(|i| FileStatus::modified(format!("/file-{i}.txt"), format!("{i}")))
            .collect();

        let actual = build_commit_payload(fixture_options().status(status));

        let paths: Vec<_> = actual.actions.iter().map(|a| a.file_path().to_string()).collect();
        let expected: Vec<_> = (0..25).map(|i| format!("file-{i}.txt")).collect();
        assert_eq!(paths, expected);
    }
}
