use uuid::Uuid;

/// Branch a commit will be pushed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSelection {
    pub branch_name: String,
    pub is_new_branch: bool,
}

impl BranchSelection {
    pub fn existing(branch_name: impl Into<String>) -> Self {
        Self { branch_name: branch_name.into(), is_new_branch: false }
    }

    pub fn new_branch(branch_name: impl Into<String>) -> Self {
        Self { branch_name: branch_name.into(), is_new_branch: true }
    }
}

/// Proposes `{username-}{ref_name}-patch-{4 hex chars}` for a new branch
pub fn suggest_branch_name(username: Option<&str>, ref_name: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format_branch_name(username, ref_name, &suffix[..4])
}

fn format_branch_name(username: Option<&str>, ref_name: &str, suffix: &str) -> String {
    match username.filter(|name| !name.is_empty()) {
        Some(username) => format!("{username}-{ref_name}-patch-{suffix}"),
        None => format!("{ref_name}-patch-{suffix}"),
    }
}
