use anyhow::Context;
use colored::Colorize;
use tracing::info;
use url::Url;
use webide_app::WorkbenchInfra;

/// Workbench actions for a terminal session. There is no editor to drive,
/// so most actions print what the user should do next.
#[derive(Debug, Clone, Default)]
pub struct TerminalWorkbench;

impl TerminalWorkbench {
    pub fn new() -> Self {
        Self
    }

    fn hint(message: &str) {
        eprintln!("{} {}", "hint:".dimmed(), message);
    }
}

#[async_trait::async_trait]
impl WorkbenchInfra for TerminalWorkbench {
    async fn reload_workspace(&self, branch: &str) -> anyhow::Result<()> {
        info!(branch = %branch, "Workspace now tracks branch");
        Self::hint(&format!("continue with --ref {branch}"));
        Ok(())
    }

    async fn open_url(&self, url: &Url) -> anyhow::Result<()> {
        eprintln!("{}", url.as_str().underline());
        open::that_detached(url.as_str()).with_context(|| format!("Failed to open {url}"))
    }

    async fn switch_branch(&self) -> anyhow::Result<()> {
        Self::hint("run again with --ref <branch> to commit to another branch");
        Ok(())
    }

    async fn sign_in(&self) -> anyhow::Result<()> {
        Self::hint(
            "set WEBIDE_TOKEN or `token` in the webide config.toml to a valid personal access token",
        );
        Ok(())
    }

    async fn show_logs(&self) -> anyhow::Result<()> {
        Self::hint("run again with --verbose to see every GitLab request");
        Ok(())
    }
}
