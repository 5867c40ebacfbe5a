use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use webide_infra::{Change, parse_mapping, parse_path};

#[derive(Parser)]
#[command(name = "webide", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Log every GitLab request and decision to stderr.
    #[arg(long, default_value_t = false, global = true)]
    pub verbose: bool,

    /// Read settings from this file only, ignoring `WEBIDE_*` variables
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Commit local files to a GitLab repository
    Commit(CommitArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CommitArgs {
    /// Project id or full path, e.g. `group/project`. Defaults to `project`
    /// from the configuration.
    #[arg(long)]
    pub project: Option<String>,

    /// Branch the changes were made against. Defaults to the project's
    /// default branch.
    #[arg(long = "ref", conflicts_with_all = ["tag", "sha"])]
    pub branch: Option<String>,

    /// Tag the changes were made against
    #[arg(long, conflicts_with = "sha")]
    pub tag: Option<String>,

    /// Commit the changes were made against
    #[arg(long)]
    pub sha: Option<String>,

    /// Commit message. Generated from the changes when omitted.
    #[arg(long, short = 'm')]
    pub message: Option<String>,

    /// Replace the latest commit on the branch
    #[arg(long, default_value_t = false)]
    pub amend: bool,

    /// Overwrite commits pushed since `--ref` was checked out
    #[arg(long, default_value_t = false)]
    pub force: bool,

    /// Ask for a new branch instead of committing to `--ref`
    #[arg(long, default_value_t = false)]
    pub new_branch: bool,

    /// Add a file: repository path and the local file with its content
    #[arg(long, value_name = "REMOTE=LOCAL", value_parser = parse_mapping)]
    pub create: Vec<(String, PathBuf)>,

    /// Replace the content of a file
    #[arg(long, value_name = "REMOTE=LOCAL", value_parser = parse_mapping)]
    pub modify: Vec<(String, PathBuf)>,

    /// Remove a file
    #[arg(long, value_name = "REMOTE", value_parser = parse_path)]
    pub delete: Vec<String>,
}

impl CommitArgs {
    /// Changes in the order creations, modifications, deletions
    pub fn changes(&self) -> Vec<Change> {
        let creates = self
            .create
            .iter()
            .map(|(path, local)| Change::Create { path: path.clone(), local: local.clone() });
        let modifies = self
            .modify
            .iter()
            .map(|(path, local)| Change::Modify { path: path.clone(), local: local.clone() });
        let deletes = self
            .delete
            .iter()
            .map(|path| Change::Delete { path: path.clone() });

        creates.chain(modifies).chain(deletes).collect()
    }
}
