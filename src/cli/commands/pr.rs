//! Pull request CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::context::AppContext;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, PullRequest};

/// Arguments for `pr`.
#[derive(Args, Debug)]
pub struct PrArgs {
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: PrCommands,
}

/// Pull request subcommands.
#[derive(Subcommand, Debug)]
pub enum PrCommands {
    /// Open a pull request and assign reviewers from the author's team
    Create {
        /// Pull request ID
        id: String,
        /// Pull request title
        #[arg(long, short)]
        title: String,
        /// Author user ID
        #[arg(long, short)]
        author: String,
    },
    /// Merge a pull request (no-op if already merged)
    Merge {
        /// Pull request ID
        id: String,
    },
    /// Replace an assigned reviewer with an active teammate of theirs
    Reassign {
        /// Pull request ID
        id: String,
        /// Reviewer to replace
        #[arg(long, short)]
        reviewer: String,
    },
    /// Show a pull request
    Show {
        /// Pull request ID
        id: String,
    },
}

/// A pull request, plus the replacement after a reassign.
#[derive(Debug, serde::Serialize)]
pub struct PullRequestOutput {
    /// The pull request after the command ran.
    #[serde(flatten)]
    pub pull_request: PullRequest,
    /// Set only by `pr reassign`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced_by: Option<String>,
}

impl CommandOutput for PullRequestOutput {
    fn to_human(&self) -> String {
        let pr = &self.pull_request;
        let reviewers = if pr.assigned_reviewers.is_empty() {
            "none".to_string()
        } else {
            pr.assigned_reviewers.join(", ")
        };

        let mut lines = vec![
            format!("Pull request: {}", pr.id),
            format!("Title: {}", pr.title),
            format!("Author: {}", pr.author_id),
            format!("Status: {}", pr.status),
            format!("Reviewers: {reviewers}"),
            format!("Created: {}", pr.created_at.to_rfc3339()),
        ];
        if let Some(merged_at) = pr.merged_at {
            lines.push(format!("Merged: {}", merged_at.to_rfc3339()));
        }
        if let Some(replacement) = &self.replaced_by {
            lines.push(format!("Replaced by: {replacement}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run a `pr` subcommand.
pub async fn execute(args: PrArgs, config: Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;

    let result = match args.command {
        PrCommands::Create { id, title, author } => PullRequestOutput {
            pull_request: ctx.pull_requests.create(&id, &title, &author).await?,
            replaced_by: None,
        },
        PrCommands::Merge { id } => PullRequestOutput {
            pull_request: ctx.pull_requests.merge(&id).await?,
            replaced_by: None,
        },
        PrCommands::Reassign { id, reviewer } => {
            let (pull_request, replaced_by) = ctx.pull_requests.reassign_reviewer(&id, &reviewer).await?;
            PullRequestOutput {
                pull_request,
                replaced_by: Some(replaced_by),
            }
        }
        PrCommands::Show { id } => PullRequestOutput {
            pull_request: ctx.pull_requests.get(&id).await?,
            replaced_by: None,
        },
    };

    output(&result, json_mode);
    Ok(())
}
