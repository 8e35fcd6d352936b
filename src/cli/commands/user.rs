//! User CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::context::AppContext;
use crate::cli::output::{output, pull_request_table, CommandOutput};
use crate::domain::models::{Config, PullRequest, User};

/// Arguments for `user`.
#[derive(Args, Debug)]
pub struct UserArgs {
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: UserCommands,
}

/// User subcommands.
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Mark a user as active
    Activate {
        /// User ID
        user_id: String,
    },
    /// Mark a user as inactive; existing assignments are kept
    Deactivate {
        /// User ID
        user_id: String,
    },
    /// Show a user
    Show {
        /// User ID
        user_id: String,
    },
    /// List pull requests the user is assigned to review
    Reviews {
        /// User ID
        user_id: String,
    },
}

/// A single user.
#[derive(Debug, serde::Serialize)]
pub struct UserOutput {
    /// The user after the command ran.
    #[serde(flatten)]
    pub user: User,
}

impl CommandOutput for UserOutput {
    fn to_human(&self) -> String {
        let user = &self.user;
        [
            format!("User: {}", user.id),
            format!("Name: {}", user.username),
            format!("Team: {}", user.team_name.as_deref().unwrap_or("-")),
            format!("Active: {}", if user.is_active { "yes" } else { "no" }),
        ]
        .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Pull requests assigned to a user for review.
#[derive(Debug, serde::Serialize)]
pub struct ReviewsOutput {
    /// The user asked about.
    pub user_id: String,
    /// Pull requests with the user among the reviewers.
    pub pull_requests: Vec<PullRequest>,
}

impl CommandOutput for ReviewsOutput {
    fn to_human(&self) -> String {
        if self.pull_requests.is_empty() {
            return format!("No pull requests assigned to {}.", self.user_id);
        }
        format!(
            "{} pull request(s) assigned to {}:\n{}",
            self.pull_requests.len(),
            self.user_id,
            pull_request_table(&self.pull_requests)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run a `user` subcommand.
pub async fn execute(args: UserArgs, config: Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;

    match args.command {
        UserCommands::Activate { user_id } => {
            let user = ctx.users.set_is_active(&user_id, true).await?;
            output(&UserOutput { user }, json_mode);
        }
        UserCommands::Deactivate { user_id } => {
            let user = ctx.users.set_is_active(&user_id, false).await?;
            output(&UserOutput { user }, json_mode);
        }
        UserCommands::Show { user_id } => {
            let user = ctx.users.get(&user_id).await?;
            output(&UserOutput { user }, json_mode);
        }
        UserCommands::Reviews { user_id } => {
            let pull_requests = ctx.pull_requests.reviews_for(&user_id).await?;
            output(&ReviewsOutput { user_id, pull_requests }, json_mode);
        }
    }

    Ok(())
}
