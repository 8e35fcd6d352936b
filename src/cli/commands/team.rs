//! Team CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::context::AppContext;
use crate::cli::output::{output, team_table, CommandOutput};
use crate::domain::models::{Config, Team};

/// Arguments for `team`.
#[derive(Args, Debug)]
pub struct TeamArgs {
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: TeamCommands,
}

/// Team subcommands.
#[derive(Subcommand, Debug)]
pub enum TeamCommands {
    /// Create a team and upsert its members
    Add {
        /// JSON or YAML file with `team_name` and `members`
        #[arg(long, short)]
        file: PathBuf,
    },
    /// Show a team with its current members
    Show {
        /// Team name
        name: String,
    },
}

/// A team, and whether this command created it.
#[derive(Debug, serde::Serialize)]
pub struct TeamOutput {
    /// True for `team add`.
    #[serde(skip)]
    pub created: bool,
    /// The team with its current members.
    #[serde(flatten)]
    pub team: Team,
}

impl CommandOutput for TeamOutput {
    fn to_human(&self) -> String {
        let table = team_table(&self.team);
        if self.created {
            format!("Team created.\n{table}")
        } else {
            table
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Parse a team definition. YAML is a superset of JSON, so one parser covers both.
pub fn parse_team(contents: &str) -> Result<Team> {
    serde_yaml::from_str(contents).context("Invalid team definition")
}

/// Run a `team` subcommand.
pub async fn execute(args: TeamArgs, config: Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;

    match args.command {
        TeamCommands::Add { file } => {
            let contents = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let team = parse_team(&contents)?;
            let created = ctx.teams.add_team(&team).await?;
            output(&TeamOutput { created: true, team: created }, json_mode);
        }
        TeamCommands::Show { name } => {
            let team = ctx.teams.get_by_name(&name).await?;
            output(&TeamOutput { created: false, team }, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_team_json_and_yaml() {
        let json = r#"{"team_name": "core", "members": [{"user_id": "u1", "username": "Alice", "is_active": true}]}"#;
        let team = parse_team(json).unwrap();
        assert_eq!(team.name, "core");
        assert_eq!(team.members.len(), 1);

        let yaml = "team_name: ops\nmembers:\n  - user_id: u2\n    username: Bob\n    is_active: false\n";
        let team = parse_team(yaml).unwrap();
        assert_eq!(team.name, "ops");
        assert!(!team.members[0].is_active);

        assert!(parse_team("members: []").is_err());
    }
}
