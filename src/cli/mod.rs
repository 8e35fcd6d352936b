//! Command-line interface.

pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{init::InitArgs, pr::PrArgs, serve::ServeArgs, team::TeamArgs, user::UserArgs};

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "review-roster", version, about = "Assign and rotate pull request reviewers across teams")]
pub struct Cli {
    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file to load instead of .review-roster/config.yaml
    #[arg(long, short, global = true, env = "ROSTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Selected subcommand.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the project directory, config file, and database
    Init(InitArgs),
    /// Manage teams
    Team(TeamArgs),
    /// Manage users
    User(UserArgs),
    /// Manage pull requests
    Pr(PrArgs),
    /// Run the HTTP server
    Serve(ServeArgs),
}

/// Print an error in the selected output mode and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "error": {
                "message": format!("{err:#}"),
            }
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
