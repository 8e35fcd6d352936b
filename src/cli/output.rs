//! Output formatting utilities for the CLI.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

use crate::domain::models::{PullRequest, Team};

/// Output of a CLI command, printable as a table or as JSON.
pub trait CommandOutput: Serialize {
    /// Human-readable rendering.
    fn to_human(&self) -> String;
    /// JSON rendering.
    fn to_json(&self) -> serde_json::Value;
}

/// Print `result` to stdout in the selected mode.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to a maximum number of characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn base_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

/// Members of a team as a table.
pub fn team_table(team: &Team) -> String {
    let mut table = base_table(&["User", "Name", "Active"]);
    for member in &team.members {
        table.add_row(vec![
            member.user_id.clone(),
            member.username.clone(),
            if member.is_active { "yes" } else { "no" }.to_string(),
        ]);
    }
    format!("Team: {}\n{table}", team.name)
}

/// Pull requests as a table, one row each.
pub fn pull_request_table(pull_requests: &[PullRequest]) -> String {
    let mut table = base_table(&["ID", "Title", "Author", "Status", "Reviewers"]);
    for pr in pull_requests {
        let reviewers = if pr.assigned_reviewers.is_empty() {
            "-".to_string()
        } else {
            pr.assigned_reviewers.join(", ")
        };
        table.add_row(vec![
            pr.id.clone(),
            truncate(&pr.title, 40),
            pr.author_id.clone(),
            pr.status.to_string(),
            reviewers,
        ]);
    }
    table.to_string()
}
