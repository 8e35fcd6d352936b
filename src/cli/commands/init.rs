//! Implementation of the `review-roster init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::{initialize_database, PoolConfig};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::CONFIG_DIR;

/// Arguments for `init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long, short)]
    pub force: bool,
}

/// Result of `init`.
#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    /// Whether initialization finished.
    pub success: bool,
    /// Summary line for humans.
    pub message: String,
    /// Config file written, if any.
    pub config_written: Option<PathBuf>,
    /// Database the schema was applied to.
    pub database_path: String,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if let Some(path) = &self.config_written {
            lines.push(format!("\nWrote default config to {}", path.display()));
        }
        lines.push(format!("Database ready at {}", self.database_path));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Create the project directory, write the default config, and migrate the database.
pub async fn execute(args: InitArgs, config: Config, json_mode: bool) -> Result<()> {
    let dir = PathBuf::from(CONFIG_DIR);
    fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let config_path = dir.join("config.yaml");
    let config_written = if args.force || !config_path.exists() {
        let yaml = serde_yaml::to_string(&Config::default()).context("Failed to render default config")?;
        fs::write(&config_path, yaml)
            .await
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        Some(config_path)
    } else {
        None
    };

    let pool_config = PoolConfig {
        max_connections: config.database.max_connections,
        ..PoolConfig::default()
    };
    let pool = initialize_database(&config.database.url(), Some(pool_config))
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    let output_data = InitOutput {
        success: true,
        message: "Project initialized successfully.".to_string(),
        config_written,
        database_path: config.database.path,
    };
    output(&output_data, json_mode);
    Ok(())
}
