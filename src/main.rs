//! review-roster CLI entry point.

use clap::Parser;

use review_roster::cli::{commands, context::load_config, handle_error, Cli, Commands};
use review_roster::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, config, cli.json).await,
        Commands::Team(args) => commands::team::execute(args, config, cli.json).await,
        Commands::User(args) => commands::user::execute(args, config, cli.json).await,
        Commands::Pr(args) => commands::pr::execute(args, config, cli.json).await,
        Commands::Serve(args) => commands::serve::execute(args, config).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
