mod cli;
mod core;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(
    name = "aws-cost-notify",
    about = "Send yesterday's and month-to-date AWS cost to a notification webhook",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: $XDG_CONFIG_HOME/aws-cost-notify/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print fetched reports as JSON
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch costs and send the notification (default)
    Run {
        /// Print the message instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file and token
    Check,
    /// Print the config file path
    Path,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let output_opts = cli::output::OutputOptions {
        json: cli.json,
        pretty: cli.pretty,
        use_color: cli::output::detect_color(!cli.no_color),
        verbose: cli.verbose,
    };
    cli::output::init_logging(output_opts.verbose);

    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);

    let result = match cli.command {
        None => cli::run_cmd::run(&config_path, false, &output_opts).await,
        Some(Commands::Run { dry_run }) => {
            cli::run_cmd::run(&config_path, dry_run, &output_opts).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init(&config_path, &output_opts),
            ConfigAction::Check => cli::config_cmd::check(&config_path, &output_opts),
            ConfigAction::Path => cli::config_cmd::path(&config_path),
        },
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
