use async_trait::async_trait;
use colored::Colorize;
use std::io::IsTerminal;

use crate::core::notifier::{NotifyChannel, NotifyError};

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub json: bool,
    pub pretty: bool,
    pub use_color: bool,
    pub verbose: bool,
}

pub fn detect_color(color_flag: bool) -> bool {
    if !color_flag {
        return false;
    }
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aws_cost_notify={},warn", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Prints the message instead of posting it. Writes to stderr when stdout
/// carries JSON.
pub struct ConsoleChannel {
    pub use_color: bool,
    pub to_stderr: bool,
}

impl ConsoleChannel {
    fn render(&self, message: &str) -> String {
        let header = " Cost summary (dry run)";
        let body = message.trim_matches('\n');
        if self.use_color {
            colored::control::set_override(true);
            format!("{}\n{}", header.bold(), body)
        } else {
            format!("{}\n{}", header, body)
        }
    }
}

#[async_trait]
impl NotifyChannel for ConsoleChannel {
    fn name(&self) -> &'static str {
        if self.to_stderr {
            "stderr"
        } else {
            "stdout"
        }
    }

    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let text = self.render(message);
        if self.to_stderr {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
        Ok(())
    }
}
