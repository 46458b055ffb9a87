use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::cli::output::{ConsoleChannel, OutputOptions};
use crate::core::clock::TimeContext;
use crate::core::config::{parse_endpoint, AppConfig, ConfigError};
use crate::core::fetcher::AwsCostExplorer;
use crate::core::notifier::{LineNotifier, NotifyChannel};
use crate::core::pipeline;

/// Everything a run needs, resolved before any network call is made.
pub struct RunPlan {
    pub config: AppConfig,
    pub clock: TimeContext,
    pub channel: Box<dyn NotifyChannel>,
}

/// Resolve token, endpoint and clock from config. A dry run needs no token.
///
/// With `--json` the dry-run text goes to stderr so stdout stays parseable.
pub fn plan(
    config: AppConfig,
    dry_run: bool,
    opts: &OutputOptions,
) -> Result<RunPlan, ConfigError> {
    if config.reports.is_empty() {
        return Err(ConfigError::NoReports);
    }

    let channel: Box<dyn NotifyChannel> = if dry_run {
        Box::new(ConsoleChannel {
            use_color: opts.use_color,
            to_stderr: opts.json,
        })
    } else {
        let token = config.token()?;
        let endpoint = parse_endpoint(&config.settings.endpoint)?;
        Box::new(LineNotifier::new(endpoint, token))
    };

    let clock = TimeContext::new(&config.settings.timezone)?;

    Ok(RunPlan {
        config,
        clock,
        channel,
    })
}

pub async fn run(config_path: &Path, dry_run: bool, opts: &OutputOptions) -> Result<()> {
    let config = AppConfig::load_from(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let plan = plan(config, dry_run, opts)?;
    debug!(
        zone = %plan.clock.zone(),
        now = %plan.clock.now(),
        channel = plan.channel.name(),
        "run planned"
    );

    let source = AwsCostExplorer::load(&plan.config.settings).await;
    let summary = pipeline::run(
        &plan.clock,
        &source,
        plan.channel.as_ref(),
        &plan.config.reports,
        plan.config.settings.layout,
    )
    .await?;

    if opts.json {
        let json = if opts.pretty {
            serde_json::to_string_pretty(&summary.reports)?
        } else {
            serde_json::to_string(&summary.reports)?
        };
        println!("{}", json);
    }

    debug!(message = %summary.message, "delivered");
    info!(reports = summary.reports.len(), "done");
    Ok(())
}
