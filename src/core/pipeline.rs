use anyhow::{Context, Result};
use tracing::info;

use crate::core::clock::TimeContext;
use crate::core::fetcher::{fetch_cost, CostSource};
use crate::core::formatter::{compose_message, format_report, Layout};
use crate::core::models::cost::{CostReport, ReportSpec};
use crate::core::notifier::NotifyChannel;

/// What a run fetched and sent.
pub struct RunSummary {
    pub reports: Vec<CostReport>,
    pub message: String,
}

/// Fetch every report, then deliver one combined message.
///
/// Any fetch failure aborts before the channel is touched.
pub async fn run(
    clock: &TimeContext,
    source: &dyn CostSource,
    channel: &dyn NotifyChannel,
    specs: &[ReportSpec],
    layout: Layout,
) -> Result<RunSummary> {
    let mut reports = Vec::with_capacity(specs.len());
    for spec in specs {
        let query = clock.query_for(spec.granularity);
        let result = fetch_cost(source, &query)
            .await
            .with_context(|| format!("Failed to fetch {} cost", spec.label))?;
        info!(
            label = %spec.label,
            start = %result.start,
            end = %result.end,
            amount = %result.amount,
            unit = %result.unit,
            "cost fetched"
        );
        reports.push(CostReport {
            label: spec.label.clone(),
            granularity: spec.granularity,
            result,
        });
    }

    let sections: Vec<String> = reports.iter().map(|r| format_report(r, layout)).collect();
    let message = compose_message(&sections, layout);

    channel
        .send(&message)
        .await
        .with_context(|| format!("Failed to deliver via {}", channel.name()))?;

    Ok(RunSummary { reports, message })
}
