use serde::{Deserialize, Serialize};

use crate::core::models::cost::CostReport;

/// How each report is rendered and how the rendered reports are joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Blank-line separated blocks: "{start} - {end}" then "{amount} {unit}".
    #[default]
    Template,
    /// One line per report: "{label}: {amount} {unit} ({start} - {end})".
    Plain,
}

/// Render a single report.
pub fn format_report(report: &CostReport, layout: Layout) -> String {
    let r = &report.result;
    match layout {
        Layout::Template => format!("\n\n{} - {}\n{} {}\n", r.start, r.end, r.amount, r.unit),
        Layout::Plain => format!(
            "{}: {} {} ({} - {})",
            report.label, r.amount, r.unit, r.start, r.end
        ),
    }
}

/// Join rendered reports into the notification body.
pub fn compose_message(sections: &[String], layout: Layout) -> String {
    match layout {
        Layout::Template => sections.concat(),
        Layout::Plain => sections.join("\n"),
    }
}
