//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of a harvest run,
//! including counters, skip reasons and the table of accepted leads.

use crate::output::traits::{OutputResult, RunSummary};
use crate::state::Lead;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown summary of a run to `output_path`
pub fn generate_markdown_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();
    let stats = &summary.stats;

    md.push_str("# Lead-Ripple Harvest Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Run ID**: {}\n", summary.run_id));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Status**: {}\n", summary.status));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Counters
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Candidate Sites**: {}\n", stats.candidates));
    md.push_str(&format!("- **Processed**: {}\n", stats.processed));
    md.push_str(&format!(
        "- **Accepted Leads**: {} of {} targeted\n",
        stats.accepted, stats.target
    ));
    md.push_str(&format!(
        "- **Acceptance Rate**: {:.2}%\n",
        stats.acceptance_rate()
    ));
    md.push_str(&format!(
        "- **Leads With Phone**: {:.2}%\n",
        summary.phone_coverage()
    ));
    md.push_str(&format!(
        "- **Leads With Location**: {:.2}%\n\n",
        summary.location_coverage()
    ));

    if !stats.skipped.is_empty() {
        md.push_str("## Skipped Candidates\n\n");
        md.push_str("| Reason | Count |\n");
        md.push_str("|--------|-------|\n");

        let mut reasons: Vec<_> = stats.skipped.iter().collect();
        reasons.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (reason, count) in reasons {
            md.push_str(&format!("| {} | {} |\n", reason, count));
        }
        md.push('\n');
    }

    md.push_str("## Leads\n\n");
    if summary.leads.is_empty() {
        md.push_str("_No leads were accepted._\n");
    } else {
        md.push_str("| Name | Website | Phone | Email | Location | Source Page |\n");
        md.push_str("|------|---------|-------|-------|----------|-------------|\n");
        for lead in &summary.leads {
            md.push_str(&lead_row(lead));
        }
    }

    md
}

fn lead_row(lead: &Lead) -> String {
    let cells: Vec<String> = lead.fields().iter().map(|f| escape_cell(f)).collect();
    format!("| {} |\n", cells.join(" | "))
}

/// Keeps a value inside one table cell
fn escape_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
