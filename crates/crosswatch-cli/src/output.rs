//! Run summary rendering: human-readable table to stdout, JSON report to
//! the report directory.

use std::fs;
use std::path::{Path, PathBuf};

use crosswatch_core::CrossoverEvent;
use crosswatch_engine::RunSummary;

use crate::error::CliError;

pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    if !summary.has_events() {
        out.push_str("No crossovers detected on the latest bar.\n");
    } else {
        render_bucket(&mut out, "Bullish crossovers", &summary.bullish);
        render_bucket(&mut out, "Bearish crossovers", &summary.bearish);
    }

    if !summary.skipped.is_empty() {
        out.push_str(&format!("\nSkipped instruments ({}):\n", summary.skipped.len()));
        for failure in &summary.skipped {
            out.push_str(&format!("  {:<12} {}\n", failure.symbol, failure.reason));
        }
    }

    out
}

fn render_bucket(out: &mut String, title: &str, events: &[CrossoverEvent]) {
    if events.is_empty() {
        return;
    }
    out.push_str(&format!("{title} ({}):\n", events.len()));
    out.push_str(&format!("  {:<12} {:<12} {:>10}\n", "SYMBOL", "DATE", "CLOSE"));
    for event in events {
        out.push_str(&format!(
            "  {:<12} {:<12} {:>10.2}\n",
            event.symbol.as_str(),
            event.date.to_string(),
            event.close
        ));
    }
    out.push('\n');
}

/// Write `report.json` next to the charts and return its path.
pub fn write_report(
    report_dir: &Path,
    summary: &RunSummary,
    pretty: bool,
) -> Result<PathBuf, CliError> {
    fs::create_dir_all(report_dir)?;
    let body = if pretty {
        serde_json::to_string_pretty(summary)?
    } else {
        serde_json::to_string(summary)?
    };

    let path = report_dir.join("report.json");
    fs::write(&path, body)?;
    Ok(path)
}
