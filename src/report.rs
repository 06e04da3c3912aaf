//! Output formatting for scan results.
//!
//! Two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the wire shape consumed by UI clients

use colored::*;
use serde::{Deserialize, Serialize};

use crate::resolve::VariableType;
use crate::scan::ScanError;

// =============================================================================
// Wire shapes
// =============================================================================

/// Aggregated usage of one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEntry {
    /// Aggregation key; consumers identify entries by name, so it stays off
    /// the wire.
    #[serde(skip)]
    pub variable_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_type: Option<VariableType>,
    pub count: usize,
    pub layers: Vec<LayerRef>,
}

/// One layer referencing a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRef {
    pub name: String,
    pub id: String,
    pub visible: bool,
}

/// Wire shape of a failed scan. Never conflated with an empty success.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScanFailure {
    pub error: String,
}

impl From<&ScanError> for ScanFailure {
    fn from(e: &ScanError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

// =============================================================================
// JSON format
// =============================================================================

/// Render a successful scan as JSON.
pub fn render_json(entries: &[UsageEntry]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Render a failed scan as JSON.
pub fn render_json_failure(error: &ScanError) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&ScanFailure::from(error))?)
}

/// Write a successful scan as JSON to stdout.
pub fn write_json(entries: &[UsageEntry]) -> anyhow::Result<()> {
    println!("{}", render_json(entries)?);
    Ok(())
}

/// Write a failed scan as JSON to stdout.
pub fn write_json_failure(error: &ScanError) -> anyhow::Result<()> {
    println!("{}", render_json_failure(error)?);
    Ok(())
}

// =============================================================================
// Pretty format
// =============================================================================

/// Render a report for terminal display.
pub fn render_pretty(entries: &[UsageEntry]) -> String {
    if entries.is_empty() {
        return format!("{}\n", "No variable usages found.".dimmed());
    }

    let mut out = String::new();
    let total: usize = entries.iter().map(|e| e.count).sum();
    out.push_str(&format!(
        "{} {} across {} {}\n\n",
        total.to_string().bold(),
        if total == 1 { "usage" } else { "usages" },
        entries.len(),
        if entries.len() == 1 {
            "variable"
        } else {
            "variables"
        },
    ));

    for entry in entries {
        let type_tag = entry
            .resolved_type
            .map(|t| format!(" [{t}]").cyan().to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{}{} {}\n",
            entry.name.bold(),
            type_tag,
            format!("({})", entry.count).dimmed(),
        ));
        for layer in &entry.layers {
            let marker = if layer.visible {
                "●".green().to_string()
            } else {
                "○".dimmed().to_string()
            };
            out.push_str(&format!(
                "  {} {} {}\n",
                marker,
                layer.name,
                layer.id.dimmed()
            ));
        }
        out.push('\n');
    }
    out
}

/// Write a report for terminal display to stdout.
pub fn write_pretty(entries: &[UsageEntry]) {
    print!("{}", render_pretty(entries));
}

/// Write a scan failure for terminal display to stderr.
pub fn write_pretty_failure(error: &ScanError) {
    eprintln!("{} {}", "scan failed:".red().bold(), error);
}
