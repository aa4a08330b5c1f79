//! Formatting shared by the report generators.

use crate::classify::Severity;
use crate::metrics::PlatformOverlap;
use owo_colors::OwoColorize;

/// Severity text, padded for column alignment and colored when requested.
pub fn severity_cell(severity: Severity, use_colors: bool) -> String {
    let text = format!("{:<8}", <&str>::from(severity));
    if !use_colors {
        return text;
    }

    match severity {
        Severity::Healthy => text.green().bold().to_string(),
        Severity::Warning => text.yellow().bold().to_string(),
        Severity::Critical => text.red().bold().to_string(),
    }
}

pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}

pub fn format_overlap(overlap: &PlatformOverlap) -> String {
    let qualifier = if overlap.exact { "" } else { " (estimated)" };
    format!(
        "both {}, either {}, neither {}{qualifier}",
        overlap.both, overlap.either, overlap.neither
    )
}
