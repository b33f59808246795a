//! Output formatting for check reports
//!
//! Human output mirrors what students see in their terminal and CI logs. JSON
//! output is for orchestrators that want the individual lines.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::checks::{CheckReport, SequenceReport};
use crate::detector::Detection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_report(&self, report: &CheckReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Human => Ok(report.render()),
        }
    }

    pub fn format_sequence(&self, report: &SequenceReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Human => Ok(report.render()),
        }
    }

    /// `ci` appends the GitHub Actions annotation lines to human output
    pub fn format_detection(&self, detection: &Detection, ci: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => to_json(detection),
            OutputFormat::Human => {
                let mut lines = vec![detection.summary_line()];
                if ci {
                    lines.extend(detection.ci_annotations());
                }
                Ok(lines.join("\n"))
            }
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}
