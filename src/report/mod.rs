//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - ValidationReport and generated batches are rendered for terminals or machines
//! - Each format encapsulates its own layout rules
//! - Domain logic stays free of presentation concerns

use crate::domain::documents::{BrDocsError, BrDocsResult, GeneratedDocument};
use crate::domain::outcomes::{CandidateStatus, ValidationOutcome, ValidationReport};
use serde_json::Value as JsonValue;
use std::io::Write;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format with optional colors
    Human,
    /// JSON format for programmatic consumption
    Json,
}

impl OutputFormat {
    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json"]
    }
}

impl FromStr for OutputFormat {
    type Err = BrDocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(BrDocsError::config(format!(
                "Unknown output format '{other}'. Expected one of: {}",
                Self::all_formats().join(", ")
            ))),
        }
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Only list invalid and malformed candidates
    pub only_failures: bool,
    /// Maximum number of outcomes to include
    pub max_entries: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true, only_failures: false, max_entries: None }
    }
}

/// Renders reports in the requested format
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    /// Format a validation report in the specified format
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> BrDocsResult<String> {
        let outcomes = self.filter_outcomes(&report.outcomes);

        match format {
            OutputFormat::Human => Ok(self.format_human(report, &outcomes)),
            OutputFormat::Json => self.format_json(report, &outcomes),
        }
    }

    /// Format a batch of generated numbers
    pub fn format_generated(
        &self,
        documents: &[GeneratedDocument],
        format: OutputFormat,
        raw: bool,
    ) -> BrDocsResult<String> {
        match format {
            OutputFormat::Human => {
                let mut output = String::new();
                for doc in documents {
                    let shown = if raw { doc.raw.to_string() } else { doc.formatted.clone() };
                    output.push_str(&shown);
                    output.push('\n');
                }
                Ok(output)
            }
            OutputFormat::Json => serde_json::to_string_pretty(documents)
                .map_err(|e| BrDocsError::serialization(format!("JSON serialization failed: {e}"))),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> BrDocsResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    fn filter_outcomes<'a>(&self, outcomes: &'a [ValidationOutcome]) -> Vec<&'a ValidationOutcome> {
        let mut filtered: Vec<&ValidationOutcome> = outcomes
            .iter()
            .filter(|o| !self.options.only_failures || o.status.is_failure())
            .collect();

        if let Some(max) = self.options.max_entries {
            filtered.truncate(max);
        }

        filtered
    }

    fn format_human(&self, report: &ValidationReport, outcomes: &[&ValidationOutcome]) -> String {
        let mut output = String::new();

        for outcome in outcomes {
            let status = self.paint_status(outcome.status);
            match &outcome.detail {
                Some(detail) => output.push_str(&format!(
                    "  {:>4}  {:<20} {}  {}\n",
                    outcome.index, outcome.candidate, status, detail
                )),
                None => output.push_str(&format!(
                    "  {:>4}  {:<20} {}\n",
                    outcome.index, outcome.candidate, status
                )),
            }
        }

        if !outcomes.is_empty() {
            output.push('\n');
        }
        output.push_str(&self.format_summary(report));
        output
    }

    fn format_json(
        &self,
        report: &ValidationReport,
        outcomes: &[&ValidationOutcome],
    ) -> BrDocsResult<String> {
        let json_outcomes: Vec<JsonValue> = outcomes
            .iter()
            .map(|o| {
                serde_json::json!({
                    "index": o.index,
                    "candidate": o.candidate,
                    "status": o.status.as_str(),
                    "detail": o.detail,
                })
            })
            .collect();

        let counts = &report.summary.counts;
        let json_report = serde_json::json!({
            "document_type": report.document_type.as_str(),
            "outcomes": json_outcomes,
            "summary": {
                "total": counts.total(),
                "valid": counts.valid,
                "invalid": counts.invalid,
                "malformed": counts.malformed,
                "execution_time_ms": report.summary.execution_time_ms,
                "validated_at": report.summary.validated_at.to_rfc3339(),
            }
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| BrDocsError::serialization(format!("JSON serialization failed: {e}")))
    }

    fn format_summary(&self, report: &ValidationReport) -> String {
        let counts = &report.summary.counts;
        format!(
            "{}: {} checked, {} valid, {} invalid, {} malformed ({} ms)\n",
            report.document_type.as_str().to_uppercase(),
            counts.total(),
            counts.valid,
            counts.invalid,
            counts.malformed,
            report.summary.execution_time_ms
        )
    }

    #[cfg(feature = "colors")]
    fn paint_status(&self, status: CandidateStatus) -> String {
        use colored::Colorize;

        let label = format!("{:<9}", status.as_str());
        if !self.options.use_colors {
            return label;
        }
        match status {
            CandidateStatus::Valid => label.as_str().green().to_string(),
            CandidateStatus::Invalid => label.as_str().red().to_string(),
            CandidateStatus::Malformed => label.as_str().yellow().to_string(),
        }
    }

    #[cfg(not(feature = "colors"))]
    fn paint_status(&self, status: CandidateStatus) -> String {
        format!("{:<9}", status.as_str())
    }
}
