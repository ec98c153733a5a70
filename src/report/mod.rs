//! Change set report rendering
//!
//! This module turns a classified change set into a human-readable report.
//!
//! # Features
//!
//! - **Summary**: one count line per impact category
//! - **Overview table**: content-sized columns, one row per resource
//! - **Detail sections**: per-category resource blocks with replacement causes
//! - **Formats**: plain text, ANSI-colored console output and Markdown
//!
//! # Example
//!
//! ```ignore
//! use crate::changeset::classify;
//! use crate::report::{render, ReportFormat};
//!
//! let classification = classify(&changeset.changes);
//! let report = render(&changeset, &classification, ReportFormat::Markdown);
//! ```

mod plan;
mod renderer;
mod table;

use std::fmt;
use std::str::FromStr;

use crate::changeset::{Changeset, Classification};
use crate::error::ReportError;

pub use plan::ReportPlan;
pub use renderer::{AnsiRenderer, MarkdownRenderer, PlainRenderer, ReportRenderer};

/// Output format of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    PlainText,
    AnsiConsole,
    #[default]
    Markdown,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::PlainText => "plain",
            ReportFormat::AnsiConsole => "ansi",
            ReportFormat::Markdown => "markdown",
        }
    }

    /// Parse a format name, falling back to Markdown when it is not supported.
    ///
    /// Returns the error alongside the fallback so callers can warn about it.
    pub fn parse_or_default(value: &str) -> (Self, Option<ReportError>) {
        match value.parse() {
            Ok(format) => (format, None),
            Err(err) => (ReportFormat::default(), Some(err)),
        }
    }

    fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self {
            ReportFormat::PlainText => Box::new(PlainRenderer::new()),
            ReportFormat::AnsiConsole => Box::new(AnsiRenderer::new()),
            ReportFormat::Markdown => Box::new(MarkdownRenderer::new()),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" | "text" | "plaintext" => Ok(Self::PlainText),
            "ansi" | "console" | "color" => Ok(Self::AnsiConsole),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values a run hands to its CI step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutputs {
    pub report: String,
    pub change_set_name: String,
    pub change_set_status: String,
}

/// Status published when no change set exists
pub const NO_CHANGE_SET_STATUS: &str = "NOT_FOUND";

/// Render a classified change set in the requested format
pub fn render(
    changeset: &Changeset,
    classification: &Classification<'_>,
    format: ReportFormat,
) -> String {
    let plan = ReportPlan::build(changeset, classification);
    format.renderer().render(&plan)
}

/// Render the informational report for a stack without change sets
pub fn render_no_change_set(stack_name: &str, format: ReportFormat) -> String {
    format.renderer().render_no_change_set(stack_name)
}

impl ReportOutputs {
    /// Bundle a rendered report with the change set identity it describes
    pub fn for_change_set(changeset: &Changeset, report: String) -> Self {
        Self {
            report,
            change_set_name: changeset.change_set_name.clone(),
            change_set_status: changeset.status.clone(),
        }
    }

    pub fn for_missing_change_set(report: String) -> Self {
        Self {
            report,
            change_set_name: String::new(),
            change_set_status: NO_CHANGE_SET_STATUS.to_string(),
        }
    }
}
