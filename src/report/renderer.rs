//! Renderers for change set reports
//!
//! Plain text, ANSI console and Markdown renderers over one [`ReportPlan`].
//! They only differ in formatting tokens.

use owo_colors::OwoColorize;

use super::plan::{
    DELETION_WARNING, DetailSection, NO_CHANGES, PropertyLine, REPORT_TITLE, ReportHeader,
    ReportPlan, ResourceBlock, SUMMARY_TITLE, SummaryLine, TABLE_TITLE,
};
use super::table::{
    ANSI_COLOR_OVERHEAD, COLUMN_PADDING, HEADERS, MARKDOWN_CODE_OVERHEAD, RESOURCE_COLUMN, Table,
    pad,
};
use crate::changeset::Category;

/// Trait for report renderers
pub trait ReportRenderer {
    /// Render the plan to a string
    fn render(&self, plan: &ReportPlan) -> String;

    /// Render the informational report used when a stack has no change set
    fn render_no_change_set(&self, stack_name: &str) -> String;
}

fn no_change_set_message(stack_name: &str) -> String {
    format!("No change sets found for stack '{}'.", stack_name)
}

fn section_title(section: &DetailSection) -> String {
    format!(
        "{} {} ({})",
        section.category.marker(),
        section.category.heading(),
        section.resources.len()
    )
}

fn underline(text: &str, ch: char) -> String {
    ch.to_string().repeat(text.chars().count())
}

/// Plain text renderer (logs, files)
pub struct PlainRenderer;

impl Default for PlainRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_header(&self, header: &ReportHeader) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n{}\n", REPORT_TITLE, underline(REPORT_TITLE, '=')));
        output.push_str(&key_value_lines(header));
        output.push('\n');
        output
    }

    fn render_summary(&self, summary: &[SummaryLine]) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n{}\n", SUMMARY_TITLE, underline(SUMMARY_TITLE, '-')));
        for line in summary {
            output.push_str(&format!(
                "{} {}: {}\n",
                line.category.marker(),
                line.category.label(),
                line.count
            ));
        }

        output.push('\n');
        output
    }

    fn render_table(&self, table: Option<&Table>) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n{}\n", TABLE_TITLE, underline(TABLE_TITLE, '-')));

        match table {
            None => output.push_str(&format!("{}\n", NO_CHANGES)),
            Some(table) => {
                output.push_str(&plain_row(&HEADERS.map(String::from), &table.widths));
                let separators = table
                    .widths
                    .map(|width| "-".repeat(width.saturating_sub(COLUMN_PADDING)));
                output.push_str(&plain_row(&separators, &table.widths));

                for row in &table.rows {
                    output.push_str(&plain_row(&row.cells(), &table.widths));
                }
            }
        }

        output.push('\n');
        output
    }

    fn render_resource(&self, block: &ResourceBlock) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}. {} ({})\n",
            block.position, block.logical_id, block.resource_type
        ));

        if let Some(physical_id) = &block.physical_id {
            output.push_str(&format!("   Physical ID: {}\n", physical_id));
        }

        output.push_str(&format!("   Action: {}\n", block.action));

        if let Some(replacement) = &block.replacement {
            output.push_str(&format!("   Replacement: {}\n", replacement));
        }

        if let Some(reasons) = &block.replacement_reasons {
            output.push_str("   Replacement reasons:\n");
            for reason in reasons {
                output.push_str(&format!("     - {}\n", reason.describe()));
            }
        }

        if !block.property_changes.is_empty() {
            output.push_str("   All property changes:\n");
            for property in &block.property_changes {
                let prefix = if property.is_replacement_cause { "!" } else { " " };
                output.push_str(&format!(
                    "     {} {} ({})\n",
                    prefix,
                    property.target,
                    property.describe_attributes()
                ));
            }
        }

        if block.deletion_warning {
            output.push_str(&format!("   WARNING: {}\n", DELETION_WARNING));
        }

        output.push('\n');
        output
    }
}

impl ReportRenderer for PlainRenderer {
    fn render(&self, plan: &ReportPlan) -> String {
        let mut output = String::new();

        output.push_str(&self.render_header(&plan.header));
        output.push_str(&self.render_summary(&plan.summary));
        output.push_str(&self.render_table(plan.table.as_ref()));

        for section in &plan.sections {
            let title = section_title(section);
            output.push_str(&format!("{}\n{}\n", title, underline(&title, '-')));
            for block in &section.resources {
                output.push_str(&self.render_resource(block));
            }
        }

        output
    }

    fn render_no_change_set(&self, stack_name: &str) -> String {
        format!(
            "{}\n{}\nStack: {}\n\n{}\n",
            REPORT_TITLE,
            underline(REPORT_TITLE, '='),
            stack_name,
            no_change_set_message(stack_name)
        )
    }
}

fn key_value_lines(header: &ReportHeader) -> String {
    let fields = header.fields();
    let label_width = fields
        .iter()
        .map(|(label, _)| label.len() + 1)
        .max()
        .unwrap_or(0);

    fields
        .iter()
        .map(|(label, value)| {
            format!("{} {}\n", pad(&format!("{}:", label), label_width, 0), value)
        })
        .collect()
}

fn plain_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let line: String = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width, 0))
        .collect();
    format!("{}\n", line.trim_end())
}

/// ANSI-colored renderer for terminals and CI logs
pub struct AnsiRenderer;

impl Default for AnsiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnsiRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Apply the category color; adds exactly [`ANSI_COLOR_OVERHEAD`] characters
    fn paint(&self, text: &str, category: Category) -> String {
        match category {
            Category::Removed => text.red().to_string(),
            Category::Replaced => text.magenta().to_string(),
            Category::ModifiedInPlace => text.yellow().to_string(),
            Category::New => text.green().to_string(),
        }
    }

    fn render_table(&self, table: Option<&Table>) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", TABLE_TITLE.bold()));

        let Some(table) = table else {
            output.push_str(&format!("{}\n\n", NO_CHANGES.dimmed()));
            return output;
        };

        let header: String = HEADERS
            .iter()
            .zip(&table.widths)
            .map(|(title, width)| pad(title, *width, 0))
            .collect();
        output.push_str(&format!("{}\n", header.trim_end().bold()));

        let rule_width: usize = table.widths.iter().sum::<usize>() - COLUMN_PADDING;
        output.push_str(&format!("{}\n", "─".repeat(rule_width).dimmed()));

        for row in &table.rows {
            let cells = row.cells();
            let line: String = cells
                .iter()
                .enumerate()
                .map(|(column, cell)| {
                    if column == RESOURCE_COLUMN {
                        let painted = self.paint(cell, row.category);
                        pad(&painted, table.widths[column], ANSI_COLOR_OVERHEAD)
                    } else {
                        pad(cell, table.widths[column], 0)
                    }
                })
                .collect();
            output.push_str(&format!("{}\n", line.trim_end()));
        }

        output.push('\n');
        output
    }

    fn render_resource(&self, block: &ResourceBlock) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} {}\n",
            format!("{}.", block.position).dimmed(),
            self.paint(&block.logical_id, block.category).bold(),
            format!("({})", block.resource_type).dimmed()
        ));

        if let Some(physical_id) = &block.physical_id {
            output.push_str(&format!("   {} {}\n", "Physical ID:".dimmed(), physical_id));
        }

        output.push_str(&format!("   {} {}\n", "Action:".dimmed(), block.action));

        if let Some(replacement) = &block.replacement {
            output.push_str(&format!("   {} {}\n", "Replacement:".dimmed(), replacement));
        }

        if let Some(reasons) = &block.replacement_reasons {
            output.push_str(&format!("   {}\n", "Replacement reasons:".dimmed()));
            for reason in reasons {
                output.push_str(&format!("     - {}\n", reason.describe()));
            }
        }

        if !block.property_changes.is_empty() {
            output.push_str(&format!("   {}\n", "All property changes:".dimmed()));
            for property in &block.property_changes {
                output.push_str(&self.render_property(property));
            }
        }

        if block.deletion_warning {
            output.push_str(&format!(
                "   {} {}\n",
                "⚠ WARNING:".red().bold(),
                DELETION_WARNING.red()
            ));
        }

        output.push('\n');
        output
    }

    fn render_property(&self, property: &PropertyLine) -> String {
        if property.is_replacement_cause {
            format!(
                "     {} {} {}\n",
                "!".yellow().bold(),
                property.target.yellow(),
                format!("({})", property.describe_attributes()).dimmed()
            )
        } else {
            format!(
                "       {} {}\n",
                property.target,
                format!("({})", property.describe_attributes()).dimmed()
            )
        }
    }
}

impl ReportRenderer for AnsiRenderer {
    fn render(&self, plan: &ReportPlan) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", REPORT_TITLE.bold().underline()));
        for (label, value) in plan.header.fields() {
            output.push_str(&format!("  {} {}\n", format!("{}:", label).dimmed(), value));
        }
        output.push('\n');

        output.push_str(&format!("{}\n", SUMMARY_TITLE.bold()));
        for line in &plan.summary {
            let label = format!("{}:", line.category.label());
            output.push_str(&format!(
                "  {} {} {}\n",
                line.category.marker(),
                self.paint(&label, line.category),
                line.count.to_string().bold()
            ));
        }
        output.push('\n');

        output.push_str(&self.render_table(plan.table.as_ref()));

        for section in &plan.sections {
            output.push_str(&format!(
                "{}\n",
                self.paint(&section_title(section), section.category).bold()
            ));
            for block in &section.resources {
                output.push_str(&self.render_resource(block));
            }
        }

        output
    }

    fn render_no_change_set(&self, stack_name: &str) -> String {
        format!(
            "{}\n  {} {}\n\n{}\n",
            REPORT_TITLE.bold().underline(),
            "Stack:".dimmed(),
            stack_name,
            no_change_set_message(stack_name).yellow()
        )
    }
}

/// Markdown renderer for pull-request comments and job summaries
pub struct MarkdownRenderer;

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_table(&self, table: Option<&Table>) -> String {
        let mut output = String::new();

        output.push_str(&format!("### {}\n\n", TABLE_TITLE));

        let Some(table) = table else {
            output.push_str(&format!("{}\n\n", NO_CHANGES));
            return output;
        };

        let mut widths = table.widths;
        widths[RESOURCE_COLUMN] += MARKDOWN_CODE_OVERHEAD;

        output.push_str(&markdown_row(&HEADERS.map(String::from), &widths));
        let separators = widths.map(|width| "-".repeat(width));
        output.push_str(&markdown_row(&separators, &widths));

        for row in &table.rows {
            let mut cells = row.cells();
            cells[RESOURCE_COLUMN] = format!("{} `{}`", row.category.marker(), row.logical_id);
            output.push_str(&markdown_row(&cells, &widths));
        }

        output.push('\n');
        output
    }

    fn render_resource(&self, block: &ResourceBlock) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "#### {}. `{}` ({})\n\n",
            block.position, block.logical_id, block.resource_type
        ));

        if let Some(physical_id) = &block.physical_id {
            output.push_str(&format!("- **Physical ID:** `{}`\n", physical_id));
        }

        output.push_str(&format!("- **Action:** {}\n", block.action));

        if let Some(replacement) = &block.replacement {
            output.push_str(&format!("- **Replacement:** {}\n", replacement));
        }

        if let Some(reasons) = &block.replacement_reasons {
            output.push_str("- **Replacement reasons:**\n");
            for reason in reasons {
                output.push_str(&format!("  - {}\n", reason.describe()));
            }
        }

        if !block.property_changes.is_empty() {
            output.push_str("- **All property changes:**\n");
            for property in &block.property_changes {
                let prefix = if property.is_replacement_cause { "⚠️ " } else { "" };
                output.push_str(&format!(
                    "  - {}`{}` ({})\n",
                    prefix,
                    property.target,
                    property.describe_attributes()
                ));
            }
        }

        if block.deletion_warning {
            output.push_str(&format!("\n> ⚠️ **Warning:** {}\n", DELETION_WARNING));
        }

        output.push('\n');
        output
    }
}

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, plan: &ReportPlan) -> String {
        let mut output = String::new();

        output.push_str(&format!("## {}\n\n", REPORT_TITLE));
        for (label, value) in plan.header.fields() {
            output.push_str(&format!("- **{}:** `{}`\n", label, value));
        }
        output.push('\n');

        output.push_str(&format!("### {}\n\n", SUMMARY_TITLE));
        for line in &plan.summary {
            output.push_str(&format!(
                "- {} **{}:** {}\n",
                line.category.marker(),
                line.category.label(),
                line.count
            ));
        }
        output.push('\n');

        output.push_str(&self.render_table(plan.table.as_ref()));

        for section in &plan.sections {
            output.push_str(&format!("### {}\n\n", section_title(section)));
            for block in &section.resources {
                output.push_str(&self.render_resource(block));
            }
        }

        output
    }

    fn render_no_change_set(&self, stack_name: &str) -> String {
        format!(
            "## {}\n\n- **Stack:** `{}`\n\n{}\n",
            REPORT_TITLE,
            stack_name,
            no_change_set_message(stack_name)
        )
    }
}

fn markdown_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width, 0))
        .collect::<Vec<_>>()
        .join("| ");
    format!("| {}|\n", line)
}
