//! Column layout for the resource overview table
//!
//! Column widths are driven by content: each column is as wide as its widest
//! cell (header included) plus [`COLUMN_PADDING`]. Widths are measured in
//! terminal columns, so the category icons count as two.

use crate::changeset::Category;

/// Spaces added after the widest cell of every column
pub const COLUMN_PADDING: usize = 2;

/// Length added by one foreground color escape pair (`\x1b[3Xm` + `\x1b[39m`)
pub const ANSI_COLOR_OVERHEAD: usize = 10;

pub const HEADERS: [&str; 5] = ["#", "Resource", "Type", "Action", "Replacement"];

/// Index of the marker + logical id column
pub const RESOURCE_COLUMN: usize = 1;

/// Backticks wrapped around the logical id in Markdown tables
pub const MARKDOWN_CODE_OVERHEAD: usize = 2;

/// One row of the overview table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based position in the change set
    pub index: usize,
    pub category: Category,
    pub logical_id: String,
    pub resource_type: String,
    pub action: String,
    pub replacement: String,
}

impl TableRow {
    /// Cell texts in column order, without any styling
    pub fn cells(&self) -> [String; 5] {
        [
            self.index.to_string(),
            format!("{} {}", self.category.marker(), self.logical_id),
            self.resource_type.clone(),
            self.action.clone(),
            self.replacement.clone(),
        ]
    }
}

/// Overview table with precomputed column widths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
    pub widths: [usize; 5],
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        let widths = compute_widths(&rows);
        Self { rows, widths }
    }
}

/// Widest cell per column plus padding
pub fn compute_widths(rows: &[TableRow]) -> [usize; 5] {
    let mut widths = HEADERS.map(display_width);

    for row in rows {
        for (column, cell) in row.cells().iter().enumerate() {
            widths[column] = widths[column].max(display_width(cell));
        }
    }

    widths.map(|width| width + COLUMN_PADDING)
}

/// Number of terminal columns a string occupies (escape bytes count as one each)
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Symbols below U+1F300 are wide only when their default presentation is emoji
fn char_width(c: char) -> usize {
    match c {
        '\u{1F300}'..='\u{1FAFF}'
        | '\u{231A}'..='\u{231B}'
        | '\u{23E9}'..='\u{23EC}'
        | '\u{23F0}'
        | '\u{23F3}'
        | '\u{25FD}'..='\u{25FE}'
        | '\u{2614}'..='\u{2615}'
        | '\u{2648}'..='\u{2653}'
        | '\u{267F}'
        | '\u{2693}'
        | '\u{26A1}'
        | '\u{26AA}'..='\u{26AB}'
        | '\u{26BD}'..='\u{26BE}'
        | '\u{26C4}'..='\u{26C5}'
        | '\u{26CE}'
        | '\u{26D4}'
        | '\u{26EA}'
        | '\u{26F2}'..='\u{26F3}'
        | '\u{26F5}'
        | '\u{26FA}'
        | '\u{26FD}'
        | '\u{2705}'
        | '\u{270A}'..='\u{270B}'
        | '\u{2728}'
        | '\u{274C}'
        | '\u{274E}'
        | '\u{2753}'..='\u{2755}'
        | '\u{2757}'
        | '\u{2795}'..='\u{2797}'
        | '\u{27B0}'
        | '\u{27BF}'
        | '\u{2B1B}'..='\u{2B1C}'
        | '\u{2B50}'
        | '\u{2B55}' => 2,
        '\u{FE0F}' | '\u{200D}' => 0,
        _ => 1,
    }
}

/// Pad `text` with spaces to `width` columns.
///
/// `overhead` is the number of invisible characters embedded in `text` (color
/// escapes); they count towards its length but not its visual width.
pub fn pad(text: &str, width: usize, overhead: usize) -> String {
    let target = width + overhead;
    let current = display_width(text);
    let mut padded = text.to_string();

    if current < target {
        padded.push_str(&" ".repeat(target - current));
    }

    padded
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    fn row(index: usize, category: Category, id: &str, resource_type: &str) -> TableRow {
        TableRow {
            index,
            category,
            logical_id: id.to_string(),
            resource_type: resource_type.to_string(),
            action: "Modify".to_string(),
            replacement: "N/A".to_string(),
        }
    }

    #[test]
    fn test_widths_cover_longest_cell_plus_padding() {
        let rows = vec![
            row(1, Category::New, "Queue", "AWS::SQS::Queue"),
            row(2, Category::Replaced, "AVeryLongLogicalIdentifier", "AWS::S3::Bucket"),
        ];

        let widths = compute_widths(&rows);

        for r in &rows {
            for (column, cell) in r.cells().iter().enumerate() {
                assert!(widths[column] >= display_width(cell) + COLUMN_PADDING);
            }
        }

        // marker (2) + space + 26 chars + padding
        assert_eq!(widths[RESOURCE_COLUMN], 29 + COLUMN_PADDING);
        assert_eq!(widths[4], "Replacement".len() + COLUMN_PADDING);
    }

    #[test]
    fn test_widths_without_rows_fit_headers() {
        let widths = compute_widths(&[]);
        assert_eq!(widths[0], 1 + COLUMN_PADDING);
        assert_eq!(widths[2], 4 + COLUMN_PADDING);
    }

    #[test]
    fn test_display_width_counts_icons_as_two() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("🟢 abc"), 6);
    }

    #[test]
    fn test_display_width_text_presentation_symbols_are_narrow() {
        assert_eq!(display_width("⚠"), 1);
        assert_eq!(display_width("⚠️"), 1);
        assert_eq!(display_width("✔ ok"), 4);
        assert_eq!(display_width("✅"), 2);
        assert_eq!(display_width("❌"), 2);
        assert_eq!(display_width("🟠"), 2);
    }

    #[test]
    fn test_pad_plain_text() {
        assert_eq!(pad("ab", 5, 0), "ab   ");
        assert_eq!(pad("abcdef", 3, 0), "abcdef");
    }

    #[test]
    fn test_color_overhead_matches_escape_length() {
        let painted = "x".red().to_string();
        assert_eq!(painted.len() - 1, ANSI_COLOR_OVERHEAD);

        let painted = "x".green().to_string();
        assert_eq!(painted.len() - 1, ANSI_COLOR_OVERHEAD);
    }

    #[test]
    fn test_pad_colored_text_matches_visual_width() {
        let painted = "ab".yellow().to_string();
        let padded = pad(&painted, 5, ANSI_COLOR_OVERHEAD);
        assert!(padded.ends_with("   "));
        assert_eq!(padded.len(), painted.len() + 3);
    }
}
