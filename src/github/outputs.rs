use std::path::Path;

use crate::error::{ReportError, ReportResult};
use crate::report::ReportOutputs;
use crate::traits::FileSystem;

/// Render outputs in the multiline `name<<DELIMITER` syntax of `GITHUB_OUTPUT`
pub fn format_step_outputs(outputs: &ReportOutputs, delimiter: &str) -> String {
    let entries = [
        ("report", outputs.report.as_str()),
        ("change_set_name", outputs.change_set_name.as_str()),
        ("change_set_status", outputs.change_set_status.as_str()),
    ];

    let mut content = String::new();
    for (name, value) in entries {
        content.push_str(&format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter));
    }
    content
}

/// Append the report outputs to the step output file
pub fn write_step_outputs(
    fs: &dyn FileSystem,
    path: &Path,
    outputs: &ReportOutputs,
) -> ReportResult<()> {
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());

    // A delimiter occurring inside a value would end the heredoc early
    if outputs.report.lines().any(|line| line == delimiter) {
        return Err(ReportError::Serialization(
            "report contains the output delimiter".to_string(),
        ));
    }

    log::debug!("Writing step outputs to {:?}", path);

    fs.append(path, &format_step_outputs(outputs, &delimiter))
        .map_err(|e| ReportError::Io(std::io::Error::other(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockFileSystem;

    fn outputs() -> ReportOutputs {
        ReportOutputs {
            report: "line one\nline two".to_string(),
            change_set_name: "pr-42".to_string(),
            change_set_status: "CREATE_COMPLETE".to_string(),
        }
    }

    #[test]
    fn test_format_step_outputs() {
        let content = format_step_outputs(&outputs(), "EOF");

        assert_eq!(
            content,
            "report<<EOF\nline one\nline two\nEOF\n\
             change_set_name<<EOF\npr-42\nEOF\n\
             change_set_status<<EOF\nCREATE_COMPLETE\nEOF\n"
        );
    }

    #[test]
    fn test_write_step_outputs_appends() {
        let fs = MockFileSystem::with_files(&[("/gh/output", "previous=1\n")]);
        let path = Path::new("/gh/output");

        write_step_outputs(&fs, path, &outputs()).unwrap();

        let written = fs.get_file_contents(path).unwrap();
        assert!(written.starts_with("previous=1\nreport<<ghadelimiter_"));
        assert!(written.contains("\nline one\nline two\n"));
        assert!(written.contains("change_set_status<<ghadelimiter_"));
    }

    #[test]
    fn test_write_step_outputs_uses_one_delimiter_per_call() {
        let fs = MockFileSystem::new();
        let path = Path::new("/gh/output");

        write_step_outputs(&fs, path, &outputs()).unwrap();

        let written = fs.get_file_contents(path).unwrap();
        let first = written.lines().next().unwrap();
        let delimiter = first.trim_start_matches("report<<");
        assert_eq!(written.lines().filter(|l| *l == delimiter).count(), 3);
    }
}
