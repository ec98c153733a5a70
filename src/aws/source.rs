use std::path::PathBuf;
use std::sync::Arc;

use crate::changeset::{ChangeSetSummary, Changeset, ChangesetParser};
use crate::error::{ReportError, ReportResult};
use crate::traits::CommandExecutor;

/// Source of CloudFormation change sets
pub trait ChangeSetSource {
    /// Name of the most recently created change set of a stack, if any
    fn latest_change_set_name(&self, stack_name: &str) -> ReportResult<Option<String>>;

    /// Full description of a change set, all pages included
    fn describe_change_set(&self, stack_name: &str, change_set_name: &str)
    -> ReportResult<Changeset>;

    /// Delete a change set
    fn delete_change_set(&self, stack_name: &str, change_set_name: &str) -> ReportResult<()>;
}

/// Change set source backed by the `aws cloudformation` CLI
pub struct AwsCliChangeSetSource {
    command: Arc<dyn CommandExecutor>,
    region: Option<String>,
    working_dir: PathBuf,
    parser: ChangesetParser,
}

impl AwsCliChangeSetSource {
    pub fn new(command: Arc<dyn CommandExecutor>, region: Option<String>) -> Self {
        Self {
            command,
            region,
            working_dir: PathBuf::from("."),
            parser: ChangesetParser::new(),
        }
    }

    /// Run `aws cloudformation <operation> <args>` and return its stdout
    fn run(&self, operation: &str, args: &[&str]) -> ReportResult<String> {
        let mut full_args = vec!["cloudformation", operation];
        full_args.extend_from_slice(args);
        full_args.extend_from_slice(&["--output", "json"]);

        if let Some(region) = &self.region {
            full_args.extend_from_slice(&["--region", region.as_str()]);
        }

        log::debug!("Running aws {}", full_args.join(" "));

        let output = self
            .command
            .execute("aws", &full_args, &self.working_dir)
            .map_err(|e| ReportError::ChangeSetFetch {
                command: operation.to_string(),
                message: e.to_string(),
                exit_code: None,
            })?;

        if !output.status.success() {
            return Err(ReportError::ChangeSetFetch {
                command: operation.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                exit_code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ChangeSetSource for AwsCliChangeSetSource {
    fn latest_change_set_name(&self, stack_name: &str) -> ReportResult<Option<String>> {
        let mut summaries = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut args = vec!["--stack-name", stack_name];
            if let Some(token) = &next_token {
                args.extend_from_slice(&["--next-token", token.as_str()]);
            }

            let stdout = self.run("list-change-sets", &args)?;
            let page = self.parser.parse_list_page(&stdout)?;
            summaries.extend(page.summaries);

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        log::debug!(
            "Found {} change set(s) for stack {}",
            summaries.len(),
            stack_name
        );

        Ok(select_latest(&summaries).map(|summary| summary.change_set_name.clone()))
    }

    fn describe_change_set(
        &self,
        stack_name: &str,
        change_set_name: &str,
    ) -> ReportResult<Changeset> {
        let mut changeset: Option<Changeset> = None;
        let mut next_token: Option<String> = None;

        loop {
            let mut args = vec![
                "--stack-name",
                stack_name,
                "--change-set-name",
                change_set_name,
            ];
            if let Some(token) = &next_token {
                args.extend_from_slice(&["--next-token", token.as_str()]);
            }

            let stdout = self.run("describe-change-set", &args)?;
            let page = self.parser.parse_page(&stdout)?;

            match changeset.as_mut() {
                Some(existing) => existing.changes.extend(page.changeset.changes),
                None => changeset = Some(page.changeset),
            }

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        changeset.ok_or_else(|| {
            ReportError::MalformedInput(format!(
                "empty description for change set '{}'",
                change_set_name
            ))
        })
    }

    fn delete_change_set(&self, stack_name: &str, change_set_name: &str) -> ReportResult<()> {
        self.run(
            "delete-change-set",
            &[
                "--stack-name",
                stack_name,
                "--change-set-name",
                change_set_name,
            ],
        )?;
        Ok(())
    }
}

/// The most recently created change set; summaries without a time sort first
pub fn select_latest(summaries: &[ChangeSetSummary]) -> Option<&ChangeSetSummary> {
    summaries.iter().max_by_key(|summary| summary.creation_time)
}

/// Describe the explicitly named change set, or the latest one of the stack.
///
/// Returns `None` when the stack has no change sets.
pub fn resolve_change_set(
    source: &dyn ChangeSetSource,
    stack_name: &str,
    change_set_name: Option<&str>,
) -> ReportResult<Option<Changeset>> {
    let name = match change_set_name.filter(|name| !name.trim().is_empty()) {
        Some(name) => name.to_string(),
        None => match source.latest_change_set_name(stack_name)? {
            Some(name) => name,
            None => return Ok(None),
        },
    };

    log::debug!("Describing change set {} of stack {}", name, stack_name);
    source.describe_change_set(stack_name, &name).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{aws_failure, aws_success, describe_json};
    use crate::traits::MockCommandExecutor;
    use chrono::{TimeZone, Utc};

    fn source_with(outputs: Vec<crate::traits::MockCommandResult>) -> (Arc<MockCommandExecutor>, AwsCliChangeSetSource) {
        let executor = Arc::new(MockCommandExecutor::with_outputs(outputs));
        let source = AwsCliChangeSetSource::new(executor.clone(), Some("eu-west-1".to_string()));
        (executor, source)
    }

    #[test]
    fn test_describe_single_page() {
        let (executor, source) = source_with(vec![aws_success(&describe_json("web", "pr-1", None))]);

        let changeset = source.describe_change_set("web", "pr-1").unwrap();

        assert_eq!(changeset.change_set_name, "pr-1");
        assert_eq!(changeset.changes.len(), 1);
        assert_eq!(
            executor.calls(),
            vec![
                "aws cloudformation describe-change-set --stack-name web --change-set-name pr-1 --output json --region eu-west-1"
            ]
        );
    }

    #[test]
    fn test_describe_follows_next_token() {
        let (executor, source) = source_with(vec![
            aws_success(&describe_json("web", "pr-1", Some("page-2"))),
            aws_success(&describe_json("web", "pr-1", None)),
        ]);

        let changeset = source.describe_change_set("web", "pr-1").unwrap();

        assert_eq!(changeset.changes.len(), 2);
        let calls = executor.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].contains("--next-token page-2"));
    }

    #[test]
    fn test_describe_failure_is_fetch_error() {
        let (_, source) = source_with(vec![aws_failure(254, "ChangeSetNotFound\n")]);

        let err = source.describe_change_set("web", "missing").unwrap_err();

        match err {
            ReportError::ChangeSetFetch {
                command,
                message,
                exit_code,
            } => {
                assert_eq!(command, "describe-change-set");
                assert_eq!(message, "ChangeSetNotFound");
                assert_eq!(exit_code, Some(254));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_latest_change_set_name_picks_newest() {
        let list = r#"{
            "Summaries": [
                { "ChangeSetName": "old", "CreationTime": "2024-01-01T00:00:00Z" },
                { "ChangeSetName": "new", "CreationTime": "2024-03-01T00:00:00Z" },
                { "ChangeSetName": "mid", "CreationTime": "2024-02-01T00:00:00Z" }
            ]
        }"#;
        let (_, source) = source_with(vec![aws_success(list)]);

        assert_eq!(
            source.latest_change_set_name("web").unwrap(),
            Some("new".to_string())
        );
    }

    #[test]
    fn test_latest_change_set_name_without_change_sets() {
        let (_, source) = source_with(vec![aws_success(r#"{ "Summaries": [] }"#)]);
        assert_eq!(source.latest_change_set_name("web").unwrap(), None);
    }

    #[test]
    fn test_latest_change_set_name_across_pages() {
        let (executor, source) = source_with(vec![
            aws_success(
                r#"{ "Summaries": [{ "ChangeSetName": "a", "CreationTime": "2024-01-01T00:00:00Z" }], "NextToken": "t2" }"#,
            ),
            aws_success(
                r#"{ "Summaries": [{ "ChangeSetName": "b", "CreationTime": "2024-06-01T00:00:00Z" }] }"#,
            ),
        ]);

        assert_eq!(
            source.latest_change_set_name("web").unwrap(),
            Some("b".to_string())
        );
        assert!(executor.calls()[1].contains("--next-token t2"));
    }

    #[test]
    fn test_select_latest_ignores_missing_times() {
        let summaries = vec![
            ChangeSetSummary {
                change_set_name: "dated".to_string(),
                creation_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                status: String::new(),
            },
            ChangeSetSummary {
                change_set_name: "undated".to_string(),
                creation_time: None,
                status: String::new(),
            },
        ];

        assert_eq!(select_latest(&summaries).unwrap().change_set_name, "dated");
        assert!(select_latest(&[]).is_none());
    }

    #[test]
    fn test_resolve_uses_explicit_name() {
        let (executor, source) = source_with(vec![aws_success(&describe_json("web", "given", None))]);

        let changeset = resolve_change_set(&source, "web", Some("given")).unwrap().unwrap();

        assert_eq!(changeset.change_set_name, "given");
        assert!(executor.calls()[0].contains("describe-change-set"));
    }

    #[test]
    fn test_resolve_falls_back_to_latest() {
        let (executor, source) = source_with(vec![
            aws_success(r#"{ "Summaries": [{ "ChangeSetName": "auto", "CreationTime": "2024-01-01T00:00:00Z" }] }"#),
            aws_success(&describe_json("web", "auto", None)),
        ]);

        let changeset = resolve_change_set(&source, "web", None).unwrap().unwrap();

        assert_eq!(changeset.change_set_name, "auto");
        assert!(executor.calls()[0].contains("list-change-sets"));
    }

    #[test]
    fn test_resolve_without_change_sets() {
        let (_, source) = source_with(vec![aws_success(r#"{ "Summaries": [] }"#)]);
        assert!(resolve_change_set(&source, "web", Some("  ")).unwrap().is_none());
    }

    #[test]
    fn test_delete_change_set() {
        let (executor, source) = source_with(vec![aws_success("")]);

        source.delete_change_set("web", "pr-1").unwrap();

        assert!(executor.calls()[0].starts_with(
            "aws cloudformation delete-change-set --stack-name web --change-set-name pr-1"
        ));
    }
}
