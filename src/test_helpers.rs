//! Test helpers for building change sets and AWS CLI responses
//!
//! Shared fixtures for unit tests across the changeset, report, aws and
//! command modules.

#![cfg(test)]

use crate::changeset::{
    ChangeAction, ChangeSource, Changeset, Evaluation, PropertyChangeDetail, Replacement,
    RequiresRecreation, ResourceChange,
};
use crate::traits::MockCommandResult;

/// A change set touching one resource of every category.
///
/// Order: replaced bucket, modified function, new queue, removed topic.
pub fn sample_changeset() -> Changeset {
    Changeset::new("web", "pr-42")
        .with_status("CREATE_COMPLETE", "AVAILABLE")
        .with_change(
            ResourceChange::new("AssetsBucket", "AWS::S3::Bucket", ChangeAction::Modify)
                .with_physical_id("web-assets-1a2b3c")
                .with_replacement(Replacement::True)
                .with_detail(
                    PropertyChangeDetail::new("Properties")
                        .with_property_name("BucketName")
                        .with_requires_recreation(RequiresRecreation::Always)
                        .with_change_source(ChangeSource::DirectModification),
                )
                .with_detail(
                    PropertyChangeDetail::new("Properties")
                        .with_property_name("Tags")
                        .with_change_source(ChangeSource::DirectModification),
                ),
        )
        .with_change(
            ResourceChange::new("ApiFunction", "AWS::Lambda::Function", ChangeAction::Modify)
                .with_replacement(Replacement::False)
                .with_detail(
                    PropertyChangeDetail::new("Properties")
                        .with_property_name("Code")
                        .with_change_source(ChangeSource::ParameterReference)
                        .with_causing_entity("CodeVersion")
                        .with_evaluation(Evaluation::Static),
                ),
        )
        .with_change(ResourceChange::new(
            "Queue",
            "AWS::SQS::Queue",
            ChangeAction::Add,
        ))
        .with_change(ResourceChange::new(
            "LegacyTopic",
            "AWS::SNS::Topic",
            ChangeAction::Remove,
        ))
}

/// `describe-change-set` JSON for a change set with a single added queue
pub fn describe_json(stack: &str, name: &str, next_token: Option<&str>) -> String {
    let token = next_token
        .map(|t| format!(r#", "NextToken": "{}""#, t))
        .unwrap_or_default();

    format!(
        r#"{{
            "StackName": "{stack}",
            "ChangeSetName": "{name}",
            "Status": "CREATE_COMPLETE",
            "ExecutionStatus": "AVAILABLE",
            "CreationTime": "2024-05-01T12:30:00Z",
            "Changes": [
                {{
                    "Type": "Resource",
                    "ResourceChange": {{
                        "Action": "Add",
                        "LogicalResourceId": "Queue",
                        "ResourceType": "AWS::SQS::Queue",
                        "Details": []
                    }}
                }}
            ]{token}
        }}"#
    )
}

/// Mocked successful `aws` invocation printing `stdout`
pub fn aws_success(stdout: &str) -> MockCommandResult {
    MockCommandResult {
        command: "aws".to_string(),
        exit_code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// Mocked failing `aws` invocation
pub fn aws_failure(exit_code: i32, stderr: &str) -> MockCommandResult {
    MockCommandResult {
        command: "aws".to_string(),
        exit_code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}
