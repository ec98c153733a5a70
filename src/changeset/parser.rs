//! Parser for `aws cloudformation describe-change-set` output
//!
//! The API response is deserialized into permissive raw structs first and then
//! converted into the domain types, replacing every missing optional field with
//! its explicit default. Only a missing stack or change set name is an error.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::types::{
    ChangeAction, ChangeSource, Changeset, Evaluation, PropertyChangeDetail, Replacement,
    RequiresRecreation, ResourceChange,
};
use crate::error::{ReportError, ReportResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDescription {
    stack_name: Option<String>,
    change_set_name: Option<String>,
    change_set_id: Option<String>,
    description: Option<String>,
    status: Option<String>,
    execution_status: Option<String>,
    creation_time: Option<String>,
    changes: Option<Vec<RawChange>>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawChange {
    resource_change: Option<RawResourceChange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawResourceChange {
    action: Option<String>,
    logical_resource_id: Option<String>,
    physical_resource_id: Option<String>,
    resource_type: Option<String>,
    replacement: Option<String>,
    details: Option<Vec<RawDetail>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDetail {
    target: Option<RawTarget>,
    evaluation: Option<String>,
    change_source: Option<String>,
    causing_entity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTarget {
    attribute: Option<String>,
    name: Option<String>,
    requires_recreation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawListResponse {
    summaries: Option<Vec<RawSummary>>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSummary {
    change_set_name: Option<String>,
    creation_time: Option<String>,
    status: Option<String>,
}

/// One page of a `describe-change-set` response
#[derive(Debug)]
pub struct DescribePage {
    pub changeset: Changeset,
    pub next_token: Option<String>,
}

/// One entry of a `list-change-sets` response
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSetSummary {
    pub change_set_name: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub status: String,
}

/// One page of a `list-change-sets` response
#[derive(Debug)]
pub struct ListPage {
    pub summaries: Vec<ChangeSetSummary>,
    pub next_token: Option<String>,
}

/// Parser for CloudFormation change set JSON
pub struct ChangesetParser;

impl Default for ChangesetParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangesetParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete change set description
    pub fn parse(&self, json: &str) -> ReportResult<Changeset> {
        Ok(self.parse_page(json)?.changeset)
    }

    /// Parse one page of a change set description, keeping its `NextToken`
    pub fn parse_page(&self, json: &str) -> ReportResult<DescribePage> {
        let raw: RawDescription = serde_json::from_str(json)
            .map_err(|e| ReportError::MalformedInput(format!("invalid JSON: {}", e)))?;

        let stack_name = required(raw.stack_name, "StackName")?;
        let change_set_name = required(raw.change_set_name, "ChangeSetName")?;

        let changes = raw
            .changes
            .unwrap_or_default()
            .into_iter()
            .filter_map(|change| change.resource_change)
            .map(|resource| self.convert_resource(resource))
            .collect();

        let changeset = Changeset {
            stack_name,
            change_set_name,
            change_set_id: raw.change_set_id,
            description: raw.description,
            status: raw.status.unwrap_or_default(),
            execution_status: raw.execution_status.unwrap_or_default(),
            creation_time: raw.creation_time.as_deref().and_then(parse_timestamp),
            changes,
        };

        Ok(DescribePage {
            changeset,
            next_token: raw.next_token.filter(|token| !token.is_empty()),
        })
    }

    /// Parse one page of a `list-change-sets` response
    pub fn parse_list_page(&self, json: &str) -> ReportResult<ListPage> {
        let raw: RawListResponse = serde_json::from_str(json)
            .map_err(|e| ReportError::MalformedInput(format!("invalid JSON: {}", e)))?;

        let summaries = raw
            .summaries
            .unwrap_or_default()
            .into_iter()
            .filter_map(|summary| {
                let name = summary.change_set_name.filter(|name| !name.is_empty())?;
                Some(ChangeSetSummary {
                    change_set_name: name,
                    creation_time: summary.creation_time.as_deref().and_then(parse_timestamp),
                    status: summary.status.unwrap_or_default(),
                })
            })
            .collect();

        Ok(ListPage {
            summaries,
            next_token: raw.next_token.filter(|token| !token.is_empty()),
        })
    }

    fn convert_resource(&self, raw: RawResourceChange) -> ResourceChange {
        let action = raw.action.as_deref().and_then(|value| {
            let parsed = ChangeAction::parse(value);
            if parsed.is_none() {
                log::debug!("Unknown change action '{}', treating as absent", value);
            }
            parsed
        });

        ResourceChange {
            logical_id: raw.logical_resource_id.unwrap_or_default(),
            physical_id: raw.physical_resource_id.filter(|id| !id.is_empty()),
            resource_type: raw.resource_type.unwrap_or_default(),
            action,
            replacement: raw
                .replacement
                .as_deref()
                .map(Replacement::parse)
                .unwrap_or_default(),
            details: raw
                .details
                .unwrap_or_default()
                .into_iter()
                .map(convert_detail)
                .collect(),
        }
    }
}

fn convert_detail(raw: RawDetail) -> PropertyChangeDetail {
    let (attribute, property_name, requires_recreation) = match raw.target {
        Some(target) => (
            target.attribute.unwrap_or_default(),
            target.name.filter(|name| !name.is_empty()),
            target
                .requires_recreation
                .as_deref()
                .map(RequiresRecreation::parse)
                .unwrap_or_default(),
        ),
        None => (String::new(), None, RequiresRecreation::Never),
    };

    PropertyChangeDetail {
        property_name,
        attribute,
        requires_recreation,
        change_source: raw.change_source.as_deref().map(ChangeSource::parse),
        evaluation: raw
            .evaluation
            .as_deref()
            .map(Evaluation::parse)
            .unwrap_or_default(),
        causing_entity: raw.causing_entity.filter(|entity| !entity.is_empty()),
    }
}

fn required(value: Option<String>, field: &str) -> ReportResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ReportError::MalformedInput(format!(
            "missing required field '{}'",
            field
        ))),
    }
}

/// Parse an API timestamp, accepting RFC 3339 with or without an offset
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    match chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc()),
        Err(_) => {
            log::debug!("Unparseable timestamp '{}'", value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_description() -> &'static str {
        r#"{
            "Changes": [
                {
                    "Type": "Resource",
                    "ResourceChange": {
                        "Action": "Modify",
                        "LogicalResourceId": "AssetsBucket",
                        "PhysicalResourceId": "assets-bucket-1a2b",
                        "ResourceType": "AWS::S3::Bucket",
                        "Replacement": "True",
                        "Scope": ["Properties"],
                        "Details": [
                            {
                                "Target": {
                                    "Attribute": "Properties",
                                    "Name": "BucketName",
                                    "RequiresRecreation": "Always"
                                },
                                "Evaluation": "Static",
                                "ChangeSource": "DirectModification"
                            }
                        ]
                    }
                },
                {
                    "Type": "Resource",
                    "ResourceChange": {
                        "Action": "Add",
                        "LogicalResourceId": "Queue",
                        "ResourceType": "AWS::SQS::Queue",
                        "Scope": [],
                        "Details": []
                    }
                }
            ],
            "ChangeSetName": "pr-42",
            "ChangeSetId": "arn:aws:cloudformation:eu-west-1:123456789012:changeSet/pr-42/abc",
            "StackName": "web",
            "CreationTime": "2024-05-01T12:30:00.123000+00:00",
            "ExecutionStatus": "AVAILABLE",
            "Status": "CREATE_COMPLETE"
        }"#
    }

    #[test]
    fn test_parse_identity_and_status() {
        let changeset = ChangesetParser::new().parse(sample_description()).unwrap();

        assert_eq!(changeset.stack_name, "web");
        assert_eq!(changeset.change_set_name, "pr-42");
        assert_eq!(changeset.status, "CREATE_COMPLETE");
        assert_eq!(changeset.execution_status, "AVAILABLE");
        assert!(changeset.creation_time.is_some());
    }

    #[test]
    fn test_parse_resource_changes_in_order() {
        let changeset = ChangesetParser::new().parse(sample_description()).unwrap();

        assert_eq!(changeset.changes.len(), 2);
        assert_eq!(changeset.changes[0].logical_id, "AssetsBucket");
        assert_eq!(changeset.changes[0].replacement, Replacement::True);
        assert_eq!(
            changeset.changes[0].physical_id.as_deref(),
            Some("assets-bucket-1a2b")
        );
        assert_eq!(changeset.changes[1].logical_id, "Queue");
        assert_eq!(changeset.changes[1].action, Some(ChangeAction::Add));
    }

    #[test]
    fn test_parse_detail_fields() {
        let changeset = ChangesetParser::new().parse(sample_description()).unwrap();
        let detail = &changeset.changes[0].details[0];

        assert_eq!(detail.attribute, "Properties");
        assert_eq!(detail.property_name.as_deref(), Some("BucketName"));
        assert_eq!(detail.requires_recreation, RequiresRecreation::Always);
        assert_eq!(detail.evaluation, Evaluation::Static);
        assert_eq!(detail.change_source, Some(ChangeSource::DirectModification));
    }

    #[test]
    fn test_missing_optional_fields_become_defaults() {
        let json = r#"{
            "StackName": "web",
            "ChangeSetName": "cs",
            "Changes": [
                { "ResourceChange": { "LogicalResourceId": "Topic", "ResourceType": "AWS::SNS::Topic" } }
            ]
        }"#;

        let changeset = ChangesetParser::new().parse(json).unwrap();
        let change = &changeset.changes[0];

        assert_eq!(change.action, None);
        assert_eq!(change.replacement, Replacement::Unset);
        assert!(change.details.is_empty());
        assert_eq!(changeset.status, "");
    }

    #[test]
    fn test_null_changes_is_empty() {
        let json = r#"{ "StackName": "web", "ChangeSetName": "cs", "Changes": null }"#;
        let changeset = ChangesetParser::new().parse(json).unwrap();
        assert!(changeset.changes.is_empty());
    }

    #[test]
    fn test_missing_identity_is_malformed() {
        let json = r#"{ "StackName": "web", "Changes": [] }"#;
        let err = ChangesetParser::new().parse(json).unwrap_err();
        assert!(matches!(err, ReportError::MalformedInput(ref msg) if msg.contains("ChangeSetName")));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = ChangesetParser::new().parse("not json").unwrap_err();
        assert!(matches!(err, ReportError::MalformedInput(_)));
    }

    #[test]
    fn test_parse_page_keeps_next_token() {
        let json = r#"{ "StackName": "web", "ChangeSetName": "cs", "Changes": [], "NextToken": "page-2" }"#;
        let page = ChangesetParser::new().parse_page(json).unwrap();
        assert_eq!(page.next_token.as_deref(), Some("page-2"));
    }

    #[test]
    fn test_parse_list_page() {
        let json = r#"{
            "Summaries": [
                { "ChangeSetName": "older", "CreationTime": "2024-01-01T00:00:00Z", "Status": "CREATE_COMPLETE" },
                { "ChangeSetName": "newer", "CreationTime": "2024-02-01T00:00:00.000Z", "Status": "CREATE_PENDING" },
                { "CreationTime": "2024-03-01T00:00:00Z" }
            ]
        }"#;

        let page = ChangesetParser::new().parse_list_page(json).unwrap();
        assert_eq!(page.summaries.len(), 2);
        assert_eq!(page.summaries[1].change_set_name, "newer");
        assert!(page.summaries[1].creation_time > page.summaries[0].creation_time);
        assert!(page.next_token.is_none());
    }

    #[test]
    fn test_parse_timestamp_without_offset() {
        assert!(parse_timestamp("2024-05-01T12:30:00.123").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
