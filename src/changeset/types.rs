//! Data types for CloudFormation change sets
//!
//! These are the domain types the classifier and the report renderers work on.
//! Optional fields of the AWS response are turned into explicit defaults when
//! parsing, so nothing downstream needs to check for missing values.

use chrono::{DateTime, Utc};
use std::fmt;

/// The mutation a resource change would perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    /// Resource will be created
    Add,
    /// Resource will be updated (in place or through replacement)
    Modify,
    /// Resource will be deleted
    Remove,
    /// Existing resource will be imported into the stack
    Import,
    /// Change is only known once the stack is deployed
    Dynamic,
}

impl ChangeAction {
    /// Parse the `Action` value returned by the API
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Add" => Some(Self::Add),
            "Modify" => Some(Self::Modify),
            "Remove" => Some(Self::Remove),
            "Import" => Some(Self::Import),
            "Dynamic" => Some(Self::Dynamic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Add => "Add",
            ChangeAction::Modify => "Modify",
            ChangeAction::Remove => "Remove",
            ChangeAction::Import => "Import",
            ChangeAction::Dynamic => "Dynamic",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether applying the change destroys and recreates the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Replacement {
    True,
    False,
    Conditional,
    /// Not reported (always the case for removals)
    #[default]
    Unset,
}

impl Replacement {
    pub fn parse(value: &str) -> Self {
        match value {
            "True" => Self::True,
            "False" => Self::False,
            "Conditional" => Self::Conditional,
            _ => Self::Unset,
        }
    }

    /// True when the resource will (or may) be recreated
    pub fn is_replacing(&self) -> bool {
        matches!(self, Replacement::True | Replacement::Conditional)
    }

    /// Text shown in tables and detail lines
    pub fn display_value(&self) -> &'static str {
        match self {
            Replacement::True => "True",
            Replacement::False => "False",
            Replacement::Conditional => "Conditional",
            Replacement::Unset => "N/A",
        }
    }
}

/// Whether a property change forces recreation of the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequiresRecreation {
    #[default]
    Never,
    Always,
    Conditionally,
}

impl RequiresRecreation {
    pub fn parse(value: &str) -> Self {
        match value {
            "Always" => Self::Always,
            "Conditionally" => Self::Conditionally,
            _ => Self::Never,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequiresRecreation::Never => "Never",
            RequiresRecreation::Always => "Always",
            RequiresRecreation::Conditionally => "Conditionally",
        }
    }
}

/// What triggered a property-level change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
    DirectModification,
    ParameterReference,
    ResourceReference,
    ResourceAttribute,
    Automatic,
    /// Any source this tool does not know about yet
    Other(String),
}

impl ChangeSource {
    pub fn parse(value: &str) -> Self {
        match value {
            "DirectModification" => Self::DirectModification,
            "ParameterReference" => Self::ParameterReference,
            "ResourceReference" => Self::ResourceReference,
            "ResourceAttribute" => Self::ResourceAttribute,
            "Automatic" => Self::Automatic,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChangeSource::DirectModification => "DirectModification",
            ChangeSource::ParameterReference => "ParameterReference",
            ChangeSource::ResourceReference => "ResourceReference",
            ChangeSource::ResourceAttribute => "ResourceAttribute",
            ChangeSource::Automatic => "Automatic",
            ChangeSource::Other(value) => value,
        }
    }
}

/// Whether the change could be fully evaluated when the change set was created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Evaluation {
    #[default]
    Static,
    Dynamic,
}

impl Evaluation {
    pub fn parse(value: &str) -> Self {
        match value {
            "Dynamic" => Self::Dynamic,
            _ => Self::Static,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Evaluation::Static => "Static",
            Evaluation::Dynamic => "Dynamic",
        }
    }
}

/// One property-level contribution to a resource change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChangeDetail {
    /// Name of the property (absent for attribute-wide changes such as Tags)
    pub property_name: Option<String>,

    /// Attribute group (e.g., "Properties", "Metadata", "Tags")
    pub attribute: String,

    /// Whether the change forces resource recreation
    pub requires_recreation: RequiresRecreation,

    /// What caused this change
    pub change_source: Option<ChangeSource>,

    /// Static or dynamic evaluation
    pub evaluation: Evaluation,

    /// Parameter or resource that triggered the change, when reported
    pub causing_entity: Option<String>,
}

#[cfg(test)]
impl PropertyChangeDetail {
    /// Create a detail for the given attribute with default flags
    pub fn new(attribute: &str) -> Self {
        Self {
            property_name: None,
            attribute: attribute.to_string(),
            requires_recreation: RequiresRecreation::Never,
            change_source: None,
            evaluation: Evaluation::Static,
            causing_entity: None,
        }
    }

    pub fn with_property_name(mut self, name: &str) -> Self {
        self.property_name = Some(name.to_string());
        self
    }

    pub fn with_requires_recreation(mut self, requires: RequiresRecreation) -> Self {
        self.requires_recreation = requires;
        self
    }

    pub fn with_change_source(mut self, source: ChangeSource) -> Self {
        self.change_source = Some(source);
        self
    }

    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn with_causing_entity(mut self, entity: &str) -> Self {
        self.causing_entity = Some(entity.to_string());
        self
    }
}

impl PropertyChangeDetail {
    /// Dotted path of the changed property, e.g. "Properties.BucketName"
    pub fn target(&self) -> String {
        match &self.property_name {
            Some(name) => format!("{}.{}", self.attribute, name),
            None => self.attribute.clone(),
        }
    }
}

/// A single resource's proposed change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceChange {
    /// Template-scoped identifier (e.g., "AssetsBucket")
    pub logical_id: String,

    /// Provider-assigned identifier, absent for new resources
    pub physical_id: Option<String>,

    /// Resource type (e.g., "AWS::S3::Bucket")
    pub resource_type: String,

    /// Action to perform; `None` when the API reported nothing usable
    pub action: Option<ChangeAction>,

    /// Replacement indicator
    pub replacement: Replacement,

    /// Property-level changes, in API order
    pub details: Vec<PropertyChangeDetail>,
}

#[cfg(test)]
impl ResourceChange {
    /// Create a resource change with no replacement information and no details
    pub fn new(logical_id: &str, resource_type: &str, action: ChangeAction) -> Self {
        Self {
            logical_id: logical_id.to_string(),
            physical_id: None,
            resource_type: resource_type.to_string(),
            action: Some(action),
            replacement: Replacement::Unset,
            details: Vec::new(),
        }
    }

    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    pub fn with_physical_id(mut self, physical_id: &str) -> Self {
        self.physical_id = Some(physical_id.to_string());
        self
    }

    pub fn with_detail(mut self, detail: PropertyChangeDetail) -> Self {
        self.details.push(detail);
        self
    }
}

impl ResourceChange {
    /// Action text shown in reports ("N/A" when unknown)
    pub fn action_label(&self) -> &'static str {
        self.action.map(|action| action.as_str()).unwrap_or("N/A")
    }
}

/// A described change set, the unit processed end to end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changeset {
    pub stack_name: String,
    pub change_set_name: String,
    pub change_set_id: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub execution_status: String,
    pub creation_time: Option<DateTime<Utc>>,

    /// Resource changes in API order
    pub changes: Vec<ResourceChange>,
}

#[cfg(test)]
impl Changeset {
    /// Create an empty change set for the given stack
    pub fn new(stack_name: &str, change_set_name: &str) -> Self {
        Self {
            stack_name: stack_name.to_string(),
            change_set_name: change_set_name.to_string(),
            change_set_id: None,
            description: None,
            status: String::new(),
            execution_status: String::new(),
            creation_time: None,
            changes: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: &str, execution_status: &str) -> Self {
        self.status = status.to_string();
        self.execution_status = execution_status.to_string();
        self
    }

    pub fn with_change(mut self, change: ResourceChange) -> Self {
        self.changes.push(change);
        self
    }
}

impl Changeset {
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_action_parse() {
        assert_eq!(ChangeAction::parse("Add"), Some(ChangeAction::Add));
        assert_eq!(ChangeAction::parse("Remove"), Some(ChangeAction::Remove));
        assert_eq!(ChangeAction::parse("Dynamic"), Some(ChangeAction::Dynamic));
        assert_eq!(ChangeAction::parse("Explode"), None);
    }

    #[test]
    fn test_replacement_defaults_to_unset() {
        assert_eq!(Replacement::parse("Maybe"), Replacement::Unset);
        assert_eq!(Replacement::default(), Replacement::Unset);
        assert_eq!(Replacement::Unset.display_value(), "N/A");
        assert!(Replacement::Conditional.is_replacing());
        assert!(!Replacement::False.is_replacing());
    }

    #[test]
    fn test_change_source_keeps_unknown_values() {
        assert_eq!(
            ChangeSource::parse("ParameterReference"),
            ChangeSource::ParameterReference
        );
        let other = ChangeSource::parse("NewKindOfSource");
        assert_eq!(other.as_str(), "NewKindOfSource");
    }

    #[test]
    fn test_detail_target() {
        let detail = PropertyChangeDetail::new("Properties").with_property_name("BucketName");
        assert_eq!(detail.target(), "Properties.BucketName");

        let tags = PropertyChangeDetail::new("Tags");
        assert_eq!(tags.target(), "Tags");
    }

    #[test]
    fn test_action_label_without_action() {
        let mut change = ResourceChange::new("Queue", "AWS::SQS::Queue", ChangeAction::Modify);
        assert_eq!(change.action_label(), "Modify");

        change.action = None;
        assert_eq!(change.action_label(), "N/A");
    }
}
