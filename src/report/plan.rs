//! Format-independent structure of a report
//!
//! A [`ReportPlan`] holds everything a report shows (header, summary counts,
//! overview table and detail sections) as plain data. Each output format is a
//! renderer over the same plan, so classification and grouping happen once.

use crate::changeset::{
    Category, Changeset, Classification, Evaluation, PropertyChangeDetail, RequiresRecreation,
    ResourceChange, categorize, is_replacement_cause, replacement_causes,
};

use super::table::{Table, TableRow};

pub const REPORT_TITLE: &str = "CloudFormation Change Set Report";
pub const SUMMARY_TITLE: &str = "Change Summary";
pub const TABLE_TITLE: &str = "Resource Changes";
pub const NO_CHANGES: &str = "No changes detected.";
pub const IMPLICIT_REPLACEMENT: &str = "implicit replacement due to dependent resource changes";
pub const DELETION_WARNING: &str = "This resource will be permanently deleted.";

/// Identity and status of the change set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeader {
    pub stack_name: String,
    pub change_set_name: String,
    pub status: String,
    pub execution_status: String,
    pub creation_time: Option<String>,
}

impl ReportHeader {
    /// Label/value pairs shown under the title, skipping unknown values
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("Stack", self.stack_name.as_str()),
            ("Change set", self.change_set_name.as_str()),
        ];

        if !self.status.is_empty() {
            fields.push(("Status", self.status.as_str()));
        }

        if !self.execution_status.is_empty() {
            fields.push(("Execution status", self.execution_status.as_str()));
        }

        if let Some(created) = &self.creation_time {
            fields.push(("Created", created.as_str()));
        }

        fields
    }
}

/// One count line of the summary block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLine {
    pub category: Category,
    pub count: usize,
}

/// Why a replaced resource is recreated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonLine {
    /// A property change that requires recreation
    Property(PropertyLine),
    /// AWS flagged a replacement without naming a property
    Implicit,
}

impl ReasonLine {
    pub fn describe(&self) -> String {
        match self {
            ReasonLine::Property(property) => property.describe_reason(),
            ReasonLine::Implicit => IMPLICIT_REPLACEMENT.to_string(),
        }
    }
}

/// A property change as listed under a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLine {
    pub target: String,
    pub requires_recreation: RequiresRecreation,
    pub change_source: Option<String>,
    pub evaluation: Evaluation,
    pub causing_entity: Option<String>,
    pub is_replacement_cause: bool,
}

impl PropertyLine {
    fn from_detail(detail: &PropertyChangeDetail) -> Self {
        Self {
            target: detail.target(),
            requires_recreation: detail.requires_recreation,
            change_source: detail
                .change_source
                .as_ref()
                .map(|source| source.as_str().to_string()),
            evaluation: detail.evaluation,
            causing_entity: detail.causing_entity.clone(),
            is_replacement_cause: is_replacement_cause(detail),
        }
    }

    /// Attributes of the change, e.g. "recreation: Always, source: DirectModification"
    pub fn describe_attributes(&self) -> String {
        let mut parts = vec![format!("recreation: {}", self.requires_recreation.as_str())];

        if let Some(source) = &self.change_source {
            parts.push(format!("source: {}", source));
        }

        parts.push(format!("evaluation: {}", self.evaluation.as_str()));

        if let Some(entity) = &self.causing_entity {
            parts.push(format!("caused by: {}", entity));
        }

        parts.join(", ")
    }

    fn describe_reason(&self) -> String {
        let mut reason = match self.requires_recreation {
            RequiresRecreation::Never => format!("{} (dynamic evaluation)", self.target),
            requires => format!(
                "{} (requires recreation: {})",
                self.target,
                requires.as_str()
            ),
        };

        if let Some(entity) = &self.causing_entity {
            reason.push_str(&format!(" caused by {}", entity));
        }

        reason
    }
}

/// Detail block of one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBlock {
    /// 1-based position within its category
    pub position: usize,
    pub category: Category,
    pub logical_id: String,
    pub resource_type: String,
    pub physical_id: Option<String>,
    pub action: String,
    /// Present for replaced and modified resources only
    pub replacement: Option<String>,
    /// Present for replaced resources only
    pub replacement_reasons: Option<Vec<ReasonLine>>,
    pub property_changes: Vec<PropertyLine>,
    pub deletion_warning: bool,
}

impl ResourceBlock {
    fn build(position: usize, category: Category, change: &ResourceChange) -> Self {
        let replacement = match category {
            Category::Replaced | Category::ModifiedInPlace => {
                Some(change.replacement.display_value().to_string())
            }
            _ => None,
        };

        let replacement_reasons = (category == Category::Replaced).then(|| {
            let causes = replacement_causes(change);
            if causes.is_empty() {
                vec![ReasonLine::Implicit]
            } else {
                causes
                    .into_iter()
                    .map(|detail| ReasonLine::Property(PropertyLine::from_detail(detail)))
                    .collect()
            }
        });

        Self {
            position,
            category,
            logical_id: change.logical_id.clone(),
            resource_type: change.resource_type.clone(),
            physical_id: change.physical_id.clone(),
            action: change.action_label().to_string(),
            replacement,
            replacement_reasons,
            property_changes: change.details.iter().map(PropertyLine::from_detail).collect(),
            deletion_warning: category == Category::Removed,
        }
    }
}

/// All resources of one non-empty category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub category: Category,
    pub resources: Vec<ResourceBlock>,
}

/// Everything a report shows, independent of output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlan {
    pub header: ReportHeader,
    /// Always four lines, in summary order
    pub summary: Vec<SummaryLine>,
    /// `None` when the change set has no resource changes
    pub table: Option<Table>,
    pub sections: Vec<DetailSection>,
}

impl ReportPlan {
    pub fn build(changeset: &Changeset, classification: &Classification<'_>) -> Self {
        let header = ReportHeader {
            stack_name: changeset.stack_name.clone(),
            change_set_name: changeset.change_set_name.clone(),
            status: changeset.status.clone(),
            execution_status: changeset.execution_status.clone(),
            creation_time: changeset
                .creation_time
                .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        };

        let summary = Category::SUMMARY_ORDER
            .iter()
            .map(|category| SummaryLine {
                category: *category,
                count: classification.count(*category),
            })
            .collect();

        let table = changeset.has_changes().then(|| {
            let rows = changeset
                .changes
                .iter()
                .enumerate()
                .map(|(index, change)| TableRow {
                    index: index + 1,
                    category: classification
                        .category_of(index)
                        .unwrap_or_else(|| categorize(change)),
                    logical_id: change.logical_id.clone(),
                    resource_type: change.resource_type.clone(),
                    action: change.action_label().to_string(),
                    replacement: change.replacement.display_value().to_string(),
                })
                .collect();
            Table::new(rows)
        });

        let sections = Category::DETAIL_ORDER
            .iter()
            .filter(|category| classification.count(**category) > 0)
            .map(|category| DetailSection {
                category: *category,
                resources: classification
                    .group(*category)
                    .iter()
                    .enumerate()
                    .map(|(position, (_, change))| {
                        ResourceBlock::build(position + 1, *category, change)
                    })
                    .collect(),
            })
            .collect();

        Self {
            header,
            summary,
            table,
            sections,
        }
    }
}
