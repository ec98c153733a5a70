//! CloudFormation change set model and classification
//!
//! This module turns the JSON returned by `aws cloudformation describe-change-set`
//! into typed values and sorts each resource change into an impact category.
//!
//! # Example
//!
//! ```ignore
//! use crate::changeset::{classify, Category, ChangesetParser};
//!
//! let changeset = ChangesetParser::new().parse(&json)?;
//! let classification = classify(&changeset.changes);
//!
//! println!("{} replaced", classification.count(Category::Replaced));
//! ```

mod classifier;
mod parser;
mod types;

pub use classifier::{
    Category, Classification, categorize, classify, is_replacement_cause, replacement_causes,
};
pub use parser::{ChangeSetSummary, ChangesetParser};
pub use types::{Changeset, Evaluation, PropertyChangeDetail, RequiresRecreation, ResourceChange};

#[cfg(test)]
pub use types::{ChangeAction, ChangeSource, Replacement};
