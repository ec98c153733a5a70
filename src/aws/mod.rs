//! Change set retrieval from AWS CloudFormation
//!
//! The report core only needs a described [`Changeset`](crate::changeset::Changeset).
//! This module finds which change set to describe and fetches it by running the
//! `aws` CLI, which also takes care of credentials and endpoint resolution.

mod source;

pub use source::{AwsCliChangeSetSource, ChangeSetSource, resolve_change_set};
