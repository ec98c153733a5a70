use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::traits::FileSystem;

lazy_static! {
    static ref PULL_REQUEST_REF: Regex =
        Regex::new(r"^refs/pull/(\d+)/").expect("pull request ref pattern is valid");
}

/// Pull request number from a `GITHUB_REF` such as `refs/pull/42/merge`
pub fn number_from_ref(git_ref: &str) -> Option<u64> {
    PULL_REQUEST_REF
        .captures(git_ref)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Pull request number from a workflow event payload
pub fn number_from_event(payload: &str) -> Option<u64> {
    let event: Value = serde_json::from_str(payload).ok()?;

    event
        .pointer("/pull_request/number")
        .or_else(|| event.get("number"))
        .and_then(Value::as_u64)
}

/// Find the pull request a run belongs to.
///
/// An explicit number wins, then the event payload, then the git ref.
pub fn resolve_pull_request_number(
    fs: &dyn FileSystem,
    explicit: Option<u64>,
    event_path: Option<&Path>,
    git_ref: Option<&str>,
) -> Option<u64> {
    if explicit.is_some() {
        return explicit;
    }

    if let Some(path) = event_path {
        match fs.read_to_string(path) {
            Ok(payload) => {
                if let Some(number) = number_from_event(&payload) {
                    return Some(number);
                }
            }
            Err(e) => log::debug!("Could not read event payload {:?}: {}", path, e),
        }
    }

    git_ref.and_then(number_from_ref)
}
