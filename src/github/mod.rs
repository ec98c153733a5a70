//! GitHub Actions integration
//!
//! Publishes a finished report to the surrounding workflow: step outputs in
//! the `GITHUB_OUTPUT` file and, optionally, a pull request comment.

mod comment;
mod outputs;
mod pull_request;

pub use comment::{GithubCommenter, PullRequestCommenter};
pub use outputs::write_step_outputs;
pub use pull_request::resolve_pull_request_number;

#[cfg(test)]
pub use comment::MockCommenter;
