use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

use crate::error::{ReportError, ReportResult};

/// Posts comments on pull requests
pub trait PullRequestCommenter {
    fn post_comment(&self, pr_number: u64, body: &str) -> ReportResult<()>;
}

/// Issue comments endpoint for a pull request
pub fn comment_url(api_url: &str, repository: &str, pr_number: u64) -> String {
    format!(
        "{}/repos/{}/issues/{}/comments",
        api_url.trim_end_matches('/'),
        repository,
        pr_number
    )
}

/// Commenter using the GitHub REST API
pub struct GithubCommenter {
    client: Client,
    api_url: String,
    repository: String,
    token: String,
}

impl GithubCommenter {
    /// Create a commenter for an `owner/repo` repository
    pub fn new(api_url: &str, repository: &str, token: &str) -> ReportResult<Self> {
        let valid = repository
            .split_once('/')
            .is_some_and(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'));

        if !valid {
            return Err(ReportError::Config(format!(
                "repository must be in owner/repo form, got '{}'",
                repository
            )));
        }

        Ok(Self {
            client: Client::new(),
            api_url: api_url.to_string(),
            repository: repository.to_string(),
            token: token.to_string(),
        })
    }
}

impl PullRequestCommenter for GithubCommenter {
    fn post_comment(&self, pr_number: u64, body: &str) -> ReportResult<()> {
        let url = comment_url(&self.api_url, &self.repository, pr_number);
        let payload = serde_json::to_string(&serde_json::json!({ "body": body }))?;

        log::debug!("Posting comment to {}", url);

        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, concat!("changeset-report/", env!("CARGO_PKG_VERSION")))
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(ReportError::GithubApi(format!(
                "POST {} returned {}: {}",
                url,
                status,
                text.trim()
            )));
        }

        Ok(())
    }
}

/// Mock commenter recording posted comments
#[cfg(test)]
pub struct MockCommenter {
    comments: std::sync::Mutex<Vec<(u64, String)>>,
    failure: Option<String>,
}

#[cfg(test)]
impl MockCommenter {
    pub fn new() -> Self {
        Self {
            comments: std::sync::Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// A commenter whose every call fails with the given message
    pub fn failing(message: &str) -> Self {
        Self {
            comments: std::sync::Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn comments(&self) -> Vec<(u64, String)> {
        self.comments.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl PullRequestCommenter for MockCommenter {
    fn post_comment(&self, pr_number: u64, body: &str) -> ReportResult<()> {
        if let Some(message) = &self.failure {
            return Err(ReportError::GithubApi(message.clone()));
        }

        self.comments
            .lock()
            .unwrap()
            .push((pr_number, body.to_string()));
        Ok(())
    }
}
