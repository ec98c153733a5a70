use std::fmt;

/// Error types for change set reporting
#[derive(Debug)]
pub enum ReportError {
    /// Change set JSON could not be parsed or is missing identity fields
    MalformedInput(String),

    /// No change set exists for the stack and the run is configured to fail
    NoChangeSetAvailable { stack_name: String },

    /// Requested report format is not one of plain, ansi or markdown
    UnsupportedFormat(String),

    /// An `aws` CLI invocation failed
    ChangeSetFetch {
        command: String,
        message: String,
        exit_code: Option<i32>,
    },

    /// GitHub API call failed
    GithubApi(String),

    /// Configuration file parsing or validation error
    Config(String),

    /// General I/O error
    Io(std::io::Error),

    /// Serialization error
    Serialization(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::MalformedInput(msg) => {
                write!(f, "Malformed change set: {}", msg)
            }
            ReportError::NoChangeSetAvailable { stack_name } => {
                write!(f, "No change sets found for stack '{}'", stack_name)
            }
            ReportError::UnsupportedFormat(format) => {
                write!(
                    f,
                    "Unsupported report format '{}' (expected plain, ansi or markdown)",
                    format
                )
            }
            ReportError::ChangeSetFetch {
                command,
                message,
                exit_code,
            } => {
                write!(f, "Command 'aws cloudformation {}' failed", command)?;

                if let Some(code) = exit_code {
                    write!(f, " (exit code {})", code)?;
                }

                write!(f, ": {}", message)
            }
            ReportError::GithubApi(msg) => {
                write!(f, "GitHub API error: {}", msg)
            }
            ReportError::Config(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            ReportError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            ReportError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Io(err)
    }
}

impl From<serde_yaml::Error> for ReportError {
    fn from(err: serde_yaml::Error) -> Self {
        ReportError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        ReportError::GithubApi(err.to_string())
    }
}

/// Result type for reporting operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display_includes_exit_code() {
        let err = ReportError::ChangeSetFetch {
            command: "describe-change-set".to_string(),
            message: "AccessDenied".to_string(),
            exit_code: Some(254),
        };

        assert_eq!(
            err.to_string(),
            "Command 'aws cloudformation describe-change-set' failed (exit code 254): AccessDenied"
        );
    }

    #[test]
    fn test_no_change_set_display() {
        let err = ReportError::NoChangeSetAvailable {
            stack_name: "web".to_string(),
        };
        assert_eq!(err.to_string(), "No change sets found for stack 'web'");
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ReportError = json_err.into();
        assert!(matches!(err, ReportError::Serialization(_)));
    }
}
