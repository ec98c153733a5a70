//! Run configuration
//!
//! Settings come from an optional YAML defaults file merged with command-line
//! flags and their environment-variable fallbacks. Flags always win.
//!
//! The defaults file is looked up at:
//! 1. The path given with `--config`
//! 2. `./.changeset-report.yaml`
//! 3. `<config_dir>/changeset-report/config.yaml`

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{ReportError, ReportResult};
use crate::report::ReportFormat;
use crate::traits::FileSystem;

pub const LOCAL_CONFIG_FILE: &str = ".changeset-report.yaml";
pub const CONFIG_DIR_NAME: &str = "changeset-report";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// What to do when a stack has no change set to report on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoChangeSetPolicy {
    /// Fail the run
    Fail,
    /// Publish an informational report and succeed
    #[default]
    Report,
}

impl NoChangeSetPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoChangeSetPolicy::Fail => "fail",
            NoChangeSetPolicy::Report => "report",
        }
    }
}

impl FromStr for NoChangeSetPolicy {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail" | "error" => Ok(Self::Fail),
            "report" | "ignore" => Ok(Self::Report),
            other => Err(ReportError::Config(format!(
                "unknown missing change set policy '{}' (expected fail or report)",
                other
            ))),
        }
    }
}

impl fmt::Display for NoChangeSetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of the YAML defaults file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub stack_name: Option<String>,
    pub region: Option<String>,
    pub format: Option<String>,
    pub comment_on_pr: Option<bool>,
    pub delete_change_set: Option<bool>,
    pub on_missing: Option<NoChangeSetPolicy>,
    pub api_url: Option<String>,
}

impl ConfigFile {
    /// Parse a defaults file; an empty file yields all defaults
    pub fn parse(contents: &str) -> ReportResult<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(contents)?)
    }

    /// Locate and load the defaults file.
    ///
    /// An explicit path must exist; the implicit locations are optional.
    pub fn load(fs: &dyn FileSystem, explicit: Option<&Path>) -> ReportResult<Self> {
        let Some(path) = Self::locate(fs, explicit)? else {
            log::debug!("No configuration file found, using defaults");
            return Ok(Self::default());
        };

        log::debug!("Loading configuration from {:?}", path);

        let contents = fs
            .read_to_string(&path)
            .map_err(|e| ReportError::Config(format!("{:?}: {}", path, e)))?;

        Self::parse(&contents).map_err(|e| match e {
            ReportError::Config(msg) => ReportError::Config(format!("{:?}: {}", path, msg)),
            other => other,
        })
    }

    fn locate(fs: &dyn FileSystem, explicit: Option<&Path>) -> ReportResult<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !fs.exists(path) {
                return Err(ReportError::Config(format!(
                    "configuration file not found: {:?}",
                    path
                )));
            }
            return Ok(Some(path.to_path_buf()));
        }

        let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
        }

        Ok(candidates.into_iter().find(|path| fs.exists(path)))
    }
}

/// Settings given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ReportOverrides {
    pub stack_name: Option<String>,
    pub change_set_name: Option<String>,
    pub region: Option<String>,
    pub format: Option<String>,
    pub comment_on_pr: Option<bool>,
    pub pr_number: Option<u64>,
    pub delete_change_set: Option<bool>,
    pub on_missing: Option<NoChangeSetPolicy>,
    pub output_file: Option<PathBuf>,
    pub github_output: Option<PathBuf>,
    pub github_token: Option<String>,
    pub repository: Option<String>,
    pub api_url: Option<String>,
    pub event_path: Option<PathBuf>,
    pub git_ref: Option<String>,
}

/// Fully merged settings of a `report` run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub stack_name: String,
    pub change_set_name: Option<String>,
    pub region: Option<String>,
    pub format: ReportFormat,
    pub comment_on_pr: bool,
    pub pr_number: Option<u64>,
    pub delete_change_set: bool,
    pub on_missing: NoChangeSetPolicy,
    pub output_file: Option<PathBuf>,
    pub github_output: Option<PathBuf>,
    pub github_token: Option<String>,
    pub repository: Option<String>,
    pub api_url: String,
    pub event_path: Option<PathBuf>,
    pub git_ref: Option<String>,
}

impl ReportConfig {
    /// Merge flags over file defaults.
    ///
    /// Returns the config plus warnings for values that were replaced by a
    /// fallback.
    pub fn resolve(
        file: ConfigFile,
        overrides: ReportOverrides,
    ) -> ReportResult<(Self, Vec<String>)> {
        let mut warnings = Vec::new();

        let stack_name = non_empty(overrides.stack_name)
            .or(non_empty(file.stack_name))
            .ok_or_else(|| {
                ReportError::Config(
                    "stack name is required (--stack-name or STACK_NAME)".to_string(),
                )
            })?;

        let (format, format_warning) =
            resolve_format(overrides.format.as_deref(), file.format.as_deref());
        warnings.extend(format_warning);

        let config = Self {
            stack_name,
            change_set_name: non_empty(overrides.change_set_name),
            region: non_empty(overrides.region).or(non_empty(file.region)),
            format,
            comment_on_pr: overrides
                .comment_on_pr
                .or(file.comment_on_pr)
                .unwrap_or(false),
            pr_number: overrides.pr_number,
            delete_change_set: overrides
                .delete_change_set
                .or(file.delete_change_set)
                .unwrap_or(false),
            on_missing: overrides.on_missing.or(file.on_missing).unwrap_or_default(),
            output_file: overrides.output_file,
            github_output: overrides
                .github_output
                .filter(|path| !path.as_os_str().is_empty()),
            github_token: non_empty(overrides.github_token),
            repository: non_empty(overrides.repository),
            api_url: non_empty(overrides.api_url)
                .or(non_empty(file.api_url))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            event_path: overrides
                .event_path
                .filter(|path| !path.as_os_str().is_empty()),
            git_ref: non_empty(overrides.git_ref),
        };

        Ok((config, warnings))
    }
}

/// Pick the report format from a flag or the file default.
///
/// Unsupported names fall back to Markdown and produce a warning.
pub fn resolve_format(flag: Option<&str>, file: Option<&str>) -> (ReportFormat, Option<String>) {
    let Some(name) = flag.or(file).filter(|name| !name.trim().is_empty()) else {
        return (ReportFormat::default(), None);
    };

    match ReportFormat::parse_or_default(name) {
        (format, None) => (format, None),
        (format, Some(err)) => (format, Some(format!("{}, using {}", err, format))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
