use std::path::Path;

use anyhow::{Context as _, Result};

use crate::aws::{AwsCliChangeSetSource, ChangeSetSource, resolve_change_set};
use crate::changeset::{Changeset, classify};
use crate::config::{ConfigFile, NoChangeSetPolicy, ReportConfig, ReportOverrides};
use crate::context::Context;
use crate::error::ReportError;
use crate::github::{
    GithubCommenter, PullRequestCommenter, resolve_pull_request_number, write_step_outputs,
};
use crate::report::{self, ReportFormat, ReportOutputs};

/// Fetch a stack's change set, render it and publish the result
pub struct ReportCommand;

impl ReportCommand {
    /// Execute the report command
    pub fn execute(
        ctx: &Context,
        config_path: Option<&Path>,
        overrides: ReportOverrides,
    ) -> Result<()> {
        let file = ConfigFile::load(&*ctx.fs, config_path).context("Failed to load configuration")?;
        let (config, warnings) =
            ReportConfig::resolve(file, overrides).context("Invalid report settings")?;

        for warning in &warnings {
            ctx.output.warning(warning);
            log::warn!("{}", warning);
        }

        let source = AwsCliChangeSetSource::new(ctx.command.clone(), config.region.clone());

        let commenter = match Self::build_commenter(&config) {
            Ok(commenter) => commenter,
            Err(e) => {
                Self::partial_failure(ctx, &format!("Pull request comment skipped: {}", e));
                None
            }
        };

        let completed = Self::run(
            ctx,
            &config,
            &source,
            commenter.as_ref().map(|c| c as &dyn PullRequestCommenter),
        )?;

        if !completed || (config.comment_on_pr && commenter.is_none()) {
            ctx.output
                .warning("Report published with warnings (partial success)");
        }

        Ok(())
    }

    /// Run the pipeline against the given collaborators.
    ///
    /// Returns `false` when an optional step after publishing failed.
    pub fn run(
        ctx: &Context,
        config: &ReportConfig,
        source: &dyn ChangeSetSource,
        commenter: Option<&dyn PullRequestCommenter>,
    ) -> Result<bool> {
        let changeset = resolve_change_set(
            source,
            &config.stack_name,
            config.change_set_name.as_deref(),
        )
        .with_context(|| {
            format!(
                "Failed to fetch change set for stack '{}'",
                config.stack_name
            )
        })?;

        let (outputs, comment_body) = match &changeset {
            Some(changeset) => Self::render_change_set(changeset, config.format),
            None => Self::render_missing(config)?,
        };

        for line in outputs.report.lines() {
            ctx.output.line(line);
        }

        if let Some(path) = &config.output_file {
            ctx.fs
                .write(path, &outputs.report)
                .with_context(|| format!("Failed to write report to {:?}", path))?;
        }

        if let Some(path) = &config.github_output {
            write_step_outputs(&*ctx.fs, path, &outputs)
                .with_context(|| format!("Failed to write step outputs to {:?}", path))?;
        }

        let mut completed = true;

        if config.comment_on_pr
            && let Some(commenter) = commenter
        {
            completed &= Self::comment(ctx, config, commenter, &comment_body);
        }

        if config.delete_change_set
            && let Some(changeset) = &changeset
        {
            completed &= Self::delete(ctx, source, changeset);
        }

        Ok(completed)
    }

    /// Render the report and the Markdown comment body
    fn render_change_set(changeset: &Changeset, format: ReportFormat) -> (ReportOutputs, String) {
        let classification = classify(&changeset.changes);
        log::debug!(
            "Classified {} change(s) of change set {}",
            classification.total(),
            changeset.change_set_name
        );

        let report = report::render(changeset, &classification, format);
        let comment_body = if format == ReportFormat::Markdown {
            report.clone()
        } else {
            report::render(changeset, &classification, ReportFormat::Markdown)
        };

        (ReportOutputs::for_change_set(changeset, report), comment_body)
    }

    fn render_missing(config: &ReportConfig) -> Result<(ReportOutputs, String)> {
        if config.on_missing == NoChangeSetPolicy::Fail {
            return Err(ReportError::NoChangeSetAvailable {
                stack_name: config.stack_name.clone(),
            }
            .into());
        }

        log::info!("No change set for stack {}", config.stack_name);

        let report = report::render_no_change_set(&config.stack_name, config.format);
        let comment_body = report::render_no_change_set(&config.stack_name, ReportFormat::Markdown);

        Ok((ReportOutputs::for_missing_change_set(report), comment_body))
    }

    fn build_commenter(config: &ReportConfig) -> Result<Option<GithubCommenter>, ReportError> {
        if !config.comment_on_pr {
            return Ok(None);
        }

        let token = config.github_token.as_deref().ok_or_else(|| {
            ReportError::Config("GITHUB_TOKEN is required to comment".to_string())
        })?;
        let repository = config.repository.as_deref().ok_or_else(|| {
            ReportError::Config("GITHUB_REPOSITORY is required to comment".to_string())
        })?;

        GithubCommenter::new(&config.api_url, repository, token).map(Some)
    }

    fn comment(
        ctx: &Context,
        config: &ReportConfig,
        commenter: &dyn PullRequestCommenter,
        body: &str,
    ) -> bool {
        let Some(pr_number) = resolve_pull_request_number(
            &*ctx.fs,
            config.pr_number,
            config.event_path.as_deref(),
            config.git_ref.as_deref(),
        ) else {
            Self::partial_failure(
                ctx,
                "Pull request comment skipped: no pull request number (set --pr-number or PR_NUMBER)",
            );
            return false;
        };

        match commenter.post_comment(pr_number, body) {
            Ok(()) => {
                ctx.output
                    .success(&format!("Commented on pull request #{}", pr_number));
                true
            }
            Err(e) => {
                Self::partial_failure(
                    ctx,
                    &format!("Failed to comment on pull request #{}: {}", pr_number, e),
                );
                false
            }
        }
    }

    fn delete(ctx: &Context, source: &dyn ChangeSetSource, changeset: &Changeset) -> bool {
        match source.delete_change_set(&changeset.stack_name, &changeset.change_set_name) {
            Ok(()) => {
                ctx.output.success(&format!(
                    "Deleted change set {}",
                    changeset.change_set_name
                ));
                true
            }
            Err(e) => {
                Self::partial_failure(
                    ctx,
                    &format!(
                        "Failed to delete change set {}: {}",
                        changeset.change_set_name, e
                    ),
                );
                false
            }
        }
    }

    fn partial_failure(ctx: &Context, message: &str) {
        ctx.output.warning(message);
        log::warn!("{}", message);
    }
}
