use std::path::Path;

use anyhow::{Context as _, Result};

use crate::changeset::{ChangesetParser, classify};
use crate::config::{ConfigFile, resolve_format};
use crate::context::Context;
use crate::report;

/// Render a saved `describe-change-set` JSON document
pub struct RenderCommand;

impl RenderCommand {
    /// Execute the render command
    pub fn execute(
        ctx: &Context,
        file: &Path,
        format: Option<&str>,
        config_path: Option<&Path>,
        output_file: Option<&Path>,
    ) -> Result<()> {
        let defaults = ConfigFile::load(&*ctx.fs, config_path).context("Failed to load configuration")?;

        let (format, warning) = resolve_format(format, defaults.format.as_deref());
        if let Some(warning) = warning {
            ctx.output.warning(&warning);
            log::warn!("{}", warning);
        }

        let contents = ctx
            .fs
            .read_to_string(file)
            .with_context(|| format!("Failed to read change set file {:?}", file))?;

        let changeset = ChangesetParser::new()
            .parse(&contents)
            .with_context(|| format!("Failed to parse change set file {:?}", file))?;

        let classification = classify(&changeset.changes);
        let rendered = report::render(&changeset, &classification, format);

        for line in rendered.lines() {
            ctx.output.line(line);
        }

        if let Some(path) = output_file {
            ctx.fs
                .write(path, &rendered)
                .with_context(|| format!("Failed to write report to {:?}", path))?;
        }

        Ok(())
    }
}
