mod aws;
mod changeset;
mod commands;
mod config;
mod context;
mod error;
mod github;
mod output;
mod report;
#[cfg(test)]
mod test_helpers;
mod traits;

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use commands::{RenderCommand, ReportCommand};
use config::{NoChangeSetPolicy, ReportOverrides};
use context::Context;

#[derive(Parser)]
#[command(name = "changeset-report")]
#[command(about = "Classify CloudFormation change sets by impact and render review reports", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a YAML file with default settings
    #[arg(long, global = true, env = "CHANGESET_REPORT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a stack's change set, render the report and publish it
    Report {
        /// CloudFormation stack name
        #[arg(short, long, env = "STACK_NAME")]
        stack_name: Option<String>,

        /// Change set to report on (defaults to the most recent one)
        #[arg(short, long, env = "CHANGE_SET_NAME")]
        change_set_name: Option<String>,

        /// AWS region passed to the aws CLI
        #[arg(long, env = "AWS_REGION")]
        region: Option<String>,

        /// Report format: plain, ansi or markdown
        #[arg(short, long, env = "REPORT_FORMAT")]
        format: Option<String>,

        /// Post the Markdown report as a pull request comment
        #[arg(long, env = "COMMENT_ON_PR", value_parser = BoolishValueParser::new())]
        comment_on_pr: Option<bool>,

        /// Pull request to comment on (defaults to the one of the workflow event)
        #[arg(long, env = "PR_NUMBER")]
        pr_number: Option<u64>,

        /// Delete the change set once the report is published
        #[arg(long, env = "DELETE_CHANGE_SET", value_parser = BoolishValueParser::new())]
        delete_change_set: Option<bool>,

        /// What to do when the stack has no change set: fail or report
        #[arg(long, env = "ON_MISSING_CHANGE_SET")]
        on_missing: Option<NoChangeSetPolicy>,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// GitHub Actions step output file
        #[arg(long, env = "GITHUB_OUTPUT", hide_env_values = true)]
        github_output: Option<PathBuf>,

        /// Token used to comment on pull requests
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        github_token: Option<String>,

        /// Repository in owner/repo form
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repository: Option<String>,

        /// GitHub API base URL
        #[arg(long, env = "GITHUB_API_URL")]
        api_url: Option<String>,

        /// Workflow event payload used to find the pull request
        #[arg(long, env = "GITHUB_EVENT_PATH", hide = true)]
        event_path: Option<PathBuf>,

        /// Git ref used to find the pull request
        #[arg(long, env = "GITHUB_REF", hide = true)]
        git_ref: Option<String>,
    },

    /// Render a saved describe-change-set JSON document
    Render {
        /// Path to the JSON document
        #[arg(short = 'i', long)]
        file: PathBuf,

        /// Report format: plain, ansi or markdown
        #[arg(short, long, env = "REPORT_FORMAT")]
        format: Option<String>,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let ctx = Context::new();

    match cli.command {
        Commands::Report {
            stack_name,
            change_set_name,
            region,
            format,
            comment_on_pr,
            pr_number,
            delete_change_set,
            on_missing,
            output,
            github_output,
            github_token,
            repository,
            api_url,
            event_path,
            git_ref,
        } => {
            let overrides = ReportOverrides {
                stack_name,
                change_set_name,
                region,
                format,
                comment_on_pr,
                pr_number,
                delete_change_set,
                on_missing,
                output_file: output,
                github_output,
                github_token,
                repository,
                api_url,
                event_path,
                git_ref,
            };
            ReportCommand::execute(&ctx, cli.config.as_deref(), overrides)?;
        }
        Commands::Render {
            file,
            format,
            output,
        } => {
            RenderCommand::execute(
                &ctx,
                &file,
                format.as_deref(),
                cli.config.as_deref(),
                output.as_deref(),
            )?;
        }
    }

    Ok(())
}
