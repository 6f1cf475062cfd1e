//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command: it spawns the test command,
//! records every outcome from its libtest JSON output and reports the run to
//! Xray once the command has exited.
//!
//! 此模块实现了 `run` 命令：派生测试命令，从其 libtest JSON 输出中记录每个结果，
//! 并在命令退出后向 Xray 报告本次运行。

use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use std::{fs, path::Path, path::PathBuf};

use crate::{
    commands::{ReportingOptions, Session},
    infra::{command, libtest, runconfig::RUNCONFIG_ENV, t},
};

/// Executes the run command with the provided arguments.
///
/// # Arguments
/// * `command_line` - The test command, e.g. `cargo test -- -Z unstable-options --format json`
/// * `project_dir` - Directory the test command runs in
/// * `options` - Reporting options shared with the `report` command
/// * `locale` - Language of the console output
///
/// # Returns
/// An error if the configuration is invalid, if reporting failed outside of
/// fail-silently mode, or if the test command itself failed.
pub async fn execute(
    command_line: String,
    project_dir: PathBuf,
    options: ReportingOptions,
    locale: &str,
) -> Result<()> {
    let session = Session::prepare(&options, locale)?;

    let project_root = fs::canonicalize(&project_dir).with_context(|| {
        t!("project_dir_not_found", locale = locale, path = project_dir.display()).to_string()
    })?;
    println!(
        "{}",
        t!("project_root_detected", locale = locale, path = project_root.display())
    );

    // Parameters travel to the tests as an absolute path, the tests run elsewhere.
    let run_config = session
        .parameters
        .as_ref()
        .and_then(|parameters| parameters.path())
        .map(fs::canonicalize)
        .transpose()
        .context("Failed to resolve run configuration path")?;
    let envs = run_config
        .as_deref()
        .map(|path| (RUNCONFIG_ENV, path))
        .into_iter()
        .collect::<Vec<(&str, &Path)>>();

    let cmd = command::build_command(&command_line, &project_root, envs)?;

    println!(
        "{} {}",
        t!("run.command_prefix", locale = locale).blue(),
        command_line
    );

    let start = Local::now().fixed_offset();
    let (status_res, stdout) = command::spawn_and_capture(cmd).await;
    let status = status_res.with_context(|| {
        t!("run.spawn_failed", locale = locale, command = &command_line).to_string()
    })?;
    let end = Local::now().fixed_offset();

    let outcomes = libtest::parse_outcomes(&stdout);
    if outcomes.is_empty() {
        println!("{}", t!("run.no_events", locale = locale).yellow());
    }

    session.finish(&outcomes, start, end, locale).await?;

    if !status.success() {
        anyhow::bail!(t!("run.tests_failed", locale = locale, status = status).to_string());
    }
    if outcomes.has_failures() {
        anyhow::bail!(
            t!("run.failures_detected", locale = locale, count = outcomes.failed.len()).to_string()
        );
    }
    println!("\n{}", t!("all_tests_passed", locale = locale).green().bold());
    Ok(())
}
