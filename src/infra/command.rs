//! # Command Execution Module / 命令执行模块
//!
//! Spawns the user's test command and captures the libtest JSON stream it
//! writes to stdout, while forwarding its stderr to ours.
//!
//! 派生用户的测试命令并捕获其写入 stdout 的 libtest JSON 流，
//! 同时将其 stderr 转发到我们的 stderr。

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::infra::t;

/// Builds the test command from a shell-like command line.
/// Environment variables and `~` are expanded before the line is split.
///
/// # Arguments
/// * `command_line` - e.g. `cargo test -- -Z unstable-options --format json`
/// * `project_dir` - working directory of the spawned process
/// * `envs` - extra environment variables for the spawned process
///
/// 根据类 shell 命令行构建测试命令。在拆分命令行之前会展开环境变量和 `~`。
pub fn build_command<'a>(
    command_line: &str,
    project_dir: &Path,
    envs: impl IntoIterator<Item = (&'a str, &'a Path)>,
) -> Result<tokio::process::Command> {
    let expanded = shellexpand::full(command_line)
        .with_context(|| format!("Failed to expand command: {command_line}"))?
        .to_string();

    let parts = shlex::split(&expanded)
        .ok_or_else(|| anyhow::anyhow!("Failed to parse command: {}", expanded))?;

    let Some((program, args)) = parts.split_first() else {
        anyhow::bail!("Empty command after parsing.");
    };

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args).kill_on_drop(true).current_dir(project_dir);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    Ok(cmd)
}

/// Spawns a command, capturing its stdout while forwarding stderr line by line.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The captured stdout as a `String`.
///
/// 派生一个命令，捕获其 stdout，同时逐行转发 stderr。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<ExitStatus>, String) {
    let mut child = match cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn() {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return (
            Err(std::io::Error::other(t!("run.capture_failed").to_string())),
            String::new(),
        );
    };

    let stdout_handle = tokio::spawn(async move {
        let mut captured = String::new();
        let mut reader = BufReader::new(stdout);
        while let Some(line) = next_line(&mut reader, "stdout").await {
            captured.push_str(&line);
            captured.push('\n');
        }
        captured
    });

    let stderr_handle = tokio::spawn(async move {
        let mut reader = BufReader::new(stderr);
        while let Some(line) = next_line(&mut reader, "stderr").await {
            eprintln!("{line}");
        }
    });

    let status = child.wait().await;

    let captured = match stdout_handle.await {
        Ok(captured) => captured,
        Err(e) => {
            tracing::warn!("failed to join stdout task: {e}");
            String::new()
        }
    };
    if let Err(e) = stderr_handle.await {
        tracing::warn!("failed to join stderr task: {e}");
    }

    (status, captured)
}

/// Reads one line, replacing invalid UTF-8 instead of giving up on the stream.
async fn next_line<R>(reader: &mut R, stream: &str) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    match reader.read_until(b'\n', &mut buf).await {
        Ok(0) => None,
        Ok(_) => {
            let line = String::from_utf8_lossy(&buf);
            Some(line.trim_end_matches(['\n', '\r']).to_string())
        }
        Err(e) => {
            tracing::warn!("failed to read test command {stream}: {e}");
            None
        }
    }
}
