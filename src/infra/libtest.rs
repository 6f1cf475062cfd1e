//! # Libtest Event Reader / Libtest 事件读取器
//!
//! Reads the JSON event stream produced by the libtest harness
//! (`cargo test -- -Z unstable-options --format json`) or by
//! `cargo nextest run --message-format libtest-json`.
//!
//! 读取 libtest 测试框架产生的 JSON 事件流。

use serde::Deserialize;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::models::{OutcomePartitions, TestOutcomeRecord};

/// A single line of the libtest JSON stream. Only the fields we use are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct LibtestEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub event: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Captured output of a failed test (stdout and stderr combined).
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LibtestEvent {
    /// Converts a terminal `test` event into an outcome record.
    /// `started` and `timeout` events, and suite or bench events, yield `None`.
    ///
    /// 将终止的 `test` 事件转换为结果记录。
    pub fn into_record(self) -> Option<TestOutcomeRecord> {
        if self.kind != "test" {
            return None;
        }
        let name = self.name?;
        match self.event.as_str() {
            "ok" => Some(TestOutcomeRecord::passed(name)),
            "ignored" => Some(TestOutcomeRecord::skipped(name)),
            "failed" => {
                let detail = self
                    .stdout
                    .filter(|s| !s.trim().is_empty())
                    .or(self.message)
                    .unwrap_or_default();
                Some(TestOutcomeRecord::failed(name, detail.trim_end().to_string()))
            }
            _ => None,
        }
    }
}

/// Parses one line, returning `None` for anything that is not a terminal test event.
pub fn parse_line(line: &str) -> Option<TestOutcomeRecord> {
    let line = line.trim();
    if !line.starts_with('{') {
        return None;
    }
    serde_json::from_str::<LibtestEvent>(line)
        .ok()
        .and_then(LibtestEvent::into_record)
}

/// Parses a whole libtest JSON stream. Lines that are not JSON (build output,
/// `println!` from tests) are ignored.
///
/// 解析整个 libtest JSON 流。非 JSON 行（构建输出、测试中的 `println!`）会被忽略。
pub fn parse_outcomes(output: &str) -> OutcomePartitions {
    output.lines().filter_map(parse_line).collect()
}

/// Reads a captured libtest JSON stream from disk.
pub fn read_outcomes(path: &Path) -> Result<OutcomePartitions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read test results: {}", path.display()))?;
    Ok(parse_outcomes(&content))
}
