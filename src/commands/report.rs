//! # Report Command Module / 报告命令模块
//!
//! Reports a test run that already happened, from a captured libtest JSON file.
//!
//! 根据捕获的 libtest JSON 文件报告已经完成的测试运行。

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Local};
use std::{fs, path::PathBuf, time::SystemTime};

use crate::{
    commands::{ReportingOptions, Session},
    infra::{libtest, t},
};

/// Executes the report command.
///
/// The run is considered to have finished when the results file was last
/// written. It started at `started_at`, or at the same instant when not given.
pub async fn execute(
    results: PathBuf,
    started_at: Option<DateTime<FixedOffset>>,
    options: ReportingOptions,
    locale: &str,
) -> Result<()> {
    let session = Session::prepare(&options, locale)?;

    println!(
        "{}",
        t!("report.loading_results", locale = locale, path = results.display())
    );
    let outcomes = libtest::read_outcomes(&results)?;

    let finished = fs::metadata(&results)
        .and_then(|meta| meta.modified())
        .unwrap_or_else(|_| SystemTime::now());
    let (start, end) = execution_window(finished, started_at);

    session.finish(&outcomes, start, end, locale).await?;
    Ok(())
}

/// Start and end of the reported run, both in the local timezone.
///
/// 报告运行的开始和结束时间，均为本地时区。
pub fn execution_window(
    finished: SystemTime,
    started_at: Option<DateTime<FixedOffset>>,
) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let end = DateTime::<Local>::from(finished).fixed_offset();
    let start = started_at
        .map(|ts| ts.with_timezone(&Local).fixed_offset())
        .unwrap_or(end);
    (start, end)
}
