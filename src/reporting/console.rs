//! # Console Reporting Module / 控制台报告模块
//!
//! This module handles the display of execution reports in the console.
//! It provides functionality for printing colorful, formatted summaries with
//! internationalization support.
//!
//! 此模块处理控制台中执行报告的显示。
//! 它提供打印彩色格式化摘要的功能，支持国际化。

use colored::*;

use crate::core::{
    models::{OutcomePartitions, RollupStatus},
    report::ExecutionReport,
    reporter::Publication,
};
use crate::infra::t;

/// Prints a formatted summary of the per-requirement rollups.
///
/// 在控制台打印按需求汇总结果的格式化摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Xray Summary ---
///   - PASSED     | XMPL-123     | 2 passed, 0 failed, 1 skipped
///   - FAILED     | XMPL-124     | 0 passed, 1 failed, 0 skipped
/// ```
pub fn print_summary(report: &ExecutionReport, outcomes: &OutcomePartitions, locale: &str) {
    println!("\n{}", t!("summary.banner", locale = locale).bold());
    println!(
        "{}",
        t!(
            "summary.totals",
            locale = locale,
            passed = outcomes.passed.len(),
            failed = outcomes.failed.len(),
            skipped = outcomes.skipped.len()
        )
    );

    if report.rollups.is_empty() {
        println!("{}", t!("summary.no_bound_tests", locale = locale).dimmed());
        return;
    }

    for rollup in &report.rollups {
        let label = report.style.status_label(rollup.status);
        let status_colored = match rollup.status {
            RollupStatus::Pass => label.green(),
            RollupStatus::Fail => label.red(),
        };
        println!(
            "  - {:<10} | {:<16} | {}",
            status_colored,
            rollup.requirement_key,
            t!(
                "summary.counts",
                locale = locale,
                passed = rollup.counts.passed,
                failed = rollup.counts.failed,
                skipped = rollup.counts.skipped
            )
        );
    }
}

/// Prints what was sent to Xray and Jira.
///
/// 打印发送到 Xray 和 Jira 的内容。
pub fn print_publication(publication: &Publication, locale: &str) {
    if !publication.attempted {
        println!("\n{}", t!("publish.skipped", locale = locale).yellow());
        return;
    }

    match &publication.execution {
        Some(body) => println!(
            "\n{}\n{}",
            t!("publish.submitted", locale = locale).green(),
            serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
        ),
        None => println!("\n{}", t!("publish.no_response", locale = locale).yellow()),
    }

    if let Some(issue_id) = &publication.issue_id {
        println!("{}", t!("publish.issue", locale = locale, id = issue_id).cyan());
    }
    if publication.remote_link.is_some() {
        println!("{}", t!("publish.link_attached", locale = locale).cyan());
    }
}
