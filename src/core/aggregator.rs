//! # Outcome Aggregator Module / 结果聚合模块
//!
//! This module turns the flat list of per-test outcomes into one rollup per
//! Xray requirement key. Tests are bound to keys with [`OutcomeAggregator::record`]
//! while the run is in progress; [`OutcomeAggregator::build_report`] is called
//! once, after the last outcome is known.
//!
//! 此模块将扁平的逐测试结果列表转换为每个 Xray 需求键的一个汇总。
//! 运行期间通过 [`OutcomeAggregator::record`] 将测试绑定到键；
//! 在最后一个结果已知后，调用一次 [`OutcomeAggregator::build_report`]。

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use std::collections::HashMap;

use crate::core::{
    models::{
        BackendStyle, OutcomeCounts, OutcomePartitions, RequirementRollup, RollupStatus,
        TestOutcome, TestOutcomeRecord,
    },
    report::ExecutionReport,
};

/// Collects requirement bindings and builds the execution report.
///
/// 收集需求绑定并构建执行报告。
#[derive(Debug, Clone, Default)]
pub struct OutcomeAggregator {
    bindings: HashMap<String, String>,
}

impl OutcomeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a test to a requirement key. Binding a test twice keeps the last key.
    /// Does nothing when the test declares no key.
    ///
    /// 将测试绑定到需求键。重复绑定时保留最后一个键。
    /// 当测试没有声明键时不执行任何操作。
    pub fn record(&mut self, identifier: impl Into<String>, requirement_key: Option<String>) {
        if let Some(key) = requirement_key {
            self.bindings.insert(identifier.into(), key);
        }
    }

    /// The requirement key currently bound to `identifier`, if any.
    pub fn binding_for(&self, identifier: &str) -> Option<&str> {
        self.bindings.get(identifier).map(String::as_str)
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Builds the execution report for the whole run.
    ///
    /// Records whose test has no binding are dropped. The remaining records
    /// are grouped by requirement key, in the order keys are first met while
    /// walking the passed, failed and skipped partitions.
    ///
    /// 构建整个运行的执行报告。
    ///
    /// 没有绑定的测试记录会被丢弃。其余记录按需求键分组，
    /// 分组顺序为遍历通过、失败、跳过分区时首次遇到键的顺序。
    pub fn build_report(
        &self,
        outcomes: &OutcomePartitions,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        plan_key: Option<&str>,
        style: BackendStyle,
    ) -> ExecutionReport {
        let mut groups: IndexMap<&str, Vec<&TestOutcomeRecord>> = IndexMap::new();
        for record in outcomes.iter() {
            let Some(key) = self.binding_for(&record.identifier) else {
                continue;
            };
            groups.entry(key).or_default().push(record);
        }

        let rollups = groups
            .into_iter()
            .map(|(key, members)| rollup(key, &members, style))
            .collect();

        ExecutionReport {
            summary: format!("Test execution of plan {}", plan_key.unwrap_or_default()),
            start,
            end,
            plan_key: plan_key.map(str::to_string),
            style,
            rollups,
        }
    }
}

fn rollup(key: &str, members: &[&TestOutcomeRecord], style: BackendStyle) -> RequirementRollup {
    let mut status = RollupStatus::Pass;
    let mut counts = OutcomeCounts::default();
    let mut lines = Vec::with_capacity(members.len() + 1);

    for member in members {
        if status == RollupStatus::Pass && member.outcome == TestOutcome::Failed {
            status = RollupStatus::Fail;
        }
        counts.add(member.outcome);
        lines.push(format!("{}: {}", member.outcome.upper(), member.identifier));
        if member.outcome == TestOutcome::Failed {
            lines.push(member.detail.clone().unwrap_or_default());
        }
    }

    let total = counts.total();
    let header = [
        stat(style.passed_label(), counts.passed, total),
        stat(style.failed_label(), counts.failed, total),
        stat(style.skipped_label(), counts.skipped, total),
    ]
    .join("   ");

    let mut narrative = Vec::with_capacity(lines.len() + 1);
    narrative.push(header);
    narrative.extend(lines);

    RequirementRollup {
        requirement_key: key.to_string(),
        status,
        counts,
        narrative,
    }
}

fn stat(label: &str, count: usize, total: usize) -> String {
    format!("{label}: {count} ({}%)", format_percentage(count, total))
}

/// Formats `count / total * 100` rounded to two decimals, keeping at least one
/// fractional digit (`50.0`, `33.33`, `12.5`). Exact ties round to even (`3.125` -> `3.12`).
///
/// 格式化 `count / total * 100`，四舍五入到两位小数，至少保留一位小数。
pub fn format_percentage(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    let mut text = format!("{:.2}", count as f64 / total as f64 * 100.0);
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.push('0');
    }
    text
}
