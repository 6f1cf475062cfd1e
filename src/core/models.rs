//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the runner.
//! It includes models for individual test outcomes, the outcome partitions
//! handed to the aggregator, per-requirement rollups and the label vocabulary
//! of the two Xray backends.
//!
//! 此模块定义了整个运行器中使用的核心数据结构。
//! 它包括单个测试结果、交给聚合器的结果分区、按需求汇总的结果
//! 以及两种 Xray 后端的标签词汇表。

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of a single executed test case.
/// 单个已执行测试用例的结果。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    /// The test passed. / 测试通过。
    Passed,
    /// The test failed. / 测试失败。
    Failed,
    /// The test was ignored by the harness. / 测试被测试框架忽略。
    Skipped,
}

impl TestOutcome {
    /// Lower-case name, as the harness reports it.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "passed",
            TestOutcome::Failed => "failed",
            TestOutcome::Skipped => "skipped",
        }
    }

    /// Upper-case name used in rollup narratives (`PASSED`, `FAILED`, `SKIPPED`).
    pub fn upper(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "PASSED",
            TestOutcome::Failed => "FAILED",
            TestOutcome::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record per executed test case.
///
/// 每个已执行的测试用例对应一条记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcomeRecord {
    /// Name uniquely identifying the test within the run (e.g. `auth::tests::login`).
    /// 在本次运行中唯一标识测试的名称（例如 `auth::tests::login`）。
    pub identifier: String,
    pub outcome: TestOutcome,
    /// Failure description. Only present for failed tests.
    /// 失败描述。仅在测试失败时存在。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl TestOutcomeRecord {
    pub fn passed(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            outcome: TestOutcome::Passed,
            detail: None,
        }
    }

    pub fn failed(identifier: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            outcome: TestOutcome::Failed,
            detail: Some(detail.into()),
        }
    }

    pub fn skipped(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            outcome: TestOutcome::Skipped,
            detail: None,
        }
    }
}

/// Outcomes of a whole run, partitioned by kind.
/// Within a partition, records keep the order in which the harness reported them.
///
/// 整个运行的结果，按类型分区。
/// 在每个分区内，记录保持测试框架报告它们的顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomePartitions {
    pub passed: Vec<TestOutcomeRecord>,
    pub failed: Vec<TestOutcomeRecord>,
    pub skipped: Vec<TestOutcomeRecord>,
}

impl OutcomePartitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes a record into the partition matching its outcome.
    pub fn push(&mut self, record: TestOutcomeRecord) {
        match record.outcome {
            TestOutcome::Passed => self.passed.push(record),
            TestOutcome::Failed => self.failed.push(record),
            TestOutcome::Skipped => self.skipped.push(record),
        }
    }

    /// Iterates passed, then failed, then skipped records.
    pub fn iter(&self) -> impl Iterator<Item = &TestOutcomeRecord> {
        self.passed
            .iter()
            .chain(self.failed.iter())
            .chain(self.skipped.iter())
    }

    pub fn len(&self) -> usize {
        self.passed.len() + self.failed.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl FromIterator<TestOutcomeRecord> for OutcomePartitions {
    fn from_iter<I: IntoIterator<Item = TestOutcomeRecord>>(iter: I) -> Self {
        let mut partitions = OutcomePartitions::new();
        for record in iter {
            partitions.push(record);
        }
        partitions
    }
}

/// Aggregated status of a requirement.
/// 需求的聚合状态。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum RollupStatus {
    Pass,
    Fail,
}

/// Number of bound tests per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl OutcomeCounts {
    pub fn add(&mut self, outcome: TestOutcome) {
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
            TestOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

/// The aggregated result of every test bound to a single requirement key.
///
/// 绑定到单个需求键的所有测试的聚合结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementRollup {
    /// Xray issue key of the test or requirement (e.g. `XMPL-123`).
    /// 测试或需求的 Xray 问题键（例如 `XMPL-123`）。
    pub requirement_key: String,
    pub status: RollupStatus,
    pub counts: OutcomeCounts,
    /// Statistics header followed by one line per member (and one per failure detail).
    /// 统计标题行，后跟每个成员一行（每个失败详情额外一行）。
    pub narrative: Vec<String>,
}

/// Selects the status vocabulary of the Xray backend being reported to.
/// Xray Server/DC uses `PASS`/`FAIL`/`SKIP`; Xray Cloud uses `PASSED`/`FAILED`/`SKIPPED`.
///
/// 选择所报告的 Xray 后端的状态词汇。
/// Xray Server/DC 使用 `PASS`/`FAIL`/`SKIP`；Xray Cloud 使用 `PASSED`/`FAILED`/`SKIPPED`。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStyle {
    #[default]
    Cloud,
    Server,
}

impl BackendStyle {
    pub fn from_server_flag(server: bool) -> Self {
        if server {
            BackendStyle::Server
        } else {
            BackendStyle::Cloud
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, BackendStyle::Server)
    }

    pub fn passed_label(&self) -> &'static str {
        match self {
            BackendStyle::Server => "PASS",
            BackendStyle::Cloud => "PASSED",
        }
    }

    pub fn failed_label(&self) -> &'static str {
        match self {
            BackendStyle::Server => "FAIL",
            BackendStyle::Cloud => "FAILED",
        }
    }

    pub fn skipped_label(&self) -> &'static str {
        match self {
            BackendStyle::Server => "SKIP",
            BackendStyle::Cloud => "SKIPPED",
        }
    }

    pub fn status_label(&self, status: RollupStatus) -> &'static str {
        match status {
            RollupStatus::Pass => self.passed_label(),
            RollupStatus::Fail => self.failed_label(),
        }
    }
}

impl fmt::Display for BackendStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStyle::Cloud => f.write_str("cloud"),
            BackendStyle::Server => f.write_str("server"),
        }
    }
}
