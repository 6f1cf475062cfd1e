//! # Execution Report Module / 执行报告模块
//!
//! The execution report built by the aggregator and the JSON payloads sent
//! to Xray and Jira.
//!
//! 聚合器构建的执行报告，以及发送给 Xray 和 Jira 的 JSON 负载。

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::core::models::{BackendStyle, RequirementRollup, RollupStatus};

/// Icon shown next to the web report link in Jira.
pub const REMOTE_LINK_ICON_URL: &str = "http://allure.qatools.ru/img/favicon.ico";
pub const REMOTE_LINK_ICON_TITLE: &str = "Report details";

/// The submission unit: one report per run.
///
/// 提交单元：每次运行一个报告。
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub summary: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub plan_key: Option<String>,
    /// Vocabulary the rollup statuses are rendered with.
    pub style: BackendStyle,
    pub rollups: Vec<RequirementRollup>,
}

impl ExecutionReport {
    /// Renders the report as the body of an Xray `import/execution` request.
    ///
    /// 将报告渲染为 Xray `import/execution` 请求的主体。
    pub fn to_payload(&self) -> ImportExecution {
        ImportExecution {
            info: ExecutionInfo {
                summary: self.summary.clone(),
                start_date: xray_timestamp(&self.start),
                finish_date: xray_timestamp(&self.end),
                test_plan_key: self.plan_key.clone(),
                test_environments: Vec::new(),
            },
            tests: self
                .rollups
                .iter()
                .map(|rollup| TestEntry {
                    test_key: rollup.requirement_key.clone(),
                    status: self.style.status_label(rollup.status).to_string(),
                    comment: comment(rollup),
                })
                .collect(),
        }
    }

    pub fn failed_rollups(&self) -> usize {
        self.rollups
            .iter()
            .filter(|rollup| rollup.status == RollupStatus::Fail)
            .count()
    }
}

/// Every narrative line terminated by a newline.
fn comment(rollup: &RequirementRollup) -> String {
    rollup
        .narrative
        .iter()
        .map(|line| format!("{line}\n"))
        .collect()
}

/// ISO-8601 with a colon separated numeric offset, e.g. `2024-01-01T10:00:00+05:30`.
pub fn xray_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportExecution {
    pub info: ExecutionInfo,
    pub tests: Vec<TestEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfo {
    pub summary: String,
    pub start_date: String,
    pub finish_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_plan_key: Option<String>,
    pub test_environments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEntry {
    pub test_key: String,
    pub status: String,
    pub comment: String,
}

/// Body of a Jira `remotelink` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteLink {
    pub object: RemoteLinkObject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteLinkObject {
    pub url: String,
    pub title: String,
    pub icon: RemoteLinkIcon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteLinkIcon {
    #[serde(rename = "url16x16")]
    pub url_16x16: String,
    pub title: String,
}

impl RemoteLink {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            object: RemoteLinkObject {
                url: url.into(),
                title: title.into(),
                icon: RemoteLinkIcon {
                    url_16x16: REMOTE_LINK_ICON_URL.to_string(),
                    title: REMOTE_LINK_ICON_TITLE.to_string(),
                },
            },
        }
    }
}
