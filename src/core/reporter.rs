//! # Reporter Module / 报告器模块
//!
//! Sends an [`ExecutionReport`] to Xray and links the web report to the
//! created execution issue. Applies the two run-wide policies on top of the
//! transport: reporting is skipped entirely when it is not configured, and
//! communication errors become empty results in fail-silently mode.
//!
//! 将 [`ExecutionReport`] 发送到 Xray，并将网页报告链接到已创建的执行问题。
//! 在传输层之上应用两个运行范围的策略：未配置时完全跳过报告；
//! 在静默失败模式下，通信错误变为空结果。

use serde_json::Value;

use crate::core::{
    config::Settings,
    error::CommunicationError,
    models::BackendStyle,
    report::{ExecutionReport, RemoteLink},
};
use crate::infra::xray::XrayClient;

/// Title of the remote link pointing at the web report.
pub const WEB_REPORT_TITLE: &str = "Web report";

/// What happened when a report was published.
///
/// 发布报告时发生的情况。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Publication {
    /// `false` when reporting is not configured and nothing was sent.
    /// 当报告未配置且未发送任何内容时为 `false`。
    pub attempted: bool,
    /// Response of the import call, if it was JSON.
    pub execution: Option<Value>,
    /// Id of the created execution issue.
    pub issue_id: Option<String>,
    /// Response of the remote link call, if one was made.
    pub remote_link: Option<Value>,
}

pub struct Reporter<'a> {
    settings: &'a Settings,
    client: XrayClient,
}

impl<'a> Reporter<'a> {
    pub fn new(settings: &'a Settings) -> Result<Self, CommunicationError> {
        Ok(Self {
            settings,
            client: XrayClient::new(settings)?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.settings.reporting_enabled()
    }

    /// Submits the report. Returns `Ok(None)` without touching the network
    /// when reporting is not configured.
    ///
    /// 提交报告。当报告未配置时，不访问网络并返回 `Ok(None)`。
    pub async fn submit(
        &self,
        report: &ExecutionReport,
    ) -> Result<Option<Value>, CommunicationError> {
        if !self.is_configured() {
            tracing::info!("no Xray plan key configured, skipping submission");
            return Ok(None);
        }
        let result = self.client.import_execution(&report.to_payload()).await;
        self.settle(result)
    }

    /// Attaches `url` to the Jira issue `issue_id` as a remote link.
    pub async fn attach_link(
        &self,
        issue_id: &str,
        url: &str,
        title: &str,
    ) -> Result<Option<Value>, CommunicationError> {
        if !self.is_configured() {
            return Ok(None);
        }
        let result = self
            .client
            .add_remote_link(issue_id, &RemoteLink::new(url, title))
            .await;
        self.settle(result)
    }

    /// Submits the report, then links the web report to the created
    /// execution when a web URL is configured.
    ///
    /// A submission error in strict mode aborts before the link is attached.
    pub async fn publish(&self, report: &ExecutionReport) -> Result<Publication, CommunicationError> {
        if !self.is_configured() {
            return Ok(Publication::default());
        }

        let execution = self.submit(report).await?;
        let issue_id = execution
            .as_ref()
            .and_then(|body| created_issue_id(body, self.settings.backend));

        let remote_link = match (&self.settings.web_url, &issue_id) {
            (Some(url), Some(issue_id)) => self.attach_link(issue_id, url, WEB_REPORT_TITLE).await?,
            _ => None,
        };

        Ok(Publication {
            attempted: true,
            execution,
            issue_id,
            remote_link,
        })
    }

    /// Fail-silently policy: an error becomes whatever body came with it.
    /// A failed authentication means the submission never happened, so it yields nothing.
    fn settle(
        &self,
        result: Result<Option<Value>, CommunicationError>,
    ) -> Result<Option<Value>, CommunicationError> {
        match result {
            Err(e) if self.settings.fail_silently => {
                tracing::warn!("ignoring communication error: {e}");
                match e {
                    CommunicationError::XrayAuth { .. } => Ok(None),
                    e => Ok(e.into_body()),
                }
            }
            other => other,
        }
    }
}

/// Extracts the id of the execution issue from an import response.
/// Xray Server nests it under `testExecIssue`; Xray Cloud returns it at the top level.
///
/// 从导入响应中提取执行问题的 id。
pub fn created_issue_id(response: &Value, backend: BackendStyle) -> Option<String> {
    let id = match backend {
        BackendStyle::Server => response.get("testExecIssue")?.get("id")?,
        BackendStyle::Cloud => response.get("id")?,
    };
    match id {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
