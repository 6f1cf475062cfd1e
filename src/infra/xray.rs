//! # Xray Transport Module / Xray 传输模块
//!
//! Thin REST client for the two remote services: Xray (Cloud or Server/DC)
//! for importing test executions, and Jira for attaching remote links.
//! Every call returns the parsed JSON body, `None` for a non-JSON body, or a
//! [`CommunicationError`] for a non-success status. Whether such an error is
//! fatal is decided by the caller.
//!
//! 两个远程服务的轻量 REST 客户端：Xray（Cloud 或 Server/DC）用于导入测试执行，
//! Jira 用于附加远程链接。

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::core::{
    config::Settings,
    error::CommunicationError,
    models::BackendStyle,
    report::{ImportExecution, RemoteLink},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Authenticated client for Xray and Jira.
///
/// The Xray Cloud token is requested on first use and reused afterwards.
///
/// Xray 和 Jira 的认证客户端。Xray Cloud 令牌在首次使用时请求，之后重复使用。
#[derive(Debug)]
pub struct XrayClient {
    http: Client,
    xray_host: String,
    jira_host: String,
    client_id: String,
    client_secret: String,
    jira_user: String,
    jira_token: String,
    backend: BackendStyle,
    token: OnceCell<String>,
}

impl XrayClient {
    pub fn new(settings: &Settings) -> Result<Self, CommunicationError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(CommunicationError::Client)?;
        Ok(Self {
            http,
            xray_host: settings.xray_host.trim_end_matches('/').to_string(),
            jira_host: settings.jira_host.trim_end_matches('/').to_string(),
            client_id: settings.xray_client_id.clone(),
            client_secret: settings.xray_client_secret.clone(),
            jira_user: settings.jira_user.clone(),
            jira_token: settings.jira_token.clone(),
            backend: settings.backend,
            token: OnceCell::new(),
        })
    }

    pub fn backend(&self) -> BackendStyle {
        self.backend
    }

    /// Endpoint the execution is imported through.
    pub fn import_url(&self) -> String {
        match self.backend {
            BackendStyle::Server => format!("{}/rest/raven/1.0/import/execution", self.xray_host),
            BackendStyle::Cloud => format!("{}/api/v1/import/execution", self.xray_host),
        }
    }

    pub fn remote_link_url(&self, issue_id: &str) -> String {
        format!("{}/rest/api/2/issue/{}/remotelink", self.jira_host, issue_id)
    }

    /// Exchanges the client credentials for an Xray Cloud token.
    ///
    /// 用客户端凭据换取 Xray Cloud 令牌。
    pub async fn authenticate(&self) -> Result<&str, CommunicationError> {
        let token = self
            .token
            .get_or_try_init(|| async {
                let url = format!("{}/api/v1/authenticate", self.xray_host);
                tracing::debug!(%url, "authenticating with Xray");
                let credentials = Credentials {
                    client_id: &self.client_id,
                    client_secret: &self.client_secret,
                };
                let response = self
                    .http
                    .post(&url)
                    .json(&credentials)
                    .send()
                    .await
                    .map_err(|e| CommunicationError::XrayAuth {
                        status: None,
                        body: None,
                        source: Some(e),
                    })?;

                let status = response.status();
                let body = read_json(response).await;
                if !status.is_success() {
                    return Err(CommunicationError::XrayAuth {
                        status: Some(status),
                        body,
                        source: None,
                    });
                }
                let token = match body {
                    Some(Value::String(token)) => token,
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                Ok::<_, CommunicationError>(token)
            })
            .await?;
        Ok(token.as_str())
    }

    /// Imports a test execution. Xray Cloud authenticates first; Xray Server
    /// uses the Jira personal access token.
    ///
    /// 导入测试执行。Xray Cloud 先进行认证；Xray Server 使用 Jira 个人访问令牌。
    pub async fn import_execution(
        &self,
        payload: &ImportExecution,
    ) -> Result<Option<Value>, CommunicationError> {
        let token = match self.backend {
            BackendStyle::Server => self.jira_token.clone(),
            BackendStyle::Cloud => self.authenticate().await?.to_string(),
        };
        let url = self.import_url();
        tracing::debug!(%url, tests = payload.tests.len(), "submitting test execution");

        let request = self.http.post(&url).bearer_auth(token).json(payload);
        send(request, |status, body, source| CommunicationError::XraySubmission {
            status,
            body,
            source,
        })
        .await
    }

    /// Adds a remote link to a Jira issue. Server style uses bearer token
    /// authentication, cloud style uses basic authentication.
    pub async fn add_remote_link(
        &self,
        issue_id: &str,
        link: &RemoteLink,
    ) -> Result<Option<Value>, CommunicationError> {
        let url = self.remote_link_url(issue_id);
        tracing::debug!(%url, "attaching remote link");

        let request = self.http.post(&url).json(link);
        let request = match self.backend {
            BackendStyle::Server => request.bearer_auth(&self.jira_token),
            BackendStyle::Cloud => request.basic_auth(&self.jira_user, Some(&self.jira_token)),
        };
        send(request, |status, body, source| CommunicationError::JiraLink {
            status,
            body,
            source,
        })
        .await
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

async fn send<F>(request: RequestBuilder, to_error: F) -> Result<Option<Value>, CommunicationError>
where
    F: FnOnce(Option<StatusCode>, Option<Value>, Option<reqwest::Error>) -> CommunicationError,
{
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return Err(to_error(None, None, Some(e))),
    };
    let status = response.status();
    let body = read_json(response).await;
    if status.is_success() {
        Ok(body)
    } else {
        Err(to_error(Some(status), body, None))
    }
}

/// Parsed JSON body, or `None` when the body is empty or not JSON.
async fn read_json(response: Response) -> Option<Value> {
    let bytes = response.bytes().await.ok()?;
    serde_json::from_slice(&bytes).ok()
}
