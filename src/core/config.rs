//! # Configuration Module / 配置模块
//!
//! Builds the run-wide [`Settings`] value from command-line options and the
//! secret resolver, and loads the requirement bindings file.
//!
//! 根据命令行选项和密钥解析器构建运行范围的 [`Settings`] 值，并加载需求绑定文件。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{aggregator::OutcomeAggregator, error::ConfigurationError, models::BackendStyle};
use crate::infra::secrets::SecretResolver;

pub const DEFAULT_XRAY_HOST: &str = "https://xray.cloud.getxray.app";

/// Values given on the command line. `None` means "not given", in which case
/// the secret resolver is consulted.
///
/// 命令行中给出的值。`None` 表示"未给出"，此时会查询密钥解析器。
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub plan_key: Option<String>,
    pub fail_silently: Option<bool>,
    pub web_url: Option<String>,
    pub server: Option<bool>,
    pub run_config: Option<PathBuf>,
}

/// Everything the reporter needs to know, resolved once at startup and passed
/// by reference.
///
/// 报告器需要知道的一切，在启动时解析一次并通过引用传递。
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub xray_host: String,
    pub xray_client_id: String,
    pub xray_client_secret: String,
    pub jira_host: String,
    pub jira_user: String,
    pub jira_token: String,
    /// Xray test plan the execution is attached to. / 执行所关联的 Xray 测试计划。
    pub plan_key: Option<String>,
    /// Swallow Xray/Jira communication errors instead of aborting.
    /// 忽略 Xray/Jira 通信错误而不是中止。
    pub fail_silently: bool,
    /// Web report linked to the created execution issue.
    /// 链接到已创建执行问题的网页报告。
    pub web_url: Option<String>,
    pub backend: BackendStyle,
    pub run_config: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            xray_host: DEFAULT_XRAY_HOST.to_string(),
            xray_client_id: String::new(),
            xray_client_secret: String::new(),
            jira_host: String::new(),
            jira_user: String::new(),
            jira_token: String::new(),
            plan_key: None,
            fail_silently: false,
            web_url: None,
            backend: BackendStyle::Cloud,
            run_config: None,
        }
    }
}

impl Settings {
    /// Resolves every setting: command line first, then the secrets file,
    /// then the environment, then the built-in default.
    pub fn resolve(
        overrides: &SettingsOverrides,
        resolver: &SecretResolver,
    ) -> Result<Self, ConfigurationError> {
        let fail_silently = match overrides.fail_silently {
            Some(flag) => flag,
            None => resolve_flag(resolver, "XRAY_FAIL_SILENTLY")?,
        };
        let server = match overrides.server {
            Some(flag) => flag,
            None => resolve_flag(resolver, "XRAY_SERVER")?,
        };

        Ok(Self {
            xray_host: resolver.resolve_or("XRAY_HOST", DEFAULT_XRAY_HOST),
            xray_client_id: resolver.resolve_or("XRAY_CLIENT_ID", ""),
            xray_client_secret: resolver.resolve_or("XRAY_CLIENT_SECRET", ""),
            jira_host: resolver.resolve_or("JIRA_HOST", ""),
            jira_user: resolver.resolve_or("JIRA_USER", ""),
            jira_token: resolver.resolve_or("JIRA_TOKEN", ""),
            plan_key: non_empty(overrides.plan_key.clone())
                .or_else(|| resolver.resolve("XRAY_PLAN_KEY", None)),
            fail_silently,
            web_url: non_empty(overrides.web_url.clone())
                .or_else(|| resolver.resolve("XRAY_WEB_URL", None)),
            backend: BackendStyle::from_server_flag(server),
            run_config: overrides
                .run_config
                .clone()
                .or_else(|| resolver.resolve("XRAY_RUNCONFIG", None).map(PathBuf::from)),
        })
    }

    /// Reporting is configured unless we talk to Xray Cloud without a plan key.
    /// 除非在没有计划键的情况下与 Xray Cloud 通信，否则报告即已配置。
    pub fn reporting_enabled(&self) -> bool {
        self.backend.is_server() || self.plan_key.is_some()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn resolve_flag(resolver: &SecretResolver, name: &str) -> Result<bool, ConfigurationError> {
    match resolver.resolve(name, None) {
        Some(value) => parse_flag(&value).ok_or_else(|| ConfigurationError::InvalidValue {
            name: name.to_string(),
            value,
        }),
        None => Ok(false),
    }
}

/// Accepts the spellings commonly used for booleans in env files.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Contents of a requirement bindings file:
///
/// ```toml
/// [bindings]
/// "auth::tests::login_works" = "XMPL-123"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BindingsManifest {
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
}

impl BindingsManifest {
    /// Registers every binding with the aggregator.
    pub fn apply(&self, aggregator: &mut OutcomeAggregator) {
        for (identifier, key) in &self.bindings {
            aggregator.record(identifier.clone(), Some(key.clone()));
        }
    }
}

/// Loads a requirement bindings file.
/// 加载需求绑定文件。
pub fn load_bindings(path: &Path) -> Result<BindingsManifest, ConfigurationError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigurationError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a `TEST_ID=ISSUE_KEY` command-line binding.
pub fn parse_binding(raw: &str) -> Result<(String, String), ConfigurationError> {
    match raw.split_once('=') {
        Some((identifier, key)) if !identifier.trim().is_empty() && !key.trim().is_empty() => {
            Ok((identifier.trim().to_string(), key.trim().to_string()))
        }
        _ => Err(ConfigurationError::InvalidBinding(raw.to_string())),
    }
}
