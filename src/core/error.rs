//! # Error Types / 错误类型
//!
//! Configuration errors always abort the run. Communication errors may be
//! swallowed by the reporter when fail-silently mode is enabled.
//!
//! 配置错误总是中止运行。当启用静默失败模式时，通信错误可以被报告器忽略。

use reqwest::StatusCode;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// A mistake in the local setup: an unreadable file or a missing parameter.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// The secrets file could not be read or parsed.
    #[error("File could not be read: {}", .path.display())]
    SecretsFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// A TOML file (bindings or run configuration) could not be read.
    #[error("File could not be read: {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A TOML file (bindings or run configuration) is not valid TOML.
    #[error("Failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Run configuration text that is not valid TOML.
    #[error("Invalid run configuration")]
    InvalidRunConfig(#[source] toml::de::Error),

    /// A CSV file referenced by the run configuration could not be read.
    #[error("Failed to read CSV parameters from {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid binding '{0}', expected TEST_ID=ISSUE_KEY")]
    InvalidBinding(String),

    #[error("Parameter '{0}' is not defined in the run configuration")]
    MissingParameter(String),

    #[error("Parameter '{name}' has an unexpected shape")]
    InvalidParameter {
        name: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Environment variable {0} is not set")]
    MissingRunConfig(&'static str),

    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },
}

/// A failed call to Xray or Jira, distinguished by which remote call failed.
///
/// 对 Xray 或 Jira 的调用失败，按失败的远程调用区分。
#[derive(Error, Debug)]
pub enum CommunicationError {
    #[error("Xray authentication failed{}", describe(.status))]
    XrayAuth {
        status: Option<StatusCode>,
        body: Option<Value>,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Xray test execution submission failed{}", describe(.status))]
    XraySubmission {
        status: Option<StatusCode>,
        body: Option<Value>,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Jira remote link attachment failed{}", describe(.status))]
    JiraLink {
        status: Option<StatusCode>,
        body: Option<Value>,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

impl CommunicationError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            CommunicationError::XrayAuth { status, .. }
            | CommunicationError::XraySubmission { status, .. }
            | CommunicationError::JiraLink { status, .. } => *status,
            CommunicationError::Client(_) => None,
        }
    }

    /// Consumes the error, returning the parsed response body that came with it.
    pub fn into_body(self) -> Option<Value> {
        match self {
            CommunicationError::XrayAuth { body, .. }
            | CommunicationError::XraySubmission { body, .. }
            | CommunicationError::JiraLink { body, .. } => body,
            CommunicationError::Client(_) => None,
        }
    }
}

fn describe(status: &Option<StatusCode>) -> String {
    match status {
        Some(status) => format!(" (HTTP {})", status.as_u16()),
        None => String::new(),
    }
}
