// Shared test helpers for integration tests
#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, TimeZone};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use xray_runner::core::config::Settings;
use xray_runner::models::{BackendStyle, OutcomePartitions, TestOutcomeRecord};

/// 2024-01-01T10:00:00+05:30
pub fn start_time() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(5 * 3600 + 1800)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 1, 10, 0, 0)
        .unwrap()
}

/// 2024-01-01T10:05:30+05:30
pub fn end_time() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(5 * 3600 + 1800)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 1, 10, 5, 30)
        .unwrap()
}

pub fn partitions(records: Vec<TestOutcomeRecord>) -> OutcomePartitions {
    records.into_iter().collect()
}

/// Settings pointing both Xray and Jira at a mock server.
pub fn mock_settings(uri: &str, backend: BackendStyle) -> Settings {
    Settings {
        xray_host: uri.to_string(),
        xray_client_id: "client-id".to_string(),
        xray_client_secret: "client-secret".to_string(),
        jira_host: uri.to_string(),
        jira_user: "jira-user".to_string(),
        jira_token: "jira-token".to_string(),
        plan_key: Some("XMPL-125".to_string()),
        fail_silently: false,
        web_url: None,
        backend,
        run_config: None,
    }
}

/// Writes `content` to `name` inside `temp_dir` and returns the full path.
pub fn write_file(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// A libtest JSON stream with one passed, one failed and one ignored test,
/// interleaved with the noise `cargo test` usually prints.
pub const LIBTEST_OUTPUT: &str = r#"
running 3 tests
{ "type": "suite", "event": "started", "test_count": 3 }
{ "type": "test", "event": "started", "name": "auth::login_works" }
{ "type": "test", "event": "started", "name": "auth::logout_works" }
{ "type": "test", "event": "started", "name": "io::slow_read" }
{ "type": "test", "name": "auth::login_works", "event": "ok", "exec_time": 0.001 }
{ "type": "test", "name": "auth::logout_works", "event": "failed", "exec_time": 0.002, "stdout": "thread 'auth::logout_works' panicked at src/auth.rs:10:5:\nsession still open\n" }
{ "type": "test", "name": "io::slow_read", "event": "ignored" }
{ "type": "suite", "event": "failed", "passed": 1, "failed": 1, "ignored": 1, "measured": 0, "filtered_out": 0, "exec_time": 0.01 }
"#;

pub const BINDINGS: &str = r#"
[bindings]
"auth::login_works" = "XMPL-123"
"auth::logout_works" = "XMPL-123"
"io::slow_read" = "XMPL-124"
"#;
