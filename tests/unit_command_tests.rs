//! # Command Module Unit Tests / Command 模块单元测试
//!
//! Tests for spawning the test command, capturing its output and timing a
//! reported run.
//!
//! 派生测试命令、捕获其输出以及报告运行计时的测试。

mod common;

use chrono::{DateTime, FixedOffset, Local};
use common::{LIBTEST_OUTPUT, write_file};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use xray_runner::commands::report::execution_window;
use xray_runner::infra::{command, libtest};

#[cfg(test)]
mod capture_tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invalid_utf8_does_not_stop_capture() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "results.json", LIBTEST_OUTPUT);

        let cmd = command::build_command(
            "sh -c \"printf 'bad \\377 byte\\n'; cat results.json\"",
            temp_dir.path(),
            Vec::<(&str, &Path)>::new(),
        )
        .unwrap();
        let (status, stdout) = command::spawn_and_capture(cmd).await;

        assert!(status.unwrap().success());
        assert!(stdout.starts_with("bad \u{FFFD} byte\n"));
        assert_eq!(libtest::parse_outcomes(&stdout).len(), 3);
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let temp_dir = TempDir::new().unwrap();

        assert!(
            command::build_command("   ", temp_dir.path(), Vec::<(&str, &Path)>::new()).is_err()
        );
    }
}

#[cfg(test)]
mod execution_window_tests {
    use super::*;

    #[test]
    fn test_start_defaults_to_end() {
        let finished = SystemTime::now();

        let (start, end) = execution_window(finished, None);

        assert_eq!(start, end);
        assert_eq!(end, DateTime::<Local>::from(finished).fixed_offset());
    }

    #[test]
    fn test_start_is_converted_to_local_time() {
        let finished = SystemTime::UNIX_EPOCH + Duration::from_secs(1_704_090_000);
        let started_at: DateTime<FixedOffset> =
            DateTime::parse_from_rfc3339("2024-01-01T10:00:00+05:30").unwrap();

        let (start, end) = execution_window(finished, Some(started_at));

        assert_eq!(start, started_at);
        assert_eq!(start.offset(), end.offset());
        assert_eq!(start.offset(), started_at.with_timezone(&Local).offset());
    }
}
