//! # Aggregator Module Unit Tests / Aggregator 模块单元测试
//!
//! This module contains unit tests for the outcome aggregator: requirement
//! bindings, grouping, status precedence, percentages and the rendered payload.
//!
//! 此模块包含结果聚合器的单元测试：需求绑定、分组、状态优先级、百分比以及渲染后的负载。

mod common;

use common::{end_time, partitions, start_time};
use xray_runner::aggregator::{OutcomeAggregator, format_percentage};
use xray_runner::models::{
    BackendStyle, OutcomeCounts, RollupStatus, TestOutcomeRecord as Record,
};

fn aggregator(bindings: &[(&str, &str)]) -> OutcomeAggregator {
    let mut aggregator = OutcomeAggregator::new();
    for (identifier, key) in bindings {
        aggregator.record(*identifier, Some(key.to_string()));
    }
    aggregator
}

#[cfg(test)]
mod binding_tests {
    use super::*;

    #[test]
    fn test_record_without_key_is_a_no_op() {
        let mut aggregator = OutcomeAggregator::new();
        aggregator.record("T1", None);

        assert_eq!(aggregator.binding_count(), 0);
        assert_eq!(aggregator.binding_for("T1"), None);
    }

    #[test]
    fn test_rebinding_keeps_the_last_key() {
        let mut aggregator = OutcomeAggregator::new();
        aggregator.record("T1", Some("XMPL-1".to_string()));
        aggregator.record("T1", Some("XMPL-2".to_string()));

        assert_eq!(aggregator.binding_for("T1"), Some("XMPL-2"));
        assert_eq!(aggregator.binding_count(), 1);
    }

    #[test]
    fn test_rebinding_moves_the_member_to_the_new_group() {
        let mut aggregator = aggregator(&[("T1", "XMPL-1"), ("T2", "XMPL-1")]);
        aggregator.record("T1", Some("XMPL-2".to_string()));

        let outcomes = partitions(vec![Record::passed("T1"), Record::passed("T2")]);
        let report = aggregator.build_report(&outcomes, start_time(), end_time(), None, BackendStyle::Cloud);

        assert_eq!(report.rollups.len(), 2);
        assert_eq!(report.rollups[0].requirement_key, "XMPL-2");
        assert_eq!(report.rollups[0].counts.total(), 1);
        assert_eq!(report.rollups[1].requirement_key, "XMPL-1");
        assert_eq!(report.rollups[1].counts.total(), 1);
        assert!(report.rollups[1].narrative.iter().all(|line| !line.contains("T1")));
    }
}

#[cfg(test)]
mod build_report_tests {
    use super::*;

    #[test]
    fn test_passed_and_failed_on_same_key_fails() {
        let aggregator = aggregator(&[("T1", "XMPL-123"), ("T2", "XMPL-123")]);
        let outcomes = partitions(vec![
            Record::passed("T1"),
            Record::failed("T2", "assertion failed"),
        ]);

        let report = aggregator.build_report(
            &outcomes,
            start_time(),
            end_time(),
            Some("XMPL-125"),
            BackendStyle::Cloud,
        );

        assert_eq!(report.rollups.len(), 1);
        let rollup = &report.rollups[0];
        assert_eq!(rollup.requirement_key, "XMPL-123");
        assert_eq!(rollup.status, RollupStatus::Fail);
        assert_eq!(
            rollup.counts,
            OutcomeCounts {
                passed: 1,
                failed: 1,
                skipped: 0
            }
        );
    }

    #[test]
    fn test_unbound_tests_are_excluded() {
        let aggregator = aggregator(&[("T1", "XMPL-1")]);
        let outcomes = partitions(vec![
            Record::passed("T1"),
            Record::failed("unbound", "boom"),
            Record::skipped("also_unbound"),
        ]);

        let report = aggregator.build_report(&outcomes, start_time(), end_time(), None, BackendStyle::Cloud);

        assert_eq!(report.rollups.len(), 1);
        let rollup = &report.rollups[0];
        assert_eq!(rollup.status, RollupStatus::Pass);
        assert_eq!(rollup.counts.total(), 1);
        assert!(rollup.narrative.iter().all(|line| !line.contains("unbound")));
    }

    #[test]
    fn test_skipped_only_group_passes() {
        let aggregator = aggregator(&[("T1", "XMPL-1")]);
        let outcomes = partitions(vec![Record::skipped("T1")]);

        let report = aggregator.build_report(&outcomes, start_time(), end_time(), None, BackendStyle::Cloud);

        assert_eq!(report.rollups[0].status, RollupStatus::Pass);
        assert_eq!(report.rollups[0].counts.skipped, 1);
    }

    #[test]
    fn test_counts_match_group_size_and_status_matches_failures() {
        let aggregator = aggregator(&[
            ("a1", "A"),
            ("a2", "A"),
            ("a3", "A"),
            ("b1", "B"),
            ("b2", "B"),
            ("c1", "C"),
        ]);
        let outcomes = partitions(vec![
            Record::passed("a1"),
            Record::skipped("a2"),
            Record::failed("a3", "x"),
            Record::passed("b1"),
            Record::skipped("b2"),
            Record::failed("c1", "y"),
        ]);

        let report = aggregator.build_report(&outcomes, start_time(), end_time(), None, BackendStyle::Server);

        let sizes = [("A", 3), ("B", 2), ("C", 1)];
        for (key, size) in sizes {
            let rollup = report
                .rollups
                .iter()
                .find(|r| r.requirement_key == key)
                .expect("rollup exists");
            assert_eq!(rollup.counts.total(), size, "count sum for {key}");
            assert_eq!(
                rollup.status == RollupStatus::Fail,
                rollup.counts.failed > 0,
                "status for {key}"
            );
        }
    }

    #[test]
    fn test_group_order_follows_first_encounter_across_partitions() {
        // "B" only has a passed member, "A" only failed, "C" only skipped:
        // passed partition is walked first, then failed, then skipped.
        let aggregator = aggregator(&[("t_a", "A"), ("t_b", "B"), ("t_c", "C")]);
        let outcomes = partitions(vec![
            Record::skipped("t_c"),
            Record::failed("t_a", "boom"),
            Record::passed("t_b"),
        ]);

        let report = aggregator.build_report(&outcomes, start_time(), end_time(), None, BackendStyle::Cloud);

        let keys: Vec<&str> = report
            .rollups
            .iter()
            .map(|r| r.requirement_key.as_str())
            .collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_narrative_orders_members_passed_failed_skipped() {
        let aggregator = aggregator(&[("s1", "K"), ("f1", "K"), ("p1", "K"), ("p2", "K")]);
        let outcomes = partitions(vec![
            Record::skipped("s1"),
            Record::failed("f1", "left != right"),
            Record::passed("p1"),
            Record::passed("p2"),
        ]);

        let report = aggregator.build_report(&outcomes, start_time(), end_time(), None, BackendStyle::Cloud);

        assert_eq!(
            report.rollups[0].narrative,
            vec![
                "PASSED: 2 (50.0%)   FAILED: 1 (25.0%)   SKIPPED: 1 (25.0%)".to_string(),
                "PASSED: p1".to_string(),
                "PASSED: p2".to_string(),
                "FAILED: f1".to_string(),
                "left != right".to_string(),
                "SKIPPED: s1".to_string(),
            ]
        );
    }

    #[test]
    fn test_server_style_uses_short_labels() {
        let aggregator = aggregator(&[("T1", "XMPL-1"), ("T2", "XMPL-1"), ("T3", "XMPL-2")]);
        let outcomes = partitions(vec![
            Record::passed("T1"),
            Record::skipped("T2"),
            Record::failed("T3", "boom"),
        ]);

        let report = aggregator.build_report(&outcomes, start_time(), end_time(), None, BackendStyle::Server);
        let payload = report.to_payload();

        assert_eq!(payload.tests[0].status, "PASS");
        assert_eq!(payload.tests[1].status, "FAIL");
        assert!(
            payload.tests[0]
                .comment
                .starts_with("PASS: 1 (50.0%)   FAIL: 0 (0.0%)   SKIP: 1 (50.0%)\n")
        );
        // Member lines keep the harness outcome names.
        assert!(payload.tests[0].comment.contains("PASSED: T1\n"));
        assert!(payload.tests[0].comment.contains("SKIPPED: T2\n"));
    }

    #[test]
    fn test_cloud_style_uses_long_labels() {
        let aggregator = aggregator(&[("T1", "XMPL-1")]);
        let outcomes = partitions(vec![Record::failed("T1", "boom")]);

        let report = aggregator.build_report(&outcomes, start_time(), end_time(), None, BackendStyle::Cloud);
        let payload = report.to_payload();

        assert_eq!(payload.tests[0].status, "FAILED");
        assert_eq!(
            payload.tests[0].comment,
            "PASSED: 0 (0.0%)   FAILED: 1 (100.0%)   SKIPPED: 0 (0.0%)\nFAILED: T1\nboom\n"
        );
    }

    #[test]
    fn test_summary_and_timestamps() {
        let aggregator = aggregator(&[("T1", "XMPL-1")]);
        let outcomes = partitions(vec![Record::passed("T1")]);

        let report = aggregator.build_report(
            &outcomes,
            start_time(),
            end_time(),
            Some("XMPL-125"),
            BackendStyle::Cloud,
        );
        let payload = report.to_payload();

        assert_eq!(payload.info.summary, "Test execution of plan XMPL-125");
        assert_eq!(payload.info.start_date, "2024-01-01T10:00:00+05:30");
        assert_eq!(payload.info.finish_date, "2024-01-01T10:05:30+05:30");
        assert_eq!(payload.info.test_plan_key.as_deref(), Some("XMPL-125"));
        assert!(payload.info.test_environments.is_empty());
    }

    #[test]
    fn test_payload_wire_shape() {
        let aggregator = aggregator(&[("T1", "XMPL-1")]);
        let outcomes = partitions(vec![Record::passed("T1")]);

        let report = aggregator.build_report(
            &outcomes,
            start_time(),
            end_time(),
            Some("XMPL-125"),
            BackendStyle::Cloud,
        );
        let json = serde_json::to_value(report.to_payload()).unwrap();

        assert_eq!(json["info"]["testPlanKey"], "XMPL-125");
        assert_eq!(json["info"]["startDate"], "2024-01-01T10:00:00+05:30");
        assert_eq!(json["info"]["testEnvironments"], serde_json::json!([]));
        assert_eq!(json["tests"][0]["testKey"], "XMPL-1");
        assert_eq!(json["tests"][0]["status"], "PASSED");
    }

    #[test]
    fn test_missing_plan_key_is_omitted_from_payload() {
        let aggregator = aggregator(&[("T1", "XMPL-1")]);
        let outcomes = partitions(vec![Record::passed("T1")]);

        let report = aggregator.build_report(&outcomes, start_time(), end_time(), None, BackendStyle::Server);
        let json = serde_json::to_value(report.to_payload()).unwrap();

        assert_eq!(report.summary, "Test execution of plan ");
        assert!(json["info"].get("testPlanKey").is_none());
    }

    #[test]
    fn test_no_outcomes_builds_an_empty_report() {
        let aggregator = aggregator(&[("T1", "XMPL-1")]);
        let report = aggregator.build_report(
            &partitions(vec![]),
            start_time(),
            end_time(),
            None,
            BackendStyle::Cloud,
        );

        assert!(report.rollups.is_empty());
        assert!(report.to_payload().tests.is_empty());
    }
}

#[cfg(test)]
mod percentage_tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(1, 2), "50.0");
        assert_eq!(format_percentage(1, 3), "33.33");
        assert_eq!(format_percentage(2, 3), "66.67");
        assert_eq!(format_percentage(1, 8), "12.5");
        assert_eq!(format_percentage(3, 3), "100.0");
        assert_eq!(format_percentage(0, 7), "0.0");
    }

    #[test]
    fn test_exact_ties_round_to_even() {
        assert_eq!(format_percentage(1, 32), "3.12");
        assert_eq!(format_percentage(1, 160), "0.62");
        assert_eq!(format_percentage(5, 32), "15.62");
        assert_eq!(format_percentage(3, 32), "9.38");
    }

    #[test]
    fn test_percentages_sum_to_about_one_hundred() {
        for (passed, failed, skipped) in [(1, 1, 1), (2, 3, 4), (0, 5, 2), (7, 0, 0), (1, 2, 4)] {
            let total = passed + failed + skipped;
            let sum: f64 = [passed, failed, skipped]
                .iter()
                .map(|count| format_percentage(*count, total).parse::<f64>().unwrap())
                .sum();
            assert!((sum - 100.0).abs() <= 0.02, "sum was {sum}");
        }
    }
}
