//! # Commands Module / 命令模块
//!
//! Subcommands of the CLI and the reporting pipeline they share: resolve the
//! settings, collect requirement bindings, then build, print and publish the
//! execution report once all outcomes are known.
//!
//! CLI 的子命令及其共享的报告流程：解析设置，收集需求绑定，
//! 在所有结果已知后构建、打印并发布执行报告。

pub mod report;
pub mod run;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use colored::*;
use std::path::PathBuf;

use crate::{
    core::{
        aggregator::OutcomeAggregator,
        config::{self, Settings, SettingsOverrides},
        models::OutcomePartitions,
        report::ExecutionReport,
        reporter::Reporter,
    },
    infra::{runconfig::ParameterSource, secrets::SecretResolver, t},
    reporting::{print_publication, print_summary},
};

/// Options shared by every subcommand that reports to Xray.
#[derive(Debug, Clone, Default)]
pub struct ReportingOptions {
    pub secrets: Option<PathBuf>,
    pub bindings: Option<PathBuf>,
    /// Raw `TEST_ID=ISSUE_KEY` bindings from the command line.
    pub binds: Vec<String>,
    pub overrides: SettingsOverrides,
}

/// Everything resolved before the tests run.
/// 测试运行前解析的所有内容。
#[derive(Debug)]
pub struct Session {
    pub settings: Settings,
    pub aggregator: OutcomeAggregator,
    pub parameters: Option<ParameterSource>,
}

impl Session {
    /// Resolves settings and bindings. Configuration errors are always fatal.
    ///
    /// 解析设置和绑定。配置错误总是致命的。
    pub fn prepare(options: &ReportingOptions, locale: &str) -> Result<Self> {
        let resolver = SecretResolver::new(options.secrets.as_deref())
            .with_context(|| t!("config.secrets_failed", locale = locale).to_string())?;
        let settings = Settings::resolve(&options.overrides, &resolver)?;

        let parameters = match &settings.run_config {
            Some(path) => {
                let parameters = ParameterSource::load(path).with_context(|| {
                    t!("config.runconfig_failed", locale = locale, path = path.display()).to_string()
                })?;
                println!(
                    "{}",
                    t!(
                        "config.runconfig_loaded",
                        locale = locale,
                        count = parameters.len(),
                        path = path.display()
                    )
                    .cyan()
                );
                Some(parameters)
            }
            None => None,
        };

        let mut aggregator = OutcomeAggregator::new();
        if let Some(path) = &options.bindings {
            config::load_bindings(path)
                .with_context(|| {
                    t!("config.bindings_failed", locale = locale, path = path.display()).to_string()
                })?
                .apply(&mut aggregator);
        }
        for raw in &options.binds {
            let (identifier, key) = config::parse_binding(raw)?;
            aggregator.record(identifier, Some(key));
        }
        println!(
            "{}",
            t!("config.bindings_loaded", locale = locale, count = aggregator.binding_count()).cyan()
        );

        if settings.reporting_enabled() {
            println!(
                "{}",
                t!(
                    "config.reporting_to",
                    locale = locale,
                    backend = settings.backend,
                    host = &settings.xray_host
                )
                .cyan()
            );
        }

        Ok(Self {
            settings,
            aggregator,
            parameters,
        })
    }

    /// Builds the report from the final outcomes, prints it and publishes it.
    ///
    /// 根据最终结果构建报告，打印并发布。
    pub async fn finish(
        &self,
        outcomes: &OutcomePartitions,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        locale: &str,
    ) -> Result<ExecutionReport> {
        let report = self.aggregator.build_report(
            outcomes,
            start,
            end,
            self.settings.plan_key.as_deref(),
            self.settings.backend,
        );
        print_summary(&report, outcomes, locale);

        let reporter = Reporter::new(&self.settings)?;
        let publication = reporter
            .publish(&report)
            .await
            .with_context(|| t!("publish.failed", locale = locale).to_string())?;
        print_publication(&publication, locale);

        Ok(report)
    }
}
