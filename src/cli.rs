// src/cli.rs
use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::{
    commands::{self, ReportingOptions},
    core::config::{self, SettingsOverrides},
    infra::t,
};

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> String {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        if let Some(lang) = args.get(pos + 1) {
            return crate::select_locale(lang);
        }
    }
    // Fallback to system language detection
    let detected = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    crate::select_locale(&detected)
}

/// Options shared by every subcommand that reports to Xray.
/// Every subcommand that reports accepts the same set.
fn with_reporting_args(command: Command, locale: &str) -> Command {
    command
        .arg(
            Arg::new("runconfig")
                .long("runconfig")
                .help(t!("arg_runconfig", locale = locale).to_string())
                .value_name("RUNCONFIG")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("secrets")
                .long("secrets")
                .help(t!("arg_secrets", locale = locale).to_string())
                .value_name("SECRETS")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("xray-plan-key")
                .long("xray-plan-key")
                .help(t!("arg_plan_key", locale = locale).to_string())
                .value_name("PLAN_KEY")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("xray-fail-silently")
                .long("xray-fail-silently")
                .help(t!("arg_fail_silently", locale = locale).to_string())
                .value_name("BOOL")
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(parse_bool)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("web-url")
                .long("web-url")
                .help(t!("arg_web_url", locale = locale).to_string())
                .value_name("WEB_URL")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("server")
                .long("server")
                .help(t!("arg_server", locale = locale).to_string())
                .value_name("BOOL")
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(parse_bool)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("bindings")
                .long("bindings")
                .help(t!("arg_bindings", locale = locale).to_string())
                .value_name("BINDINGS")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .help(t!("arg_bind", locale = locale).to_string())
                .value_name("TEST_ID=ISSUE_KEY")
                .action(ArgAction::Append),
        )
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("xray-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(with_reporting_args(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(
                    Arg::new("command")
                        .short('c')
                        .long("command")
                        .help(t!("arg_command", locale = locale).to_string())
                        .value_name("COMMAND")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("project-dir")
                        .long("project-dir")
                        .help(t!("arg_project_dir", locale = locale).to_string())
                        .value_name("PROJECT_DIR")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
            locale,
        ))
        .subcommand(with_reporting_args(
            Command::new("report")
                .about(t!("cmd_report_about", locale = locale).to_string())
                .arg(
                    Arg::new("results")
                        .short('r')
                        .long("results")
                        .help(t!("arg_results", locale = locale).to_string())
                        .value_name("RESULTS")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("started-at")
                        .long("started-at")
                        .help(t!("arg_started_at", locale = locale).to_string())
                        .value_name("RFC3339")
                        .value_parser(parse_timestamp)
                        .action(ArgAction::Set),
                ),
            locale,
        ))
}

/// `--server` alone means true; `--server=false` overrides a resolved `XRAY_SERVER=true`.
fn parse_bool(raw: &str) -> Result<bool, String> {
    config::parse_flag(raw).ok_or_else(|| format!("expected true or false, got '{raw}'"))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| e.to_string())
}

fn reporting_options(matches: &ArgMatches) -> ReportingOptions {
    let flag = |name: &str| matches.get_one::<bool>(name).copied();
    ReportingOptions {
        secrets: matches.get_one::<PathBuf>("secrets").cloned(),
        bindings: matches.get_one::<PathBuf>("bindings").cloned(),
        binds: matches
            .get_many::<String>("bind")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        overrides: SettingsOverrides {
            plan_key: matches.get_one::<String>("xray-plan-key").cloned(),
            fail_silently: flag("xray-fail-silently"),
            web_url: matches.get_one::<String>("web-url").cloned(),
            server: flag("server"),
            run_config: matches.get_one::<PathBuf>("runconfig").cloned(),
        },
    }
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language();
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let command = run_matches
                .get_one::<String>("command")
                .cloned()
                .unwrap_or_default(); // Required
            let project_dir = run_matches
                .get_one::<PathBuf>("project-dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(".")); // Has default

            commands::run::execute(command, project_dir, reporting_options(run_matches), &language)
                .await?;
        }
        Some(("report", report_matches)) => {
            let results = report_matches
                .get_one::<PathBuf>("results")
                .cloned()
                .unwrap_or_default(); // Required
            let started_at = report_matches
                .get_one::<DateTime<FixedOffset>>("started-at")
                .copied();

            commands::report::execute(
                results,
                started_at,
                reporting_options(report_matches),
                &language,
            )
            .await?;
        }
        _ => {
            // This case handles when no subcommand is given.
            // Clap will have already printed help info.
        }
    }
    Ok(())
}
