//! # Xray Runner Library / Xray Runner 库
//!
//! This library provides the core functionality for the Xray Runner tool,
//! which runs a Rust test suite, rolls the outcomes up per Xray requirement
//! key and submits the resulting test execution to Xray.
//!
//! 此库为 Xray Runner 工具提供核心功能，
//! 它运行 Rust 测试套件，按 Xray 需求键汇总结果，并将测试执行提交到 Xray。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, configuration, outcome aggregation and the reporter
//! - `infra` - Command execution, secrets, run configuration, libtest parsing and HTTP transport
//! - `reporting` - Console output
//! - `cli` / `commands` - Command-line interface and subcommands
//!
//! - `core` - 数据模型、配置、结果聚合和报告器
//! - `infra` - 命令执行、密钥、运行配置、libtest 解析和 HTTP 传输
//! - `reporting` - 控制台输出
//! - `cli` / `commands` - 命令行接口和子命令

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::aggregator;
pub use core::config;
pub use core::models;

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

/// Picks the UI language: the requested one if we ship it, then its language
/// part (`zh` from `zh-TW`), then English.
///
/// 选择界面语言：优先使用请求的语言（如果提供），然后是其语言部分，最后是英语。
pub fn select_locale(requested: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.iter().any(|locale| *locale == requested) {
        return requested.to_string();
    }
    requested
        .split('-')
        .next()
        .filter(|lang_code| available_locales.iter().any(|locale| locale == lang_code))
        .unwrap_or("en")
        .to_string()
}
