//! # Core Module / 核心模块
//!
//! This module contains the core functionality of the runner,
//! including data models, configuration, outcome aggregation and reporting to Xray.
//!
//! 此模块包含运行器的核心功能，
//! 包括数据模型、配置、结果聚合以及向 Xray 报告。

pub mod aggregator;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod reporter;

// Re-exports
pub use aggregator::OutcomeAggregator;
pub use config::Settings;
pub use report::ExecutionReport;
pub use reporter::Reporter;
