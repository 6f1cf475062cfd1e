//! # Reporting Module / 报告模块
//!
//! This module prints the per-requirement rollups and the outcome of the
//! Xray submission to the console, with internationalization support.
//!
//! 此模块将按需求汇总的结果和 Xray 提交的结果打印到控制台，支持国际化。

pub mod console;

// Re-export common reporting functions
pub use console::{print_publication, print_summary};
