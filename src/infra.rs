//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the runner,
//! including command execution, secret resolution, run configuration,
//! libtest output parsing and the Xray/Jira transport.
//!
//! 此模块为运行器提供基础设施服务，
//! 包括命令执行、密钥解析、运行配置、libtest 输出解析以及 Xray/Jira 传输。

pub mod command;
pub mod libtest;
pub mod runconfig;
pub mod secrets;
pub mod xray;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
