//! # Secret Resolution Module / 密钥解析模块
//!
//! Resolves named settings from an optional secrets file, then from the
//! process environment, then from a default.
//!
//! The secrets file uses the dotenv format:
//!
//! ```text
//! # Xray Cloud credentials
//! XRAY_CLIENT_ID=abc
//! XRAY_CLIENT_SECRET="s3cr3t"
//! ```
//!
//! 从可选的密钥文件、进程环境变量以及默认值中依次解析命名设置。

use std::collections::HashMap;
use std::path::Path;

use crate::core::error::ConfigurationError;

/// Looks up configuration values: file value, then environment value, then default.
///
/// 查找配置值：文件值，然后是环境变量值，最后是默认值。
#[derive(Debug, Clone, Default)]
pub struct SecretResolver {
    /// Keys are stored upper-cased; lookups are case-insensitive.
    file: HashMap<String, String>,
    env: HashMap<String, String>,
}

impl SecretResolver {
    /// Creates a resolver over the current process environment.
    ///
    /// Fails when `secrets_file` is given but cannot be read or parsed. This is
    /// a setup mistake and is never silenced.
    ///
    /// 基于当前进程环境创建解析器。
    /// 当给出的 `secrets_file` 无法读取或解析时失败。这属于设置错误，永远不会被静默。
    pub fn new(secrets_file: Option<&Path>) -> Result<Self, ConfigurationError> {
        Self::with_env(secrets_file, std::env::vars())
    }

    /// Same as [`SecretResolver::new`] with an explicit environment.
    pub fn with_env<I, K, V>(secrets_file: Option<&Path>, env: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let file = match secrets_file {
            Some(path) => read_secrets_file(path)?,
            None => HashMap::new(),
        };
        Ok(Self {
            file,
            env: env.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        })
    }

    /// Returns the value of `name`, or `default` when neither the file nor the
    /// environment defines it. Empty file values fall through to the environment.
    pub fn resolve(&self, name: &str, default: Option<&str>) -> Option<String> {
        self.file
            .get(&name.to_ascii_uppercase())
            .filter(|value| !value.is_empty())
            .or_else(|| self.env.get(name))
            .cloned()
            .or_else(|| default.map(str::to_string))
    }

    pub fn resolve_or(&self, name: &str, default: &str) -> String {
        self.resolve(name, Some(default))
            .unwrap_or_else(|| default.to_string())
    }
}

fn read_secrets_file(path: &Path) -> Result<HashMap<String, String>, ConfigurationError> {
    let to_error = |source| ConfigurationError::SecretsFile {
        path: path.to_path_buf(),
        source,
    };
    let mut values = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (key, value) = item.map_err(to_error)?;
        values.insert(key.to_ascii_uppercase(), value);
    }
    tracing::debug!(path = %path.display(), entries = values.len(), "loaded secrets file");
    Ok(values)
}
