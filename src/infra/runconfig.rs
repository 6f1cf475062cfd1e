//! # Run Configuration Module / 运行配置模块
//!
//! Exposes the top-level entries of a TOML run-configuration file as named
//! parameter sets for parametrized tests. Entries whose name starts with `_`
//! are private to the file and never exposed.
//!
//! ```toml
//! voltages = [1.5, 3.3, 5.0]
//! boards = ["hil402", "hil404"]
//! channels = { csv = "channels.csv" }
//! _scratch = "not exported"
//! ```
//!
//! An entry of the form `{ csv = "file.csv" }` is replaced by the rows of that
//! file, read relative to the run configuration. A row with a single column
//! becomes a string, a wider row becomes a list of strings.
//!
//! 将 TOML 运行配置文件的顶层条目作为命名参数集暴露给参数化测试。
//! 名称以 `_` 开头的条目是文件私有的，不会被暴露。

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::ConfigurationError;

/// Environment variable through which `xray-runner run` hands the run
/// configuration path to the spawned tests.
pub const RUNCONFIG_ENV: &str = "XRAY_RUNNER_RUNCONFIG";

/// Typed lookup of the parameter sets defined in a run configuration.
///
/// 运行配置中定义的参数集的类型化查找。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSource {
    path: Option<PathBuf>,
    values: BTreeMap<String, toml::Value>,
}

impl ParameterSource {
    /// Reads and parses a run configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let table: toml::Table =
            toml::from_str(&content).map_err(|source| ConfigurationError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut source = Self::from_table(table, base_dir)?;
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    /// Parses run configuration text. CSV references are read relative to the
    /// current directory.
    pub fn parse(content: &str) -> Result<Self, ConfigurationError> {
        let table: toml::Table =
            toml::from_str(content).map_err(ConfigurationError::InvalidRunConfig)?;
        Self::from_table(table, Path::new("."))
    }

    fn from_table(table: toml::Table, base_dir: &Path) -> Result<Self, ConfigurationError> {
        let mut values = BTreeMap::new();
        for (name, value) in table {
            if name.starts_with('_') {
                continue;
            }
            let csv_file = csv_reference(&value).map(|file| base_dir.join(file));
            let value = match csv_file {
                Some(csv_file) => read_csv(&csv_file)?,
                None => value,
            };
            values.insert(name, value);
        }
        Ok(Self { path: None, values })
    }

    /// Loads the run configuration handed over by `xray-runner run`.
    ///
    /// Intended for use inside parametrized tests:
    ///
    /// ```no_run
    /// use xray_runner::infra::runconfig::ParameterSource;
    ///
    /// let params = ParameterSource::from_env().unwrap();
    /// for voltage in params.get::<Vec<f64>>("voltages").unwrap() {
    ///     assert!(voltage > 0.0);
    /// }
    /// ```
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let path = std::env::var_os(RUNCONFIG_ENV)
            .ok_or(ConfigurationError::MissingRunConfig(RUNCONFIG_ENV))?;
        Self::load(Path::new(&path))
    }

    /// Deserializes the parameter set called `name`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigurationError> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ConfigurationError::MissingParameter(name.to_string()))?;
        value
            .clone()
            .try_into()
            .map_err(|source| ConfigurationError::InvalidParameter {
                name: name.to_string(),
                source,
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names of the exposed parameter sets, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The file this source was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// The file named by a `{ csv = "..." }` entry.
fn csv_reference(value: &toml::Value) -> Option<&str> {
    let table = value.as_table()?;
    if table.len() != 1 {
        return None;
    }
    table.get("csv")?.as_str()
}

/// Reads a header-less CSV file into a list of rows.
/// 将无表头的 CSV 文件读取为行列表。
pub fn read_csv(path: &Path) -> Result<toml::Value, ConfigurationError> {
    let to_error = |source| ConfigurationError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(to_error)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(to_error)?;
        let row = match record.len() {
            1 => toml::Value::String(record[0].to_string()),
            _ => toml::Value::Array(
                record
                    .iter()
                    .map(|field| toml::Value::String(field.to_string()))
                    .collect(),
            ),
        };
        rows.push(row);
    }
    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded csv parameters");
    Ok(toml::Value::Array(rows))
}
