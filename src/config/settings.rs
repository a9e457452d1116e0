//! TOML-based configuration for semview.
//!
//! Supports a config file (semview.toml) with environment variable expansion
//! in path fields.
//!
//! Example configuration:
//! ```toml
//! [compile]
//! model = "${MODEL_ROOT}/model.contract.yml"
//! output_dir = "output/sql"
//! validate = true
//! parallel = false
//! dialect = "postgres"
//!
//! [emit]
//! wrap_view = true
//! terminator = true
//! manifest = true
//! facts_subdir = "facts"
//!
//! [aggregation]
//! default = "sum"
//!
//! [aggregation.overrides]
//! order_count = "count"
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compile::CompileOptions;
use crate::emit::EmitOptions;
use crate::passes::BindMeasureAggregation;
use crate::sql::dialect::Dialect;
use crate::sql::query::AggregateOp;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SEMVIEW_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unclosed variable reference in: {0}")]
    UnclosedVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Compilation inputs and options.
    pub compile: CompileSettings,

    /// Artifact shape and placement.
    pub emit: EmitOptions,

    /// Aggregation operators.
    pub aggregation: AggregationSettings,

    /// Log level and format.
    pub logging: LoggingSettings,
}

/// `[compile]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompileSettings {
    /// Path to the semantic model YAML (supports ${ENV_VAR} expansion).
    pub model: String,

    /// Output directory for artifacts (supports ${ENV_VAR} expansion).
    pub output_dir: String,

    /// Run the structural validator before compiling.
    pub validate: bool,

    /// Compile facts in parallel.
    pub parallel: bool,

    /// Identifier quoting dialect.
    pub dialect: Dialect,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            model: "semantic/model.contract.yml".to_string(),
            output_dir: "output/sql".to_string(),
            validate: true,
            parallel: false,
            dialect: Dialect::Generic,
        }
    }
}

impl CompileSettings {
    /// Model path with environment variables expanded.
    pub fn model_path(&self) -> Result<PathBuf, SettingsError> {
        expand_env_vars(&self.model).map(PathBuf::from)
    }

    /// Output directory with environment variables expanded.
    pub fn output_path(&self) -> Result<PathBuf, SettingsError> {
        expand_env_vars(&self.output_dir).map(PathBuf::from)
    }
}

/// `[aggregation]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Operator for measures without an override.
    pub default: AggregateOp,

    /// Per-measure operators.
    pub overrides: IndexMap<String, AggregateOp>,
}

impl AggregationSettings {
    /// Build the aggregation pass from these settings.
    pub fn binder(&self) -> BindMeasureAggregation {
        BindMeasureAggregation::new()
            .with_default(self.default)
            .with_overrides(self.overrides.iter().map(|(m, op)| (m.as_str(), *op)))
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SEMVIEW_CONFIG`
    /// 2. `./semview.toml`
    /// 3. `~/.config/semview/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("semview.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("semview").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Compile options described by these settings.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::default()
            .with_dialect(self.compile.dialect)
            .with_parallel(self.compile.parallel)
            .with_aggregation(self.aggregation.binder())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name = if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            let mut var_name = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                var_name.push(ch);
            }
            if !closed {
                return Err(SettingsError::UnclosedVar(s.to_string()));
            }
            var_name
        } else {
            // $VAR (ends at non-alphanumeric/underscore)
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    var_name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
            var_name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
