//! Configuration module for semview.
//!
//! Handles the TOML settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, AggregationSettings, CompileSettings, LogFormat, LoggingSettings, Settings,
    SettingsError, CONFIG_ENV_VAR,
};
