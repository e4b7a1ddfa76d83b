//! Configuration module for tinyagent.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    GeneralSettings, ModelSettings, PostgresSettings, SearchSettings, Settings, ShellSettings,
    ToolSettings,
};
