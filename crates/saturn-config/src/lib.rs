//! Runtime settings for the Saturn backdrop.
//!
//! Settings persist to disk as RON, tolerate missing or unknown fields, and can
//! be overridden from the command line.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, InputConfig, RenderConfig, SceneConfig, WindowConfig,
    default_config_dir,
};
pub use error::ConfigError;
