//! The binary entry point for the Saturn backdrop.

use clap::Parser;
use saturn_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    saturn_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );
    if let Some(e) = load_error {
        warn!("Using default config: {e}");
    }
    info!("Config directory: {}", config_dir.display());

    if let Err(e) = saturn_app::run(config) {
        error!("Event loop failed: {e}");
        std::process::exit(1);
    }
}
