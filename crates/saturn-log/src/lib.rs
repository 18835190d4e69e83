//! Tracing subscriber setup for the backdrop binary.
//!
//! Console output is always on. Debug builds given a log directory also write a
//! JSON log file. `RUST_LOG` wins over the configured level.

use std::path::Path;

use saturn_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directives applied when nothing else is configured.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "saturn.log";

/// Filter directives derived from the config.
///
/// A bare level such as `"debug"` keeps wgpu and naga at `warn`; anything with
/// explicit per-target directives is used as written.
pub fn resolve_filter(config: Option<&Config>) -> String {
    let level = config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty());

    match level {
        None => DEFAULT_FILTER.to_string(),
        Some(level) if level.contains(',') || level.contains('=') => level.to_string(),
        Some(level) => format!("{level},wgpu=warn,naga=warn"),
    }
}

/// Install the global subscriber. Call once, before the event loop starts.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = resolve_filter(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_without_config() {
        assert_eq!(resolve_filter(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_bare_level_keeps_gpu_noise_down() {
        let mut config = Config::default();
        config.debug.log_level = "debug".to_string();
        let filter = resolve_filter(Some(&config));
        assert_eq!(filter, "debug,wgpu=warn,naga=warn");
        assert!(EnvFilter::try_new(&filter).is_ok());
    }

    #[test]
    fn test_explicit_directives_used_verbatim() {
        let mut config = Config::default();
        config.debug.log_level = "warn,saturn_scene=trace".to_string();
        assert_eq!(resolve_filter(Some(&config)), "warn,saturn_scene=trace");
    }

    #[test]
    fn test_empty_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(resolve_filter(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_filters_parse() {
        for filter_str in [DEFAULT_FILTER, "debug,saturn_render=trace", "error"] {
            assert!(
                EnvFilter::try_new(filter_str).is_ok(),
                "Failed to parse filter: {filter_str}"
            );
        }
    }

    #[test]
    fn test_log_file_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_file_path = temp_dir.path().join(LOG_FILE_NAME);
        std::fs::File::create(&log_file_path).unwrap();
        assert!(log_file_path.exists());
    }
}
