use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments. Values given here override `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "saturn-backdrop", about = "Animated Saturn nebula backdrop")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Number of star particles.
    #[arg(long)]
    pub stars: Option<u32>,

    /// Seed for a reproducible scene.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable the fullscreen nebula overlay.
    #[arg(long)]
    pub overlay: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(stars) = args.stars {
            self.scene.star_count = stars;
        }
        if let Some(seed) = args.seed {
            self.scene.seed = Some(seed);
        }
        if let Some(overlay) = args.overlay {
            self.scene.nebula_overlay = overlay;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            stars: Some(500),
            seed: Some(9),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.scene.star_count, 500);
        assert_eq!(config.scene.seed, Some(9));
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.scene.cloud_count, 6);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "saturn-backdrop",
            "--overlay",
            "true",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.overlay, Some(true));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
    }
}
