//! Command-line flags for the `hexisle` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Procedural low-poly hex island.
///
/// Flags override the matching values in `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "hexisle", about = "Procedural low-poly hex island")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Terrain noise seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Seed for decoration and cloud placement.
    #[arg(long)]
    pub random_seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory containing textures and the environment map.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Generate the island, log its statistics and exit without opening a window.
    #[arg(long)]
    pub headless: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(seed) = args.random_seed {
            self.debug.random_seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.assets {
            self.assets.directory = dir.clone();
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
            seed: Some(1234),
            assets: Some(PathBuf::from("/data/island")),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.terrain.seed, 1234);
        assert_eq!(config.assets.directory, PathBuf::from("/data/island"));
        // untouched
        assert_eq!(config.window.height, 720);
        assert_eq!(config.debug.random_seed, 0);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "hexisle",
            "--seed",
            "5",
            "--random-seed",
            "6",
            "--log-level",
            "debug",
            "--headless",
        ]);
        assert_eq!(args.seed, Some(5));
        assert_eq!(args.random_seed, Some(6));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.headless);
        assert!(args.config.is_none());
    }
}
