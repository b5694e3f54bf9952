//! Configuration for the hexisle island generator.
//!
//! Every empirical constant of the generator (spacing, thresholds, decoration
//! odds and sizes, cloud layout, set-piece dimensions) lives here so it can be
//! tuned from `config.ron` without recompiling. CLI flags override the file.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, CameraConfig, CloudConfig, Config, DebugConfig, DecorationConfig, RenderConfig,
    SetPieceConfig, TerrainConfig, WindowConfig, default_config_dir,
};
pub use error::ConfigError;
