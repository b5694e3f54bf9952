//! Generates an island and shows it. `--headless` stops after generation.

use std::process::ExitCode;

use clap::Parser;
use hexisle_app::startup::{build_scene, load_config, load_textures, resolve_config_dir};
use hexisle_config::CliArgs;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = resolve_config_dir(&args);
    let config = load_config(&config_dir, &args);

    let log_dir = config_dir.join("logs");
    if let Err(e) =
        hexisle_log::init_logging(Some(log_dir.as_path()), cfg!(debug_assertions), Some(&config))
    {
        eprintln!("Failed to initialise logging: {e}");
    }

    let textures = match load_textures(&config, args.headless) {
        Ok(textures) => textures,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let scene = build_scene(&config);
    if args.headless {
        info!("Headless run, exiting");
        return ExitCode::SUCCESS;
    }

    match hexisle_app::run(config, scene, textures) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
