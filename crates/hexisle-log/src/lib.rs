//! Logging setup for hexisle.
//!
//! Console output is always on. Debug builds given a log directory also write
//! one JSON object per event to `hexisle.log`, which is what the generation
//! statistics are usually inspected through.

use std::path::{Path, PathBuf};

use hexisle_config::Config;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name of the JSON log inside the log directory.
pub const LOG_FILE_NAME: &str = "hexisle.log";

/// Directives appended to every level so GPU backend chatter stays quiet.
const BACKEND_DIRECTIVES: &str = "wgpu=warn,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.debug.log_level`, which wins over `info`.
/// Returns the path of the JSON log when one was opened. Fails if a global
/// subscriber is already installed.
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Result<Option<PathBuf>, TryInitError> {
    let level = config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or("info");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for_level(level));

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

        subscriber.with(file_layer).try_init()?;
        return Ok(Some(log_dir.join(LOG_FILE_NAME)));
    }

    subscriber.try_init()?;
    Ok(None)
}

/// Filter enabling `level` everywhere except the GPU backend crates.
pub fn filter_for_level(level: &str) -> EnvFilter {
    EnvFilter::new(format!("{level},{BACKEND_DIRECTIVES}"))
}

/// The filter used when neither `RUST_LOG` nor the config set a level.
pub fn default_env_filter() -> EnvFilter {
    filter_for_level("info")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiets_backends() {
        let text = default_env_filter().to_string();
        assert!(text.contains("info"));
        assert!(text.contains("wgpu=warn"));
        assert!(text.contains("naga=warn"));
    }

    #[test]
    fn test_filter_for_level_keeps_level() {
        let text = filter_for_level("debug").to_string();
        assert!(text.contains("debug"));
        assert!(text.contains("wgpu_hal=warn"));
    }

    #[test]
    fn test_crate_directives_parse() {
        for directive in [
            "info",
            "debug,hexisle_scene=trace",
            "warn,hexisle_terrain=debug,hexisle_render=info",
        ] {
            assert!(
                EnvFilter::try_new(directive).is_ok(),
                "failed to parse filter: {directive}"
            );
        }
    }

    // Only one global subscriber can exist per test binary, so installation and
    // the double-init failure are checked in the same test.
    #[test]
    fn test_init_writes_json_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.debug.log_level = "debug".to_string();

        let path = init_logging(Some(dir.path()), true, Some(&config))
            .expect("first init succeeds")
            .expect("debug build opens a log file");
        assert_eq!(path, dir.path().join(LOG_FILE_NAME));

        tracing::warn!(tiles = 3, "island ready");
        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().last().expect("one event logged");
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["fields"]["tiles"], 3);
        assert_eq!(event["fields"]["message"], "island ready");

        assert!(init_logging(None, false, None).is_err());
    }
}
