use std::{env, path::PathBuf};

use logger::{Color, Logger};
use map_tour::TourConfig;

/// Opens the bakery crawl window.
///
/// # Usage
///
/// ```sh
/// cargo run -- [config.json]
/// ```
///
/// Without a config file the built-in defaults are used. When the config
/// names a `log_dir`, the session log is written there; otherwise log
/// lines only go to the console. `log_level` sets the minimum level
/// (`"debug"` shows every scroll reading).
fn main() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        return Err("Usage: bakery-crawl [config.json]".to_string());
    }

    let config = match args.get(1) {
        Some(path) => TourConfig::load(&PathBuf::from(path)).map_err(|e| e.to_string())?,
        None => TourConfig::default(),
    };

    let logger = match &config.log_dir {
        Some(dir) => Logger::new(dir, "bakery crawl").map_err(|e| e.to_string())?,
        None => Logger::console(),
    }
    .with_min_level(config.log_level.into());

    let _ = logger.info("Starting bakery crawl", Color::Green, true);

    map_tour::run(config, logger.clone()).map_err(|e| {
        let _ = logger.error(&format!("Error: Map library failed to load ({})", e), true);
        "Error: Map library failed to load".to_string()
    })
}
