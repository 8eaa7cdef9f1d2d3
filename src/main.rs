// accentctl/src/main.rs

mod logging;
mod error;
mod paths;
mod config;
mod color;
mod swatches;
mod theme;
mod presets;
mod session;
mod cli;

use clap::Parser;

use crate::cli::{run_cli, Cli};

fn main() {
    let cli = Cli::parse();
    let loaded = config::load_config();
    let cfg = loaded.config;

    let log_path = cfg.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init(cli.debug || cfg.debug, log_path);
    info!("accentctl starting, config at {}", config::config_path().display());
    for w in &loaded.warnings {
        warn!("{w}");
        eprintln!("warning: {w}");
    }

    let result = run_cli(cli, &cfg);
    match &result {
        Ok(()) => info!("accentctl finished"),
        Err(e) => error!("Command failed ({:?}): {e}", e.kind()),
    }
    logging::shutdown();

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
