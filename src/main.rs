//! ctxprof CLI entry point.

use anyhow::Result;
use clap::Parser;

use ctxprof::cli::{dispatch, handle_error, Cli};
use ctxprof::domain::models::Config;
use ctxprof::infrastructure::config::ConfigLoader;
use ctxprof::infrastructure::logging::{LogConfig, LoggerImpl};

fn load_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let json = cli.json;
    if let Err(err) = dispatch(cli.command, &config, json) {
        handle_error(err, json);
    }
}
