//! Command-line interface for the `ctxprof` binary.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::Result;

use crate::domain::models::Config;

/// Runs a parsed command against the loaded configuration.
pub fn dispatch(command: Commands, config: &Config, json: bool) -> Result<()> {
    match command {
        Commands::Analyze { trace } => commands::analyze::execute(&trace, &config.analysis, json),
        Commands::Timeline { trace } => commands::timeline::execute(&trace, json),
        Commands::Entries {
            trace,
            created_only,
        } => commands::entries::execute(&trace, created_only, json),
        Commands::Similarity { trace, a, b } => {
            commands::similarity::execute(&trace, &a, &b, json)
        }
    }
}

/// Prints a top-level error in the requested format and exits non-zero.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    tracing::error!(error = %err, "command failed");
    if json {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        let body = serde_json::json!({ "error": err.to_string(), "causes": chain });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
