//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ctxprof")]
#[command(about = "ctxprof - test environment cache-efficiency analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .ctxprof/config.yaml and .ctxprof/local.yaml)
    #[arg(short, long, global = true, env = "CTXPROF_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a trace and report optimization statistics
    Analyze {
        /// Trace file (.json, .yaml or .yml)
        trace: PathBuf,
    },

    /// Replay a trace and print the creation timeline
    Timeline {
        /// Trace file (.json, .yaml or .yml)
        trace: PathBuf,
    },

    /// Replay a trace and list every cache entry
    Entries {
        /// Trace file (.json, .yaml or .yml)
        trace: PathBuf,

        /// Only show entries whose environment was created
        #[arg(long)]
        created_only: bool,
    },

    /// Score the similarity of two fingerprints declared in a trace
    Similarity {
        /// Trace file declaring the fingerprints
        trace: PathBuf,

        /// Name of the first fingerprint
        a: String,

        /// Name of the second fingerprint
        b: String,
    },
}
