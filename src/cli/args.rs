//! CLI argument structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Draft, cost, optimize and assess a city plan with a generative model
#[derive(Parser)]
#[command(name = "cityforge")]
#[command(about = "cityforge - Generate and optimize city plans with AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a plan and run it through optimization and assessment
    Plan {
        /// Free-text description of the city
        description: String,

        /// Do not optimize an over-budget plan
        #[arg(long)]
        no_optimize: bool,

        /// Do not generate the final blueprint after optimizing
        #[arg(long)]
        no_final: bool,

        /// Skip the environmental assessment
        #[arg(long)]
        no_assess: bool,

        /// Print the plan snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract sections and the grand total from saved model output
    Parse {
        /// File containing the raw generation output
        file: PathBuf,

        /// Treat the file as final blueprint output
        #[arg(long = "final")]
        final_blueprint: bool,

        /// Print the extracted fields as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the plan HTTP API
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(short = 'p', long)]
        port: Option<u16>,
    },
}
