//! Command routing and execution

use crate::cli::args::Commands;
use crate::cli::commands::{run_parse_command, run_plan_command, run_serve_command, PlanOptions};
use crate::config::PlannerConfig;
use anyhow::Result;

/// Execute a CLI command with the loaded configuration
pub async fn execute_command(command: Commands, config: PlannerConfig) -> Result<()> {
    match command {
        Commands::Plan {
            description,
            no_optimize,
            no_final,
            no_assess,
            json,
        } => {
            run_plan_command(
                &config,
                &description,
                PlanOptions {
                    optimize: !no_optimize,
                    final_blueprint: !no_final,
                    assess: !no_assess,
                    json,
                },
            )
            .await
        }
        Commands::Parse {
            file,
            final_blueprint,
            json,
        } => run_parse_command(&file, final_blueprint, json).await,
        Commands::Serve { host, port } => run_serve_command(config, host, port).await,
    }
}
