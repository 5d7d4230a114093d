//! Error handling utilities

use crate::error::Error;
use tracing::error;

const GENERAL_ERROR: i32 = 1;
const USAGE_ERROR: i32 = 2;

/// Handle fatal errors and exit with appropriate status code
///
/// Configuration and input errors exit with 2, everything else with 1. With
/// `-v` the full error chain is printed as well.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);
    eprintln!("Error: {error}");

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code(&error))
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<Error>() {
        Some(err) if err.is_user_error() => USAGE_ERROR,
        _ => GENERAL_ERROR,
    }
}
