//! ninaAPI Release - release automation for the Advanced API NINA plugin.
//!
//! Builds, packages and publishes the plugin, registers its manifest and
//! optionally deploys the API documentation.

use ninaapi_release::cli;
use ninaapi_release::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Create output manager for error display (never quiet for fatal errors)
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {e}"));

            // Show recovery suggestions for critical errors
            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }
            if e.is_recoverable() {
                let _ = output.println("Fix the problem above and rerun the same command.");
            }

            process::exit(1);
        }
    }
}
