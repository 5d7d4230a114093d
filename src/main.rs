use cityforge::app::{handle_fatal_error, initialize_app, AppConfig};
use cityforge::cli::{execute_command, Cli};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let app = AppConfig::new(verbose).with_config_path(cli.config);
    let result = match initialize_app(app).await {
        Ok((_, config)) => execute_command(cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        handle_fatal_error(e, verbose);
    }
}
