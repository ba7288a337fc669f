//! Edgeship CLI - deploy compute packages to the edge

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;

use edgeship_cli::cli::Cli;
use edgeship_cli::logging;
use edgeship_cli::output::json;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = cli.run().await {
        if json_mode {
            if let Ok(out) = json::format_error(&e.to_string(), json::error_code(&e)) {
                println!("{out}");
            }
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}
