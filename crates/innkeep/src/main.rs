// SPDX-FileCopyrightText: 2026 Innkeep Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Innkeep - a hotel-operations back office.
//!
//! Binary entry point: REST API plus the mailbox ticket-ingestion pipeline.

mod serve;

use clap::{Parser, Subcommand};

/// Innkeep - hotel-operations back office.
#[derive(Parser, Debug)]
#[command(name = "innkeep", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the API server and the mailbox ingestion service.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    // Load and validate configuration at startup.
    let config = match innkeep_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            innkeep_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match Cli::parse().command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("innkeep serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("innkeep: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = innkeep_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.service.name, "innkeep");
    }
}
