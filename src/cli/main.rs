//! # modeling-validate CLI Entry Point
//!
//! Validates a model file against the other models of a project directory.

use clap::Parser;
use modeling_validation::cli::commands::validate::{ValidateArgs, handle_validate};

/// Modeling repository validation toolchain.
#[derive(Parser, Debug)]
#[command(name = "modeling-validate", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate process, connector or extensions content.
    Validate(ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => handle_validate(&args)?,
    }

    Ok(())
}
