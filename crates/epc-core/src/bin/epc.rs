//! Local driver for the catalogue engine: runs one command and prints the
//! reply the chat bot would send.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use epc_core::commands::{self, Reply};
use epc_core::{CatalogueContext, EpcConfig};

const CLI_USER: &str = "cli";

#[derive(Parser)]
#[command(name = "epc")]
#[command(about = "Query the KIA Sportage parts catalogue and VIN registry", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides the settings file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a VIN in the registry
    Vin { vin: String },
    /// Show one part by number
    Part { part_number: String },
    /// Resolve a group code or a description pattern
    Group {
        #[arg(required = true, num_args = 1..)]
        pattern: Vec<String>,
    },
    /// List the registered catalogues
    Catalogues,
}

fn load_config(cli: &Cli) -> Result<EpcConfig, epc_core::EpcError> {
    let mut config = match &cli.config {
        Some(path) => EpcConfig::load(path)?,
        None => {
            let mut config = EpcConfig::default();
            config.apply_env_overrides();
            config
        }
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn print_reply(reply: &Reply) {
    println!("{}", reply.text);
    for media in &reply.media {
        println!("[image] {}", media.path().display());
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    let ctx = CatalogueContext::open(config);

    let reply = match &cli.command {
        Command::Vin { vin } => commands::vin(&ctx, CLI_USER, vin),
        Command::Part { part_number } => commands::part(&ctx, CLI_USER, "/p", part_number),
        Command::Group { pattern } => commands::group(&ctx, CLI_USER, "/g", &pattern.join(" ")),
        Command::Catalogues => {
            for code in ctx.catalogue_codes() {
                println!("{code}");
            }
            return ExitCode::SUCCESS;
        }
    };
    print_reply(&reply);
    ExitCode::SUCCESS
}
