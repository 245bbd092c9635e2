//! Triple Generator CLI
//!
//! Resolves schema descriptors into per-file generation contexts.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use triple_gen::{loader, GeneratorConfig, Generator};

#[derive(Parser)]
#[command(name = "triple-gen")]
#[command(about = "Resolve cross-file types and import aliases for Triple stubs")]
#[command(version)]
struct Cli {
    /// Config file layered over the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build generation contexts and print them as JSON
    Resolve {
        /// Compilation unit JSON, or a directory of per-file JSON descriptors
        input: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the effective configuration
    Config {
        /// Write it to this file instead
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => GeneratorConfig::load_from(Some(path))?,
        None => GeneratorConfig::load()?,
    };

    match cli.command {
        Commands::Resolve {
            input,
            output,
            compact,
        } => {
            let unit = loader::load_unit(&input)?;
            let report = Generator::new(&config)?.run(&unit);

            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            match output {
                Some(path) => std::fs::write(&path, json)?,
                None => println!("{}", json),
            }

            for file in &report.files {
                for item in file.context.diagnostics.iter() {
                    eprintln!("{}", item);
                }
            }

            // Every failed file is reported, not just the first.
            report.into_result()?;
            Ok(())
        }

        Commands::Config { save } => {
            match save {
                Some(path) => {
                    config.save(&path)?;
                    eprintln!("Saved configuration to {}", path.display());
                }
                None => print!("{}", config.to_toml()?),
            }
            Ok(())
        }
    }
}
