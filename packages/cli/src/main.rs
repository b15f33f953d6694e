#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line entry point for the court summary parser.
//!
//! Input is a token JSON document produced by an external PDF word
//! extractor: either a flat array of `{x, y, text}` tokens or
//! `{"pages": [[{x0, top, text}, ...], ...]}` per-page word dumps.
//! Set `RUST_LOG` to see parser diagnostics.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use phl_courts_layout::page::TokenDocument;
use phl_courts_summary::{CourtSummaryParser, SummaryConfig};

#[derive(Parser)]
#[command(name = "phl_courts", about = "Court summary report parser")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a token document into a court summary
    Parse {
        /// Token JSON file
        input: PathBuf,
        /// TOML layout calibration overriding the built-in defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Omit the raw token list from the output
        #[arg(long)]
        slim: bool,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the assembled, reading-ordered token stream
    Tokens {
        /// Token JSON file
        input: PathBuf,
        /// TOML layout calibration overriding the built-in defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the effective layout calibration as TOML
    Config {
        /// TOML layout calibration overriding the built-in defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<SummaryConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(SummaryConfig::default());
    };
    log::debug!("Loading config from {}", path.display());
    Ok(SummaryConfig::from_toml_str(&std::fs::read_to_string(path)?)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            config,
            slim,
            pretty,
            output,
        } => {
            let parser = CourtSummaryParser::new(load_config(config.as_deref())?);
            let parsed = parser.parse_path(&input)?;

            for group in &parsed.discarded {
                log::warn!(
                    "Dropped {} tokens of repeated docket {}",
                    group.tokens.len(),
                    group.docket_number
                );
            }

            let json = if pretty {
                parsed.summary.to_json_pretty(slim)?
            } else {
                parsed.summary.to_json(slim)?
            };
            match output {
                Some(output) => {
                    std::fs::write(&output, json)?;
                    log::info!("Wrote {}", output.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Tokens { input, config } => {
            let config = load_config(config.as_deref())?;
            let document: TokenDocument =
                serde_json::from_str(&std::fs::read_to_string(&input)?)?;
            let tokens = document.into_tokens(config.footer_cutoff);
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", toml::to_string(&config)?);
        }
    }

    Ok(())
}
