//! Command-line front end: `enigma <CONFIG> [INPUT] [OUTPUT]`.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use enigma::config::parse_config;
use enigma::driver::process_messages;

/// Encrypt or decrypt messages with a configured rotor machine.
#[derive(Debug, Parser)]
#[command(name = "enigma", version, about)]
struct Cli {
    /// Machine configuration file.
    config: PathBuf,
    /// Messages to process; reads standard input when omitted.
    input: Option<PathBuf>,
    /// Where to write the results; writes standard output when omitted.
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_text = fs::read_to_string(&cli.config)
        .with_context(|| format!("could not open {}", cli.config.display()))?;
    let mut machine = parse_config(&config_text)
        .and_then(|config| config.build())
        .with_context(|| format!("bad configuration in {}", cli.config.display()))?;
    info!("loaded machine from {}", cli.config.display());

    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("could not open {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("could not read standard input")?;
            buf
        }
    };

    let output = process_messages(&mut machine, &input)?;

    match &cli.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("could not write {}", path.display()))?,
        None => io::stdout()
            .write_all(output.as_bytes())
            .context("could not write standard output")?,
    }
    Ok(())
}
