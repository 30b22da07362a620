// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Quill CLI
//!
//! Entry point for the `quill` binary. Parses CLI arguments, initializes
//! logging, loads the protocol config, and runs one subcommand.
//!
//! - `keygen`   - generate or restore a keypair
//! - `sign`     - build and sign an arbitrary-payload transaction
//! - `decode`   - decode hex bytes into JSON
//! - `validate` - run the admission checks against a given balance and reference

mod cli;
mod commands;
mod logging;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;

use quill_protocol::clock::SystemClock;

use cli::{Commands, QuillCli};

fn main() -> Result<()> {
    let cli = QuillCli::parse();
    logging::init_logging("quill=info,quill_protocol=info", cli.log_format);

    let config = settings::load_protocol_config(cli.config.as_deref())?;
    let clock = SystemClock;

    let output = match &cli.command {
        Commands::Keygen(args) => commands::keygen(args)?,
        Commands::Sign(args) => commands::sign(args, &clock)?,
        Commands::Decode(args) => commands::decode(args)?,
        Commands::Validate(args) => commands::validate(args, &config, &clock)?,
    };

    let rendered = serde_json::to_string_pretty(&output).context("failed to render output")?;
    println!("{}", rendered);
    Ok(())
}
