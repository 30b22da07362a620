//! # CLI Interface
//!
//! Defines the command-line argument structure for `quill` using `clap`
//! derive. Every subcommand prints a single JSON document to stdout.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use quill_protocol::transaction::Amount;

use crate::logging::LogFormat;

/// Quill ledger transaction tool.
///
/// Generates keys, signs arbitrary-payload transactions, and decodes or
/// validates encoded transactions against a one-account ledger snapshot.
#[derive(Parser, Debug)]
#[command(
    name = "quill",
    about = "Quill ledger transaction tool",
    version,
    propagate_version = true
)]
pub struct QuillCli {
    /// Path to a protocol config file (JSON).
    ///
    /// When omitted, the mainnet activation schedule is used.
    #[arg(long, short = 'c', env = "QUILL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log output format. Logs always go to stderr.
    #[arg(long, env = "QUILL_LOG_FORMAT", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `quill` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a keypair and print its public key and address.
    Keygen(KeygenArgs),
    /// Build and sign an arbitrary-payload transaction.
    Sign(SignArgs),
    /// Decode a hex-encoded transaction and print it as JSON.
    Decode(DecodeArgs),
    /// Validate a hex-encoded transaction against a creator balance and
    /// last reference.
    Validate(ValidateArgs),
}

/// Arguments for the `keygen` subcommand.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Hex-encoded 32-byte seed. A random key is generated when omitted.
    #[arg(long)]
    pub seed: Option<String>,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Hex-encoded Ed25519 secret key of the creator.
    ///
    /// **Never pass this flag on a shared machine**: prefer the environment
    /// variable.
    #[arg(long, env = "QUILL_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Service number tagging the payload.
    #[arg(long, allow_negative_numbers = true)]
    pub service: i32,

    /// Payload as UTF-8 text.
    #[arg(long, conflicts_with = "data_hex", required_unless_present = "data_hex")]
    pub data: Option<String>,

    /// Payload as hex.
    #[arg(long)]
    pub data_hex: Option<String>,

    /// Fee with up to 8 decimal places, e.g. `0.00000100`.
    #[arg(long)]
    pub fee: Amount,

    /// Base58 signature of the creator's last applied transaction.
    #[arg(long)]
    pub reference: String,

    /// Timestamp in Unix milliseconds. Defaults to now.
    #[arg(long)]
    pub timestamp: Option<i64>,
}

/// Arguments for the `decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded transaction bytes.
    pub hex: String,
}

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Hex-encoded transaction bytes.
    pub hex: String,

    /// Confirmed balance of the creator.
    #[arg(long)]
    pub balance: Amount,

    /// Base58 last reference of the creator. Omit for an account with no
    /// history.
    #[arg(long)]
    pub last_reference: Option<String>,

    /// Validation time in Unix milliseconds. Defaults to now.
    #[arg(long)]
    pub now: Option<i64>,
}
