use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tern_crypto::SpongeKind;

#[derive(Parser)]
#[command(
    name = "tern",
    about = "Ternary addresses, hashing, and bundle signing",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a random 81-tryte seed
    Seed,
    /// Derive addresses from a seed
    Address(AddressArgs),
    /// Hash trytes with Curl or Kerl
    Hash(HashArgs),
    /// Build and finalize a bundle from JSON entries
    Bundle(BundleArgs),
    /// Sign the inputs of a finalized bundle
    Sign(SignArgs),
    /// Validate a signed bundle
    Validate(InputArgs),
    /// Serialize a bundle into transaction trytes, one per line
    Encode(InputArgs),
    /// Parse transaction trytes, one per line, into a bundle
    Decode(InputArgs),
}

#[derive(Args)]
pub struct SeedArgs {
    /// Seed trytes
    #[arg(long)]
    pub seed: String,
    /// Key index
    #[arg(short, long, default_value = "0")]
    pub index: u64,
    /// Security level (1-3); defaults to the configured level
    #[arg(short, long)]
    pub security: Option<u8>,
}

#[derive(Args)]
pub struct AddressArgs {
    #[command(flatten)]
    pub key: SeedArgs,
    /// Number of consecutive addresses to derive
    #[arg(short = 'n', long, default_value = "1")]
    pub count: u64,
}

#[derive(Args)]
pub struct HashArgs {
    /// Trytes to hash
    pub trytes: String,
    /// Sponge to use; defaults to the configured sponge
    #[arg(long)]
    pub sponge: Option<SpongeKind>,
}

#[derive(Args)]
pub struct InputArgs {
    /// Input file, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,
}

#[derive(Args)]
pub struct BundleArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Override the finalize attempt budget
    #[arg(long)]
    pub max_attempts: Option<usize>,
}

#[derive(Args)]
pub struct SignArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub key: SeedArgs,
}
