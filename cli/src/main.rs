mod commands;
mod io;

use std::path::PathBuf;

use aegis_config::AegisConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "aegis", about = "Auditable identity encryption with threshold recovery")]
struct Cli {
    /// Config file (defaults to ./aegis.toml, then ~/.aegis/aegis.toml)
    #[arg(long, global = true, env = "AEGIS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive an identity keypair and its commitment from a seed
    Keygen {
        #[arg(long)]
        seed: String,
        /// Also print the nullifier for this leaf index
        #[arg(long)]
        leaf: Option<u64>,
    },
    /// Generate an auditor key and split its secret into shares
    Deal {
        #[arg(long)]
        threshold: Option<usize>,
        #[arg(long)]
        total: Option<usize>,
        /// Output directory (defaults to the configured share directory)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Replace a key and shares already dealt into the output directory
        #[arg(long)]
        force: bool,
    },
    /// Encrypt an identity to the auditor, writing proof inputs and the ciphertext
    Encrypt {
        #[arg(long)]
        seed: String,
        #[arg(long)]
        public_key: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Recover an identity from a ciphertext and a quorum of shares
    Decrypt {
        #[arg(long)]
        ciphertext: PathBuf,
        #[arg(long, num_args = 1..)]
        shares: Vec<PathBuf>,
    },
    /// Encrypt then threshold-decrypt, checking the identity survives
    Roundtrip {
        #[arg(long)]
        seed: String,
        #[arg(long)]
        public_key: Option<PathBuf>,
        #[arg(long, num_args = 1..)]
        shares: Vec<PathBuf>,
    },
    /// Print a sample aegis.toml with the default settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AegisConfig::load_from(path)?,
        None => AegisConfig::load().context("Failed to load configuration")?,
    };

    match cli.command {
        Command::Keygen { seed, leaf } => commands::keygen(&seed, leaf),
        Command::Deal {
            threshold,
            total,
            out,
            force,
        } => {
            let threshold = threshold.unwrap_or(config.threshold.threshold);
            let total = total.unwrap_or(config.threshold.total_shares);
            let out = out.unwrap_or_else(|| config.threshold.share_dir.clone());
            commands::deal(threshold, total, &out, force).await
        }
        Command::Encrypt {
            seed,
            public_key,
            out,
        } => {
            let public_key = public_key.unwrap_or_else(|| config.audit.public_key_path.clone());
            let out = out.unwrap_or_else(|| config.audit.output_dir.clone());
            commands::encrypt(&seed, &public_key, &out).await
        }
        Command::Decrypt { ciphertext, shares } => {
            let shares = commands::resolve_share_paths(shares, &config).await?;
            commands::decrypt(&ciphertext, &shares).await
        }
        Command::Roundtrip {
            seed,
            public_key,
            shares,
        } => {
            let public_key = public_key.unwrap_or_else(|| config.audit.public_key_path.clone());
            let shares = commands::resolve_share_paths(shares, &config).await?;
            commands::roundtrip(&seed, &public_key, &shares).await
        }
        Command::Config => {
            print!("{}", AegisConfig::generate_sample());
            Ok(())
        }
    }
}
