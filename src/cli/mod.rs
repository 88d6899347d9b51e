use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::engine::{compute_address, prepare_to_sign, StaticKeyProvider};

/// tvc-address-engine CLI
#[derive(Parser, Debug)]
#[command(name = "tvc-address-engine")]
#[command(about = "Derive TON contract addresses and signing preimages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive a contract address from a TVC image and a public key
    Address {
        /// Path to the TVC (Bag of Cells) file
        #[arg(short, long)]
        tvc: PathBuf,
        /// Account index passed to the key provider
        #[arg(short = 'n', long = "account-index")]
        account_index: u32,
        /// 64-character hex public key to splice into the image
        #[arg(short, long = "public-key")]
        public_key: String,
    },
    /// Build a signing preimage from a 2-cell message
    Sign {
        /// Path to the message (Bag of Cells) file
        #[arg(short, long)]
        message: PathBuf,
        /// 64-character hex of the expected source address
        #[arg(short, long = "src-address")]
        src_address: String,
    },
}

fn parse_hex32(s: &str, label: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(s).with_context(|| format!("{label} is not valid hex"))?;
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("{label} must be exactly 32 bytes"))
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Address { tvc, account_index, public_key } => {
                self.execute_address(tvc, *account_index, public_key)
            }
            Commands::Sign { message, src_address } => self.execute_sign(message, src_address),
        }
    }

    fn execute_address(&self, tvc: &PathBuf, account_index: u32, public_key: &str) -> Result<()> {
        let tvc_bytes = fs::read(tvc).with_context(|| format!("reading {}", tvc.display()))?;
        let key = parse_hex32(public_key, "public key")?;
        let keys = StaticKeyProvider(key);

        let address = compute_address(account_index, &tvc_bytes, &keys)
            .map_err(|e| anyhow::anyhow!("address derivation failed: {e}"))?;
        log::info!("address: {}", hex::encode(address));
        println!("{}", hex::encode(address));
        Ok(())
    }

    fn execute_sign(&self, message: &PathBuf, src_address: &str) -> Result<()> {
        let message_bytes = fs::read(message).with_context(|| format!("reading {}", message.display()))?;
        let src = parse_hex32(src_address, "source address")?;

        let preimage = prepare_to_sign(&message_bytes, &src)
            .map_err(|e| anyhow::anyhow!("preimage assembly failed: {e}"))?;
        log::info!("destination: {}", preimage.destination);
        log::info!("amount: {}", preimage.amount_display);
        println!("digest: {}", hex::encode(preimage.digest));
        println!("destination: {}", preimage.destination);
        println!("amount: {}", preimage.amount_display);
        Ok(())
    }
}
