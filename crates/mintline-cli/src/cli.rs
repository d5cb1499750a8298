use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mintline",
    about = "Mintline: create, mint, transfer, and burn a fungible token on a ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at DEBUG level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the token lifecycle: create or reuse, mint, transfer, burn
    Run(RunArgs),
    /// Host an in-memory ledger node over HTTP
    Serve(ServeArgs),
    /// Generate an authority keypair
    Keygen(KeygenArgs),
    /// Show an owner's balance of a token
    Balance(BalanceArgs),
    /// Fund an address from a node's faucet
    Airdrop(AirdropArgs),
}

/// Where the ledger lives and who signs.
#[derive(Args, Clone)]
pub struct LedgerArgs {
    /// Ledger node URL, or memory:// for a throwaway in-process ledger
    #[arg(long, env = "MINTLINE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Authority keypair as a JSON array of byte values
    #[arg(long, env = "MINTLINE_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,
}

impl std::fmt::Debug for LedgerArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerArgs")
            .field("endpoint", &self.endpoint)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub ledger: LedgerArgs,

    /// Reuse this token (hex address) instead of creating one
    #[arg(long, env = "MINTLINE_MINT_ADDRESS")]
    pub mint: Option<String>,

    /// Decimal precision of the token
    #[arg(long, default_value_t = 0)]
    pub decimals: u8,

    /// Raw units minted to the authority
    #[arg(long, default_value_t = 100)]
    pub supply: u64,

    /// Raw units sent to a freshly generated recipient
    #[arg(long, default_value_t = 1)]
    pub transfer: u64,

    /// Raw units burned from the authority's holding
    #[arg(long, default_value_t = 10)]
    pub burn: u64,

    /// Base URL for per-bundle explorer links
    #[arg(long, env = "MINTLINE_EXPLORER_URL")]
    pub explorer_url: Option<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Node configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct KeygenArgs {
    /// Write the keypair to this new file (owner-only) instead of stdout
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,
}

#[derive(Args)]
pub struct BalanceArgs {
    #[command(flatten)]
    pub ledger: LedgerArgs,

    /// Token (hex address)
    #[arg(long, env = "MINTLINE_MINT_ADDRESS")]
    pub mint: Option<String>,

    /// Holding owner (hex address); defaults to the authority
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Args)]
pub struct AirdropArgs {
    #[command(flatten)]
    pub ledger: LedgerArgs,

    /// Recipient (hex address); defaults to the authority
    #[arg(long)]
    pub address: Option<String>,

    #[arg(long, default_value_t = 1_000_000_000)]
    pub lamports: u64,
}
