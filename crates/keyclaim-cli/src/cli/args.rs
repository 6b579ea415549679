//! Command-line argument definitions using clap.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Claim a subdomain with a cryptographic key and keep its address current.
///
/// Ownership is proven solely by possession of the private key: the first
/// key to claim a name keeps it.
#[derive(Parser, Debug)]
#[command(name = "keyclaim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Claim a subdomain and update its address
    Update(UpdateArgs),

    /// Create the credential file and print the public key
    Keygen(KeygenArgs),

    /// Run the claim-and-update server
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// The subdomain you want to claim (min 4 chars, a-z and 0-9 only)
    #[arg(short, long)]
    pub name: String,

    /// Path to your private key file (created on first run)
    #[arg(short, long, default_value = "keyclaim.key")]
    pub key: PathBuf,

    /// URL of the update endpoint
    #[arg(short, long, env = "KEYCLAIM_URL")]
    pub url: String,

    /// Keep running and update on a fixed interval
    #[arg(short, long)]
    pub daemon: bool,

    /// Minutes between updates in daemon mode
    #[arg(long, default_value_t = 30)]
    pub interval_mins: u64,
}

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Path to the private key file
    #[arg(short, long, default_value = "keyclaim.key")]
    pub key: PathBuf,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base domain under which subdomains are claimed
    #[arg(long, env = "KEYCLAIM_DOMAIN")]
    pub domain: Option<String>,

    /// Listen address
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,
}
