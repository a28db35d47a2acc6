use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use grc_types::Network;

#[derive(Parser)]
#[command(
    name = "grc",
    about = "GRC-20 edit publisher: assemble knowledge-graph edits and publish them on-chain",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file; `GRC_*` environment variables override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP proxy and session server
    Serve(ServeArgs),
    /// Validate operations and run the publishing pipeline
    Publish(PublishArgs),
    /// Fetch transaction call data for a published edit
    Calldata(CalldataArgs),
    /// Report the on-chain and indexing status of a transaction
    Verify(VerifyArgs),
    /// Validate operations and show their effect on the graph
    Validate(ValidateArgs),
    /// Generate identifiers
    Id(IdArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Overrides `server.bind_addr`
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct PublishArgs {
    /// JSON array of operation drafts
    #[arg(long)]
    pub ops: PathBuf,
    /// Edit name
    #[arg(short, long)]
    pub name: String,
    /// Target space; defaults to `default_space_id`
    #[arg(long)]
    pub space: Option<String>,
    /// Run against in-process services; nothing leaves the machine
    #[arg(long)]
    pub dry_run: bool,
    /// Stop once call data is ready
    #[arg(long)]
    pub no_send: bool,
    /// Poll for the receipt after sending
    #[arg(long, conflicts_with_all = ["dry_run", "no_send"])]
    pub wait: bool,
}

#[derive(Args)]
pub struct CalldataArgs {
    #[arg(long)]
    pub space: String,
    #[arg(long)]
    pub cid: String,
    /// Overrides the configured network
    #[arg(long)]
    pub network: Option<Network>,
}

#[derive(Args)]
pub struct VerifyArgs {
    #[arg(long)]
    pub tx: String,
    #[arg(long)]
    pub space: Option<String>,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[arg(long)]
    pub ops: PathBuf,
}

#[derive(Args)]
pub struct IdArgs {
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,
}
