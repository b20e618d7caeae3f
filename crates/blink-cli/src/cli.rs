//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::{cameras, ids, login, summary};

/// Blink camera account explorer.
#[derive(Parser, Debug)]
#[command(name = "blink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub account: AccountArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Account and endpoint options shared by every command.
#[derive(Args, Debug)]
pub struct AccountArgs {
    /// Account email; prompted for when absent
    #[arg(long, env = "BLINK_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account password; prompted for (without echo) when absent
    #[arg(long, env = "BLINK_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// API base URL template, `{region}` is replaced by the account region
    #[arg(long, env = "BLINK_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and show the account region
    Login(login::LoginArgs),

    /// Show the network and account ids
    Ids(ids::IdsArgs),

    /// Print the account summary (homescreen)
    Summary(summary::SummaryArgs),

    /// List the cameras registered to the sync module
    Cameras(cameras::CamerasArgs),
}
