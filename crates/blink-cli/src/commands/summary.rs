//! Summary command implementation.

use anyhow::{Context, Result};
use clap::Args;

use blinkcam::Blink;

use crate::output;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(blink: &Blink, args: SummaryArgs) -> Result<()> {
    super::ensure_login(blink).await?;

    let summary = blink
        .summary_request()
        .await
        .context("Failed to fetch summary")?;

    if args.pretty {
        output::json_pretty(&summary)
    } else {
        output::json(&summary)
    }
}
