//! Ids command implementation.

use anyhow::{Context, Result};
use clap::Args;

use blinkcam::Blink;

use crate::output;

#[derive(Args, Debug)]
pub struct IdsArgs {}

pub async fn run(blink: &Blink, _args: IdsArgs) -> Result<()> {
    super::ensure_login(blink).await?;

    let ids = blink.get_ids().await.context("Failed to fetch ids")?;

    output::field("Network", &ids.network_id);
    output::field("Account", &ids.account_id);

    Ok(())
}
