//! Cameras command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use blinkcam::Blink;

use crate::output;

#[derive(Args, Debug)]
pub struct CamerasArgs {
    /// Output one JSON object per camera
    #[arg(long)]
    pub json: bool,
}

pub async fn run(blink: &Blink, args: CamerasArgs) -> Result<()> {
    super::ensure_login(blink).await?;
    blink.start().await.context("Failed to discover devices")?;

    let module = blink
        .sync_module()
        .await
        .context("No sync module discovered")?;

    if args.json {
        for camera in module.cameras().values() {
            output::json(camera)?;
        }
        return Ok(());
    }

    output::field("Sync module", module.name());
    output::field("Network", module.network_id());
    if module.cameras().is_empty() {
        println!("{}", "No cameras".dimmed());
    }
    for camera in module.cameras().values() {
        println!("  {} {}", camera.id.dimmed(), camera.name);
    }

    Ok(())
}
