//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;

use blinkcam::Blink;

use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {}

pub async fn run(blink: &Blink, _args: LoginArgs) -> Result<()> {
    super::ensure_login(blink).await?;

    let header = blink
        .auth_header()
        .await
        .context("Login returned no auth header")?;

    output::success("Logged in successfully");
    println!();
    if let Some(username) = blink.credentials().await.username() {
        output::field("Username", username);
    }
    if let Some(region) = blink.region().await {
        output::field("Region", &region.to_string());
    }
    output::field("Host", header.host());

    Ok(())
}
