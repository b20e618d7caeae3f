//! Command implementations.

pub mod cameras;
pub mod ids;
pub mod login;
pub mod summary;

use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{debug, warn};

use blinkcam::{Blink, BlinkConfig, Credentials};

use crate::cli::{AccountArgs, Commands};

pub async fn handle(account: &AccountArgs, command: Commands) -> Result<()> {
    let blink = client(account)?;

    match command {
        Commands::Login(args) => login::run(&blink, args).await,
        Commands::Ids(args) => ids::run(&blink, args).await,
        Commands::Summary(args) => summary::run(&blink, args).await,
        Commands::Cameras(args) => cameras::run(&blink, args).await,
    }
}

/// Build a client from the shared account options.
fn client(account: &AccountArgs) -> Result<Blink> {
    let mut config = BlinkConfig::builder().timeout(Duration::from_secs(account.timeout));
    if let Some(api_base) = &account.api_base {
        config = config.api_base_template(api_base);
    }

    Blink::builder()
        .credentials(Credentials::from_parts(
            account.username.clone(),
            account.password.clone(),
        ))
        .config(config.build())
        .build()
        .context("Failed to create client")
}

/// Log in, prompting only when a credential is missing.
pub(crate) async fn ensure_login(blink: &Blink) -> Result<()> {
    if blink.auth_header().await.is_some() {
        debug!("Reusing cached auth header");
        return Ok(());
    }

    eprintln!("{}", "Logging in...".dimmed());

    let credentials = blink.credentials().await;
    if credentials.has_username() && credentials.has_password() {
        blink.get_auth_token().await.context("Failed to login")?;
    } else {
        warn!("Credentials incomplete, prompting");
        blink.login().await.context("Failed to login")?;
    }
    debug!("Logged in");
    Ok(())
}
