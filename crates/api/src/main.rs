//! LoginKit demo
//!
//! Loads configuration, initialises logging and reports the persisted
//! session. Usage: `loginkit [status|token|logout]`.

use anyhow::{bail, Context};
use loginkit_api::AppContext;
use loginkit_infra::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = loginkit_infra::config::load().context("failed to load configuration")?;
    init_tracing(&config.logging).context("failed to initialize logging")?;

    let ctx = AppContext::new_with_config(config).context("failed to build application context")?;
    let command = std::env::args().nth(1).unwrap_or_else(|| "status".to_string());

    match command.as_str() {
        "status" => {}
        "token" => match ctx.service.acquire_token().await {
            Ok(_) => info!("Access token available"),
            Err(reason) => warn!(%reason, "No access token"),
        },
        "logout" => {
            if !ctx.service.logout() {
                info!("No session to log out of");
            }
        }
        other => bail!("unknown command `{other}` (expected status, token or logout)"),
    }

    let status = ctx.status();
    info!(
        logged_in = status.logged_in,
        token = %status.token,
        refreshable = status.refreshable,
        expires_at = ?status.expires_at,
        "Session status"
    );
    println!("{}", serde_json::to_string_pretty(&status)?);

    Ok(())
}
