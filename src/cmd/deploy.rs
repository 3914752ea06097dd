// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deploy and purge command implementations.

use anyhow::anyhow;
use tracing::{info, warn};

use crate::cmd::open_catalog;
use crate::config::Config;
use crate::deploy::Deployer;
use crate::error::Result;

fn deployer(config: &Config) -> Result<Deployer> {
    Ok(Deployer::new(config.paths.data_dir()?)
        .with_skip_set(config.deploy.skip_set())
        .with_concurrency(config.deploy.concurrency()))
}

/// Purges `game/data` and deploys every enabled mod in catalog order.
///
/// Ctrl+C before the purge starts aborts without touching the game.
///
/// # Errors
///
/// Returns an error if the deployment could not run at all, or if any mod
/// or file failed.
pub async fn run_deploy_command(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    let deployer = deployer(config)?;

    let cancel_token = deployer.cancel_token();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling deployment...");
            cancel_token.cancel();
        }
    });

    let ids = catalog.enabled_ids();
    info!(mods = ids.len(), "deploying enabled mods");
    let result = deployer.deploy(&ids, &catalog).await;
    signal.abort();

    let report = result?;
    println!("{}", report.summary());
    if report.is_clean() {
        Ok(())
    } else {
        Err(anyhow!("deployment finished with failures"))
    }
}

/// Deletes every deployed patch file.
///
/// # Errors
///
/// Returns an error if `game/data` is missing or any file could not be
/// deleted.
pub async fn run_purge_command(config: &Config) -> Result<()> {
    let report = deployer(config)?.purge().await?;
    println!("Purged {} file(s)", report.deleted);
    for failure in &report.failures {
        eprintln!("  {}: {}", failure.path.display(), failure.error);
    }
    if report.is_complete() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} patch file(s) could not be deleted",
            report.failures.len()
        ))
    }
}
