// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config:  options, configs
//!   mods:    list, add, remove, enable, disable, move, select, toggle, choose
//!   deploy:  deploy, purge
//! ```

pub mod config;
pub mod deploy;
pub mod mods;

#[cfg(test)]
mod tests;

use anyhow::{Context, anyhow};
use tracing::{error, warn};
use uuid::Uuid;

use crate::catalog::ModCatalog;
use crate::config::Config;
use crate::error::Result;

/// Loads the catalog from the configured storage and logs every problem.
///
/// # Errors
///
/// Returns an error if `paths.storage`/`paths.temp` are unresolved or the
/// mods directory cannot be read.
pub fn open_catalog(config: &Config) -> Result<ModCatalog> {
    let storage = config.paths.storage()?;
    let temp = config.paths.temp()?;
    let (catalog, problems) = ModCatalog::load(storage, temp)
        .with_context(|| format!("failed to load mods from '{}'", storage.display()))?;

    for problem in &problems {
        if problem.is_error() {
            error!("{problem}");
        } else {
            warn!("{problem}");
        }
    }
    Ok(catalog)
}

/// Looks up a mod by GUID or exact display name.
///
/// # Errors
///
/// Returns an error if no installed mod matches.
pub fn find_mod(catalog: &ModCatalog, query: &str) -> Result<Uuid> {
    catalog
        .find(query)
        .map(crate::catalog::ModEntry::id)
        .ok_or_else(|| anyhow!("no installed mod is named or identified by '{query}'"))
}
