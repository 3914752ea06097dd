// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Catalog commands: listing, installing, removing and configuring mods.
//!
//! Every command that changes the catalog saves the profile before it
//! returns.

use anyhow::{Context, anyhow};
use tracing::{info, warn};

use crate::archive::ArchiveExtractor;
use crate::catalog::{ModCatalog, ModEntry};
use crate::cli::mods::{AddArgs, ChooseArgs, ModArgs, MoveArgs, MovePosition, SelectArgs, ToggleArgs};
use crate::cmd::{find_mod, open_catalog};
use crate::config::Config;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::resolve::OptionState;

/// Renders the catalog, one block per mod in deployment order.
#[must_use]
pub fn format_mod_list(catalog: &ModCatalog) -> Vec<String> {
    let mut lines = Vec::new();
    for (position, entry) in catalog.list().enumerate() {
        let mark = if entry.state().enabled { 'x' } else { ' ' };
        lines.push(format!(
            "{position:>3}. [{mark}] {} ({})",
            entry.name(),
            entry.id()
        ));
        lines.extend(format_options(entry));
    }
    lines
}

fn format_options(entry: &ModEntry) -> Vec<String> {
    match (entry.manifest(), &entry.state().options) {
        (Manifest::Legacy(m), OptionState::Legacy { selected }) => m
            .options
            .as_deref()
            .and_then(|options| options.get(*selected))
            .map(|name| vec![format!("       option {selected}: {name}")])
            .unwrap_or_default(),
        (Manifest::V1(m), OptionState::V1(choices)) => m
            .options
            .as_deref()
            .unwrap_or_default()
            .iter()
            .zip(choices)
            .enumerate()
            .map(|(i, (option, choice))| {
                let mark = if choice.enabled { 'x' } else { ' ' };
                let sub = option
                    .sub_options
                    .as_deref()
                    .and_then(|subs| subs.get(choice.selected_sub))
                    .map(|s| format!(" -> {}", s.name))
                    .unwrap_or_default();
                format!("       [{mark}] option {i}: {}{sub}", option.name)
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Prints the installed mods.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn run_list_command(config: &Config) -> Result<()> {
    let catalog = open_catalog(config)?;
    if catalog.is_empty() {
        println!("No mods installed");
        return Ok(());
    }
    for line in format_mod_list(&catalog) {
        println!("{line}");
    }
    Ok(())
}

/// Installs each archive in turn; one failure doesn't stop the others.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the profile cannot be
/// saved, or any archive failed to install.
pub async fn run_add_command(args: &AddArgs, config: &Config) -> Result<()> {
    let mut catalog = open_catalog(config)?;
    let extractor = ArchiveExtractor::new();
    let mut failed = 0usize;

    for archive in &args.archives {
        match catalog.add_from_archive(archive, &extractor).await {
            Ok(added) => {
                for problem in &added.warnings {
                    warn!("{problem}");
                }
                let name = catalog
                    .get_by_id(&added.id)
                    .map_or_else(String::new, |m| m.name().to_string());
                println!("Installed '{name}' ({})", added.id);
            }
            Err(e) => {
                failed += 1;
                eprintln!("Failed to install '{}': {e}", archive.display());
                if let Some(staging) = e.staging_dir()
                    && let Err(cleanup) = tokio::fs::remove_dir_all(staging).await
                {
                    warn!(dir = %staging.display(), error = %cleanup, "staging directory not removed");
                }
            }
        }
    }

    catalog.save_profile()?;

    if failed > 0 {
        return Err(anyhow!(
            "{failed} of {} archive(s) failed to install",
            args.archives.len()
        ));
    }
    Ok(())
}

/// Uninstalls a mod.
///
/// # Errors
///
/// Returns an error if the mod is unknown or its directory cannot be deleted.
pub async fn run_remove_command(args: &ModArgs, config: &Config) -> Result<()> {
    let mut catalog = open_catalog(config)?;
    let id = find_mod(&catalog, &args.target)?;
    catalog
        .remove(&id)
        .await
        .with_context(|| format!("failed to remove '{}'", args.target))?;
    catalog.save_profile()?;
    println!("Removed '{}'", args.target);
    Ok(())
}

/// Enables or disables a mod.
///
/// # Errors
///
/// Returns an error if the mod is unknown or the profile cannot be saved.
pub fn run_set_enabled_command(args: &ModArgs, config: &Config, enabled: bool) -> Result<()> {
    edit_mod(config, &args.target, |entry| {
        entry.set_enabled(enabled);
        Ok(())
    })?;
    info!(mod_ref = %args.target, enabled, "mod state changed");
    Ok(())
}

/// Moves a mod in the deployment order.
///
/// # Errors
///
/// Returns an error if the mod is unknown or the profile cannot be saved.
pub fn run_move_command(args: &MoveArgs, config: &Config) -> Result<()> {
    let mut catalog = open_catalog(config)?;
    let id = find_mod(&catalog, &args.target)?;
    let moved = match args.position {
        MovePosition::Up => catalog.move_up(&id),
        MovePosition::Down => catalog.move_down(&id),
        MovePosition::To(index) => catalog.move_to(&id, index),
    };
    if moved {
        catalog.save_profile()?;
    }
    let position = catalog.position(&id).unwrap_or_default();
    println!("'{}' is at position {position}", args.target);
    Ok(())
}

/// Selects the option of a legacy mod.
///
/// # Errors
///
/// Returns an error if the mod is unknown, not a legacy mod, or the index
/// is out of range.
pub fn run_select_command(args: &SelectArgs, config: &Config) -> Result<()> {
    edit_mod(config, &args.target, |entry| Ok(entry.select(args.index)?))
}

/// Turns an option of a v1 mod on or off.
///
/// # Errors
///
/// Returns an error if the mod is unknown, not a v1 mod, or the option is
/// out of range.
pub fn run_toggle_command(args: &ToggleArgs, config: &Config) -> Result<()> {
    edit_mod(config, &args.target, |entry| {
        Ok(entry.toggle(args.option, args.state.is_on())?)
    })
}

/// Chooses the sub-option of a v1 mod option.
///
/// # Errors
///
/// Returns an error if the mod is unknown, not a v1 mod, or either index is
/// out of range.
pub fn run_choose_command(args: &ChooseArgs, config: &Config) -> Result<()> {
    edit_mod(config, &args.target, |entry| {
        Ok(entry.choose(args.option, args.sub)?)
    })
}

fn edit_mod(
    config: &Config,
    target: &str,
    edit: impl FnOnce(&mut ModEntry) -> Result<()>,
) -> Result<()> {
    let mut catalog = open_catalog(config)?;
    let id = find_mod(&catalog, target)?;
    let entry = catalog
        .get_mut(&id)
        .ok_or_else(|| anyhow!("mod '{target}' disappeared from the catalog"))?;
    edit(entry).with_context(|| format!("cannot change '{target}'"))?;
    catalog.save_profile()?;
    Ok(())
}
