// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for hdmm-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! hdmm [global options] <command>
//! version | options | configs
//! list
//! add <archive>...
//! remove | enable | disable <mod>
//! move <mod> {up|down|N}
//! select <mod> <index>
//! toggle <mod> <option> {on|off}
//! choose <mod> <option> <sub>
//! deploy
//! purge
//! ```

pub mod global;
pub mod mods;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use crate::cli::mods::{AddArgs, ChooseArgs, ModArgs, MoveArgs, SelectArgs, ToggleArgs};
use clap::{Parser, Subcommand};

/// Helldivers 2 Mod Manager
///
/// Installs mods from archives and deploys their patch files into the game.
#[derive(Debug, Parser)]
#[command(
    name = "hdmm",
    author,
    version,
    about = "Helldivers 2 Mod Manager",
    long_about = "hdmm-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Installs Helldivers 2 mods from archives and deploys their\n\
                  patch files into the game's data directory.\n\n\
                  Invoking `hdmm -d some/prefix -g path/to/game deploy` purges\n\
                  the data directory and deploys every enabled mod in order.\n\
                  See `hdmm <command> --help` for more information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  By default, hdmm loads `hdmm.toml` from the current directory\n\
                  if it exists. Additional files can be specified with --config,\n\
                  those are loaded afterwards and override it. HDMM_SECTION__KEY\n\
                  environment variables override files, and --set overrides\n\
                  everything. Use --no-default-config to only use --config."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the config files used by hdmm.
    Configs,

    /// Lists installed mods in deployment order.
    List,

    /// Installs mods from archives.
    Add(AddArgs),

    /// Uninstalls a mod and deletes its directory.
    Remove(ModArgs),

    /// Enables a mod.
    Enable(ModArgs),

    /// Disables a mod.
    Disable(ModArgs),

    /// Changes a mod's position in the deployment order.
    Move(MoveArgs),

    /// Selects the option of a legacy mod.
    Select(SelectArgs),

    /// Turns an option of a v1 mod on or off.
    Toggle(ToggleArgs),

    /// Chooses the sub-option of a v1 mod option.
    Choose(ChooseArgs),

    /// Purges and deploys every enabled mod.
    Deploy,

    /// Deletes every deployed patch file from the game.
    Purge,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
