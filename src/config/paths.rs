// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! prefix/
//!   storage/          (storage)
//!     Mods/<name>/    one directory per installed mod
//!     enabled.json    profile
//!   tmp/              (temp) archive staging
//!
//! game/
//!   data/             deploy target
//! ```
//!
//! `storage` and `temp` default to children of `prefix`; relative values are
//! resolved against it. `game` has no default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::MODS_DIR_NAME;
use crate::catalog::profile::PROFILE_FILE_NAME;
use crate::error::{ConfigError, Result};

/// Directory under the game root that receives patch files.
pub const GAME_DATA_DIR: &str = "data";

/// Storage, staging and game locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Base directory the other paths are relative to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<PathBuf>,
    /// Game installation directory (the one containing `data/`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<PathBuf>,
    /// Mod storage (default: prefix/storage).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<PathBuf>,
    /// Archive staging directory (default: prefix/tmp).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<PathBuf>,
}

impl PathsConfig {
    /// Resolve relative paths against prefix and fill in defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if the `prefix` path is not set.
    pub fn resolve(&mut self) -> Result<()> {
        let prefix = self.prefix.clone().ok_or_else(|| missing("prefix"))?;

        let resolve = |path: &mut Option<PathBuf>, default: Option<&str>| {
            *path = match (path.take(), default) {
                (Some(p), _) if p.is_relative() => Some(prefix.join(p)),
                (None, Some(default)) => Some(prefix.join(default)),
                (other, _) => other,
            };
        };

        resolve(&mut self.storage, Some("storage"));
        resolve(&mut self.temp, Some("tmp"));
        resolve(&mut self.game, None);

        Ok(())
    }

    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if the `prefix` path is not set.
    pub fn prefix(&self) -> Result<&Path> {
        self.prefix
            .as_deref()
            .ok_or_else(|| missing("prefix").into())
    }

    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `game` is not set.
    pub fn game(&self) -> Result<&Path> {
        self.game.as_deref().ok_or_else(|| missing("game").into())
    }

    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if neither `storage` nor `prefix`
    /// is set.
    pub fn storage(&self) -> Result<&Path> {
        self.storage
            .as_deref()
            .ok_or_else(|| missing("storage").into())
    }

    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if neither `temp` nor `prefix` is
    /// set.
    pub fn temp(&self) -> Result<&Path> {
        self.temp.as_deref().ok_or_else(|| missing("temp").into())
    }

    /// `game/data`, where patch files are deployed.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `game` is not set.
    pub fn data_dir(&self) -> Result<PathBuf> {
        Ok(self.game()?.join(GAME_DATA_DIR))
    }

    /// `storage/Mods`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `storage` is unresolved.
    pub fn mods_dir(&self) -> Result<PathBuf> {
        Ok(self.storage()?.join(MODS_DIR_NAME))
    }

    /// `storage/enabled.json`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if `storage` is unresolved.
    pub fn profile_file(&self) -> Result<PathBuf> {
        Ok(self.storage()?.join(PROFILE_FILE_NAME))
    }
}

fn missing(key: &str) -> ConfigError {
    ConfigError::MissingKey {
        section: "paths".to_string(),
        key: key.to_string(),
    }
}
