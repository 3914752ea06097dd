// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Outcome of a deployment or purge.

use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

use crate::patch::AssetId;

/// A mod that contributed nothing because it could not be resolved or scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModFailure {
    pub id: Uuid,
    /// Display name, if the mod is in the catalog.
    pub name: Option<String>,
    pub reason: String,
}

impl fmt::Display for ModFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "mod '{name}' ({}): {}", self.id, self.reason),
            None => write!(f, "mod {}: {}", self.id, self.reason),
        }
    }
}

/// A destination file that could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub asset_id: AssetId,
    pub index: u64,
    pub destination: PathBuf,
    pub message: String,
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "asset {} patch {}: '{}': {}",
            self.asset_id,
            self.index,
            self.destination.display(),
            self.message
        )
    }
}

/// Result of [`crate::deploy::Deployer::deploy`].
///
/// Mod-scoped and file-scoped failures are kept apart so the summary can
/// tell the user which mods were skipped and which files are damaged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    /// Mods whose files were merged.
    pub mods_deployed: usize,
    /// Patch files removed by the preceding purge.
    pub purged: usize,
    /// Destination files created, including empty placeholders.
    pub files_written: usize,
    pub mod_failures: Vec<ModFailure>,
    pub file_failures: Vec<FileFailure>,
}

impl DeployReport {
    /// Whether every requested mod and file made it.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mod_failures.is_empty() && self.file_failures.is_empty()
    }

    /// One-line summary followed by one line per failure.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = format!(
            "deployed {} mod(s), wrote {} file(s), purged {} file(s)",
            self.mods_deployed, self.files_written, self.purged
        );
        if !self.mod_failures.is_empty() {
            out.push_str(&format!("\n{} mod(s) skipped:", self.mod_failures.len()));
            for failure in &self.mod_failures {
                out.push_str(&format!("\n  {failure}"));
            }
        }
        if !self.file_failures.is_empty() {
            out.push_str(&format!("\n{} file(s) failed:", self.file_failures.len()));
            for failure in &self.file_failures {
                out.push_str(&format!("\n  {failure}"));
            }
        }
        out
    }
}

/// A patch file the purge could not delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Result of [`crate::deploy::purge::purge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub deleted: usize,
    pub failures: Vec<PurgeFailure>,
}

impl PurgeReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
