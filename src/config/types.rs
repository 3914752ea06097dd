// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for hdmm-rs.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, PathsConfig, DeployConfig
//!
//! [deploy]
//! skip_list   = ["9ba626afa44a3aa3"]   numbering for these starts at patch_1
//! concurrency = 8                      scan/copy limit (default: CPU count)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::thread::available_parallelism;

use tracing::warn;

use crate::error::ConfigError;
use crate::logging::LogLevel;
use crate::patch::AssetId;

/// Fallback when the CPU count cannot be queried.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Number of CPU cores, or [`DEFAULT_CONCURRENCY`] if that is unknown.
#[must_use]
pub fn default_concurrency() -> usize {
    available_parallelism().map_or(DEFAULT_CONCURRENCY, std::num::NonZeroUsize::get)
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file.
    pub log_file: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: PathBuf::from("hdmm.log"),
        }
    }
}

/// Deployment tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    /// Asset ids whose deployed numbering starts at 1 instead of 0.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skip_list: Vec<String>,
    /// Maximum parallel scans and copies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

impl DeployConfig {
    /// Parses the skip list into asset ids.
    ///
    /// Entries are lower-cased first. Anything that is not 16 characters long
    /// or not hex is dropped with a warning.
    #[must_use]
    pub fn skip_set(&self) -> BTreeSet<AssetId> {
        self.skip_list
            .iter()
            .filter_map(|raw| {
                let entry = raw.trim().to_ascii_lowercase();
                if entry.len() != 16 {
                    warn!(entry = %raw, "skip list entry is not 16 characters long, ignoring");
                    return None;
                }
                let id = AssetId::parse(&entry);
                if id.is_none() {
                    warn!(entry = %raw, "skip list entry is not a hex asset id, ignoring");
                }
                id
            })
            .collect()
    }

    /// Effective concurrency: the configured value or the CPU count.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(default_concurrency)
    }

    /// Rejects values that cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `concurrency` is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == Some(0) {
            return Err(ConfigError::InvalidValue {
                section: "deploy".to_string(),
                key: "concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
