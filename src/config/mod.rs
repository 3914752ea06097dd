// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for hdmm-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. hdmm.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. HDMM_* env vars
//! 5. --set section/key=value and dedicated CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! HDMM_PATHS__PREFIX=/path      → paths.prefix = "/path"
//! HDMM_PATHS__GAME=/games/hd2   → paths.game = "/games/hd2"
//! HDMM_DEPLOY__CONCURRENCY=2    → deploy.concurrency = 2
//! ```

pub mod loader;
pub mod paths;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

use loader::ConfigLoader;
use paths::PathsConfig;
use types::{DeployConfig, GlobalConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Paths configuration.
    pub paths: PathsConfig,
    /// Deployment tuning.
    pub deploy: DeployConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hdmm_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("hdmm.toml")
    ///     .with_env_prefix("HDMM")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `deploy.concurrency` is 0.
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        if self.paths.prefix.is_some() {
            self.paths.resolve()?;
        }
        self.deploy.validate()?;
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap` and aligned on `=`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_paths_options(&mut options);
        self.format_deploy_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global.log_file.display().to_string(),
        );
    }

    fn format_paths_options(&self, options: &mut BTreeMap<String, String>) {
        let fmt = |p: &Option<PathBuf>| {
            p.as_ref()
                .map_or_else(String::new, |p| p.display().to_string())
        };

        options.insert("paths.prefix".into(), fmt(&self.paths.prefix));
        options.insert("paths.game".into(), fmt(&self.paths.game));
        options.insert("paths.storage".into(), fmt(&self.paths.storage));
        options.insert("paths.temp".into(), fmt(&self.paths.temp));
    }

    fn format_deploy_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "deploy.skip_list".into(),
            self.deploy.skip_list.join(", "),
        );
        options.insert(
            "deploy.concurrency".into(),
            self.deploy.concurrency().to_string(),
        );
    }
}
