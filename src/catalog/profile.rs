// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Profile persistence (`enabled.json`).
//!
//! ```text
//! [
//!   { "Guid": "...", "Enabled": true, "Toggled": [],           "Selected": [2] },    legacy
//!   { "Guid": "...", "Enabled": true, "Toggled": [true,false], "Selected": [0,1] }   v1
//! ]
//! ```
//!
//! Records are stored in deployment order.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ModRuntimeState;
use crate::error::CatalogError;
use crate::manifest::Manifest;
use crate::resolve::OptionState;

/// File name of the profile inside the storage directory.
pub const PROFILE_FILE_NAME: &str = "enabled.json";

/// Persisted runtime state of one mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileRecord {
    pub guid: Uuid,
    pub enabled: bool,
    #[serde(default)]
    pub toggled: Vec<bool>,
    #[serde(default)]
    pub selected: Vec<i64>,
}

impl ProfileRecord {
    /// Captures the state of a mod.
    #[must_use]
    pub fn capture(id: Uuid, state: &ModRuntimeState) -> Self {
        let (toggled, selected) = match &state.options {
            OptionState::Legacy { selected } => (Vec::new(), vec![to_i64(*selected)]),
            OptionState::V1(choices) => (
                choices.iter().map(|c| c.enabled).collect(),
                choices.iter().map(|c| to_i64(c.selected_sub)).collect(),
            ),
        };
        Self {
            guid: id,
            enabled: state.enabled,
            toggled,
            selected,
        }
    }

    /// Rebuilds runtime state for `manifest`.
    ///
    /// Arrays are clamped to the manifest: only the overlapping prefix is
    /// copied, and a selection that is negative or out of range falls back
    /// to 0.
    #[must_use]
    pub fn restore(&self, manifest: &Manifest) -> ModRuntimeState {
        let mut options = OptionState::default_for(manifest);

        match (&mut options, manifest) {
            (OptionState::Legacy { selected }, Manifest::Legacy(m)) => {
                let len = m.options.as_ref().map_or(0, Vec::len);
                *selected = self
                    .selected
                    .first()
                    .and_then(|s| in_range(*s, len))
                    .unwrap_or(0);
            }
            (OptionState::V1(choices), Manifest::V1(m)) => {
                let opts = m.options.as_deref().unwrap_or_default();
                for (choice, enabled) in choices.iter_mut().zip(&self.toggled) {
                    choice.enabled = *enabled;
                }
                for ((choice, selected), option) in
                    choices.iter_mut().zip(&self.selected).zip(opts)
                {
                    let len = option.sub_options.as_ref().map_or(0, Vec::len);
                    choice.selected_sub = in_range(*selected, len).unwrap_or(0);
                }
            }
            _ => {}
        }

        ModRuntimeState {
            enabled: self.enabled,
            options,
        }
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn in_range(value: i64, len: usize) -> Option<usize> {
    usize::try_from(value).ok().filter(|v| *v < len)
}

/// Reads the profile. A missing file yields `Ok(None)`.
///
/// # Errors
///
/// Returns [`CatalogError::Profile`] if the file cannot be read or parsed.
pub fn read_profile(path: &Path) -> Result<Option<Vec<ProfileRecord>>, CatalogError> {
    let profile_error = |message: String| CatalogError::Profile {
        path: path.to_path_buf(),
        message,
    };

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(profile_error(e.to_string())),
    };

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| profile_error(e.to_string()))
}

/// Writes the profile, replacing any existing file.
///
/// # Errors
///
/// Returns [`CatalogError::Profile`] if the file cannot be written.
pub fn write_profile(path: &Path, records: &[ProfileRecord]) -> Result<(), CatalogError> {
    let profile_error = |message: String| CatalogError::Profile {
        path: path.to_path_buf(),
        message,
    };

    let json = serde_json::to_string_pretty(records).map_err(|e| profile_error(e.to_string()))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| profile_error(e.to_string()))?;
    }
    std::fs::write(path, json).map_err(|e| profile_error(e.to_string()))
}
