// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Option resolution.
//!
//! Turns a manifest and the user's selections into the ordered list of
//! directories, relative to the mod root, whose patch files are deployed.
//!
//! ```text
//! Legacy                         V1
//!   Options absent --> ["."]       Options absent --> ["."]
//!   Options[selected]              for each option i with choices[i].enabled:
//!                                    option.Include...
//!                                    SubOptions[choices[i].selected_sub].Include...
//! ```
//!
//! Resolution is pure: nothing here touches the filesystem.

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use crate::error::ResolveError;
use crate::manifest::{LegacyManifest, Manifest, V1Manifest, relative_path};

/// Per-option selection of a V1 mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionChoice {
    /// Whether the option contributes at all.
    pub enabled: bool,
    /// Index of the active sub-option. Ignored when the option has none.
    pub selected_sub: usize,
}

impl Default for OptionChoice {
    fn default() -> Self {
        Self {
            enabled: true,
            selected_sub: 0,
        }
    }
}

/// Runtime selection state of one mod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionState {
    /// Index into a Legacy manifest's `Options`.
    Legacy { selected: usize },
    /// One choice per top-level option of a V1 manifest.
    V1(Vec<OptionChoice>),
}

impl OptionState {
    /// Default state for `manifest`: first Legacy option, or every V1
    /// option enabled with its first sub-option selected.
    #[must_use]
    pub fn default_for(manifest: &Manifest) -> Self {
        match manifest {
            Manifest::Legacy(_) => Self::Legacy { selected: 0 },
            Manifest::V1(m) => Self::V1(vec![
                OptionChoice::default();
                m.options.as_ref().map_or(0, Vec::len)
            ]),
        }
    }
}

/// Computes the active include directories of a mod, in contribution order.
///
/// # Errors
///
/// - [`ResolveError::SchemaMismatch`] if `state` is for the other schema
/// - [`ResolveError::SelectionOutOfRange`] for a bad Legacy selection
/// - [`ResolveError::StateMismatch`] if V1 state has the wrong length
/// - [`ResolveError::SubOptionOutOfRange`] for a bad V1 sub-option selection
/// - [`ResolveError::InvalidIncludePath`] for a path leaving the mod root
pub fn resolve_include_paths(
    manifest: &Manifest,
    state: &OptionState,
) -> Result<Vec<PathBuf>, ResolveError> {
    match (manifest, state) {
        (Manifest::Legacy(m), OptionState::Legacy { selected }) => resolve_legacy(m, *selected),
        (Manifest::V1(m), OptionState::V1(choices)) => resolve_v1(m, choices),
        _ => Err(ResolveError::SchemaMismatch),
    }
}

fn resolve_legacy(manifest: &LegacyManifest, selected: usize) -> Result<Vec<PathBuf>, ResolveError> {
    let Some(options) = &manifest.options else {
        return Ok(vec![PathBuf::from(".")]);
    };
    let option = options
        .get(selected)
        .ok_or(ResolveError::SelectionOutOfRange {
            index: selected,
            len: options.len(),
        })?;
    Ok(vec![to_relative(option)?])
}

fn resolve_v1(manifest: &V1Manifest, choices: &[OptionChoice]) -> Result<Vec<PathBuf>, ResolveError> {
    let Some(options) = &manifest.options else {
        return Ok(vec![PathBuf::from(".")]);
    };
    if choices.len() != options.len() {
        return Err(ResolveError::StateMismatch {
            expected: options.len(),
            actual: choices.len(),
        });
    }

    let mut paths = Vec::new();
    for (i, (option, choice)) in options.iter().zip(choices).enumerate() {
        if !choice.enabled {
            continue;
        }

        for include in option.include.iter().flatten() {
            paths.push(to_relative(include)?);
        }

        // An empty list is only a validation warning; it contributes nothing
        let Some(subs) = option.sub_options.as_ref().filter(|s| !s.is_empty()) else {
            continue;
        };
        let sub = subs
            .get(choice.selected_sub)
            .ok_or(ResolveError::SubOptionOutOfRange {
                option: i,
                index: choice.selected_sub,
                len: subs.len(),
            })?;
        for include in &sub.include {
            paths.push(to_relative(include)?);
        }
    }

    Ok(paths)
}

fn to_relative(raw: &str) -> Result<PathBuf, ResolveError> {
    relative_path(raw).ok_or_else(|| ResolveError::InvalidIncludePath {
        path: raw.to_string(),
    })
}
