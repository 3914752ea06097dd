// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mod manifest model.
//!
//! ```text
//! manifest.json
//!   no "Version" / null --> Manifest::Legacy   Options: [dir name]
//!   "Version": 1        --> Manifest::V1       Options: [ModOption]
//!   "Version": 2        --> OutOfSupportManifest
//!   other number        --> UnknownManifestVersion
//!
//! ModOption (toggle)
//!   Include: [path]?
//!   SubOptions: [SubOption]?   exactly one selected
//!     Include: [path]
//! ```
//!
//! Field names on disk are `PascalCase`. Every path inside a manifest is
//! relative to the mod's root directory; see [`relative_path`].

pub mod infer;
pub mod parse;
pub mod problem;
pub mod validate;


use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::ManifestError;

/// File name of the manifest inside a mod directory.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Schema version of a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// No `Version` field.
    Legacy,
    /// `"Version": 1`.
    V1,
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::V1 => write!(f, "v1"),
        }
    }
}

/// A parsed manifest, one of the supported schema versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Manifest {
    Legacy(LegacyManifest),
    V1(V1Manifest),
}

/// Manifest without a `Version` field.
///
/// `options` names mutually exclusive subdirectories of the mod root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyManifest {
    #[serde(rename = "Guid")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Manifest with `"Version": 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct V1Manifest {
    #[serde(rename = "Guid")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ModOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nexus_data: Option<NexusData>,
}

/// Independently toggleable option of a V1 manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModOption {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_options: Option<Vec<SubOption>>,
}

/// One of several mutually exclusive choices inside a [`ModOption`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubOption {
    pub name: String,
    pub description: String,
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Provenance tag for mods downloaded from Nexus Mods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NexusData {
    pub mod_id: u32,
    #[serde(deserialize_with = "trim_version_prefix")]
    pub version: String,
}

fn trim_version_prefix<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let version = String::deserialize(deserializer)?;
    Ok(version.trim_start_matches(['v', 'V']).to_string())
}

/// V1 manifest as written to disk, with the version tag in front.
#[derive(Serialize)]
struct VersionedV1<'a> {
    #[serde(rename = "Version")]
    version: u32,
    #[serde(flatten)]
    manifest: &'a V1Manifest,
}

impl Manifest {
    /// Schema version this manifest was read as.
    #[must_use]
    pub const fn schema_version(&self) -> SchemaVersion {
        match self {
            Self::Legacy(_) => SchemaVersion::Legacy,
            Self::V1(_) => SchemaVersion::V1,
        }
    }

    /// Globally unique mod identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Legacy(m) => m.id,
            Self::V1(m) => m.id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Legacy(m) => &m.name,
            Self::V1(m) => &m.name,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Legacy(m) => &m.description,
            Self::V1(m) => &m.description,
        }
    }

    #[must_use]
    pub fn icon_path(&self) -> Option<&str> {
        match self {
            Self::Legacy(m) => m.icon_path.as_deref(),
            Self::V1(m) => m.icon_path.as_deref(),
        }
    }

    /// Number of top-level options, or `None` when `Options` is absent.
    #[must_use]
    pub fn option_count(&self) -> Option<usize> {
        match self {
            Self::Legacy(m) => m.options.as_ref().map(Vec::len),
            Self::V1(m) => m.options.as_ref().map(Vec::len),
        }
    }

    /// Serializes the manifest in its on-disk form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            Self::Legacy(m) => serde_json::to_string_pretty(m),
            Self::V1(m) => serde_json::to_string_pretty(&VersionedV1 {
                version: 1,
                manifest: m,
            }),
        }
    }

    /// Writes the manifest to `dir/manifest.json`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Write`] if the file cannot be written.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ManifestError> {
        let path = dir.join(MANIFEST_FILE_NAME);
        let json = self.to_json().map_err(|e| ManifestError::Write {
            path: path.clone(),
            source: std::io::Error::other(e),
        })?;
        std::fs::write(&path, json).map_err(|source| ManifestError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Converts a manifest path into a relative filesystem path.
///
/// Both `/` and `\` separate components, since manifests are authored on
/// Windows and read everywhere. Returns `None` for absolute paths, drive
/// prefixes and anything that climbs out of the mod root with `..`. An
/// empty path or `"."` yields `"."`.
#[must_use]
pub fn relative_path(raw: &str) -> Option<PathBuf> {
    if raw.starts_with(['/', '\\']) || raw.get(1..2) == Some(":") {
        return None;
    }

    let mut out = PathBuf::new();
    for part in raw.split(['/', '\\']).filter(|p| !p.is_empty()) {
        match Path::new(part).components().next() {
            Some(Component::CurDir) => {}
            Some(Component::Normal(_)) if Path::new(part).components().count() == 1 => {
                out.push(part);
            }
            _ => return None,
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    Some(out)
}
