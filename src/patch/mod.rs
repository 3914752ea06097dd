// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Patch file naming convention and directory grouping.
//!
//! ```text
//! 9ba626afa44a3aa3.patch_0                  base
//! 9ba626afa44a3aa3.patch_0.gpu_resources    gpu
//! 9ba626afa44a3aa3.patch_0.stream           stream
//! '------.-------'       |
//!    asset id        patch index
//!  16 lowercase hex   decimal digits
//!
//! scan(dir): same asset id + same index --> one PatchFileTriplet
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use crate::error::PatchError;


static PATCH_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9a-f]{16})\.patch_([0-9]+)(?:\.(gpu_resources|stream))?$")
        .expect("patch file pattern is valid")
});

/// 16-character lowercase hexadecimal asset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId([u8; 16]);

impl AssetId {
    /// Parses an asset id. Only lowercase hex digits are accepted.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let bytes: [u8; 16] = s.as_bytes().try_into().ok()?;
        bytes
            .iter()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
            .then_some(Self(bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII hex digits are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("'{s}' is not a 16-digit lowercase hex asset id"))
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Which member of a triplet a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatchKind {
    Base,
    GpuResources,
    Stream,
}

impl PatchKind {
    pub const ALL: [Self; 3] = [Self::Base, Self::GpuResources, Self::Stream];

    /// File name suffix after `.patch_<index>`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Base => "",
            Self::GpuResources => ".gpu_resources",
            Self::Stream => ".stream",
        }
    }
}

/// A file name that follows the patch naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchFileName {
    pub asset_id: AssetId,
    pub index: u64,
    pub kind: PatchKind,
}

impl PatchFileName {
    /// Renders `<asset id>.patch_<index><suffix>`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.patch_{}{}", self.asset_id, self.index, self.kind.suffix())
    }
}

/// Parses a file name against the patch naming convention.
///
/// Returns `None` for anything else, including indices too large for `u64`.
#[must_use]
pub fn parse_patch_name(name: &str) -> Option<PatchFileName> {
    parse_with_digits(name).map(|(parsed, _)| parsed)
}

/// Like [`parse_patch_name`], also returning the index exactly as written.
fn parse_with_digits(name: &str) -> Option<(PatchFileName, &str)> {
    let caps = PATCH_FILE_NAME.captures(name)?;
    let asset_id = AssetId::parse(caps.get(1)?.as_str())?;
    let digits = caps.get(2)?.as_str();
    let index = digits.parse().ok()?;
    let kind = match caps.get(3).map(|m| m.as_str()) {
        None => PatchKind::Base,
        Some("gpu_resources") => PatchKind::GpuResources,
        Some(_) => PatchKind::Stream,
    };
    Some((
        PatchFileName {
            asset_id,
            index,
            kind,
        },
        digits,
    ))
}

/// Up to three source files for one asset id and patch index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchFileTriplet {
    pub base: Option<PathBuf>,
    pub gpu_resources: Option<PathBuf>,
    pub stream: Option<PathBuf>,
}

impl PatchFileTriplet {
    #[must_use]
    pub fn member(&self, kind: PatchKind) -> Option<&Path> {
        match kind {
            PatchKind::Base => self.base.as_deref(),
            PatchKind::GpuResources => self.gpu_resources.as_deref(),
            PatchKind::Stream => self.stream.as_deref(),
        }
    }

    pub fn set_member(&mut self, kind: PatchKind, path: PathBuf) {
        let slot = match kind {
            PatchKind::Base => &mut self.base,
            PatchKind::GpuResources => &mut self.gpu_resources,
            PatchKind::Stream => &mut self.stream,
        };
        *slot = Some(path);
    }

    /// Number of members present on disk.
    #[must_use]
    pub fn present(&self) -> usize {
        PatchKind::ALL
            .iter()
            .filter(|k| self.member(**k).is_some())
            .count()
    }
}

/// Triplets found in one directory, keyed by asset id.
///
/// Within an asset id, triplets are ordered by their source patch index,
/// then by how the index is written (`patch_0` before `patch_00`).
pub type ScanResult = BTreeMap<AssetId, Vec<PatchFileTriplet>>;

/// Scans the top level of `dir` for patch files and groups them.
///
/// Files that do not follow the naming convention and subdirectories are
/// ignored.
///
/// # Errors
///
/// - [`PatchError::IncludeNotFound`] if `dir` does not exist
/// - [`PatchError::Io`] if it cannot be listed
pub fn scan(dir: &Path) -> Result<ScanResult, PatchError> {
    let entries = std::fs::read_dir(dir).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            PatchError::IncludeNotFound {
                path: dir.to_path_buf(),
            }
        } else {
            PatchError::Io {
                path: dir.to_path_buf(),
                source,
            }
        }
    })?;

    // `patch_0` and `patch_00` are separate sources sharing a numeric index
    let mut grouped: BTreeMap<(AssetId, u64, String), PatchFileTriplet> = BTreeMap::new();

    for entry in entries {
        let entry = entry.map_err(|source| PatchError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let is_file = entry.file_type().is_ok_and(|t| t.is_file());
        let file_name = entry.file_name();
        let Some((parsed, digits)) = file_name.to_str().and_then(parse_with_digits) else {
            continue;
        };
        if !is_file {
            continue;
        }

        trace!(file = %entry.path().display(), "found patch file");
        grouped
            .entry((parsed.asset_id, parsed.index, digits.to_string()))
            .or_default()
            .set_member(parsed.kind, entry.path());
    }

    let mut result = ScanResult::new();
    for ((asset_id, _, _), triplet) in grouped {
        result.entry(asset_id).or_default().push(triplet);
    }

    debug!(
        dir = %dir.display(),
        assets = result.len(),
        triplets = result.values().map(Vec::len).sum::<usize>(),
        "scanned include directory"
    );
    Ok(result)
}
