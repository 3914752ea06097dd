// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Validation problems reported for a mod directory.
//!
//! ```text
//! warnings (mod still admitted)     errors (mod excluded)
//!   NoManifestFound                   CantParseManifest
//!   EmptyOptions                      UnknownManifestVersion
//!   EmptySubOptions                   OutOfSupportManifest
//!   EmptyIncludes                     Duplicate
//!                                     InvalidPath
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of a [`ValidationProblem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    NoManifestFound,
    EmptyOptions,
    EmptySubOptions,
    EmptyIncludes,
    CantParseManifest,
    UnknownManifestVersion,
    OutOfSupportManifest,
    Duplicate,
    InvalidPath,
}

impl ProblemKind {
    /// Whether this problem excludes the mod from the catalog.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Self::CantParseManifest
                | Self::UnknownManifestVersion
                | Self::OutOfSupportManifest
                | Self::Duplicate
                | Self::InvalidPath
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoManifestFound => "no manifest found, inferred one",
            Self::EmptyOptions => "empty options list",
            Self::EmptySubOptions => "empty sub-options list",
            Self::EmptyIncludes => "empty include list",
            Self::CantParseManifest => "manifest cannot be parsed",
            Self::UnknownManifestVersion => "unknown manifest version",
            Self::OutOfSupportManifest => "manifest version is no longer supported",
            Self::Duplicate => "duplicate mod",
            Self::InvalidPath => "invalid path",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A warning or error found while loading a mod directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationProblem {
    kind: ProblemKind,
    directory: PathBuf,
    extra: Option<String>,
}

impl ValidationProblem {
    #[must_use]
    pub fn new(kind: ProblemKind, directory: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            directory: directory.into(),
            extra: None,
        }
    }

    /// Attaches extra data, such as the offending path.
    #[must_use]
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ProblemKind {
        self.kind
    }

    /// Mod directory the problem was found in.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub fn extra(&self) -> Option<&str> {
        self.extra.as_deref()
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.kind.is_error()
    }
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = if self.is_error() { "error" } else { "warning" };
        write!(f, "{severity}: {} in '{}'", self.kind, self.directory.display())?;
        if let Some(extra) = &self.extra {
            write!(f, ": {extra}")?;
        }
        Ok(())
    }
}
