// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                  HdmmError (~24 bytes)
//!                         |
//!   +--------+-------+-------+------+------+------+
//!   |        |       |       |      |      |      |
//!   v        v       v       v      v      v      v
//! Manifest Catalog Resolve Patch Deploy Purge  Cfg/Archive/Io/Other
//!  Box      Box     Box     Box   Box    Box   Box / Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Manifest  Read, Parse, UnknownVersion, OutOfSupport, Write
//!   Catalog   Extraction, Rejected, Duplicate, Move, Profile, Io
//!   Resolve   SelectionOutOfRange, StateMismatch, SubOptionOutOfRange, ...
//!   Patch     IncludeNotFound, Io
//!   Deploy    DataDirMissing, DataDirInaccessible, PurgeIncomplete, Cancelled
//!   Purge     DataDirMissing, ReadDir
//!   Config    MissingKey, InvalidValue
//!   Archive   UnsupportedFormat, Zip, SevenZip, Io
//!
//! All variants boxed => HdmmError fits in 24 bytes.
//! ```
//!
//! Validation problems found in a mod directory are data, not errors;
//! see [`crate::manifest::problem`].

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::problem::{ProblemKind, ValidationProblem};

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`HdmmError`].
pub type HdmmResult<T> = std::result::Result<T, HdmmError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum HdmmError {
    /// Manifest could not be read or understood.
    #[error("manifest error: {0}")]
    Manifest(#[from] Box<ManifestError>),

    /// Catalog operation failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] Box<CatalogError>),

    /// Option resolution failed for a mod.
    #[error("resolve error: {0}")]
    Resolve(#[from] Box<ResolveError>),

    /// Patch file scanning failed.
    #[error("patch error: {0}")]
    Patch(#[from] Box<PatchError>),

    /// Deployment aborted.
    #[error("deploy error: {0}")]
    Deploy(#[from] Box<DeployError>),

    /// Purge aborted.
    #[error("purge error: {0}")]
    Purge(#[from] Box<PurgeError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Archive extraction error.
    #[error("archive error: {0}")]
    Archive(#[from] Box<ArchiveError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for HdmmError {
                fn from(err: $error) -> Self {
                    HdmmError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ManifestError => Manifest,
    CatalogError => Catalog,
    ResolveError => Resolve,
    PatchError => Patch,
    DeployError => Deploy,
    PurgeError => Purge,
    ConfigError => Config,
    ArchiveError => Archive,
    std::io::Error => Io,
}

// --- Manifest Errors ---

/// Failures while reading or writing a `manifest.json`.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest file could not be read.
    #[error("failed to read manifest '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid JSON or does not match either schema.
    #[error("failed to parse manifest '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// `Version` is a number this program has never heard of.
    #[error("manifest '{path}' has unknown version {version}")]
    UnknownVersion { path: PathBuf, version: String },

    /// `Version` 2 is an end-of-life schema.
    #[error("manifest '{path}' uses end-of-life version 2")]
    OutOfSupport { path: PathBuf },

    /// Manifest could not be written back to disk.
    #[error("failed to write manifest '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Problem kind reported for this failure.
    #[must_use]
    pub const fn problem_kind(&self) -> ProblemKind {
        match self {
            Self::UnknownVersion { .. } => ProblemKind::UnknownManifestVersion,
            Self::OutOfSupport { .. } => ProblemKind::OutOfSupportManifest,
            Self::Read { .. } | Self::Parse { .. } | Self::Write { .. } => {
                ProblemKind::CantParseManifest
            }
        }
    }
}

// --- Catalog Errors ---

/// Catalog mutation errors.
///
/// Every variant that involves a staging directory carries its path so the
/// caller can clean it up.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The archive could not be extracted.
    #[error("failed to extract '{archive}' into '{staging}': {source}")]
    Extraction {
        archive: PathBuf,
        staging: PathBuf,
        #[source]
        source: ArchiveError,
    },

    /// The extracted mod has blocking validation problems.
    #[error("mod in '{staging}' was rejected with {} problem(s)", problems.len())]
    Rejected {
        staging: PathBuf,
        problems: Vec<ValidationProblem>,
    },

    /// A mod directory with the same name already exists in storage.
    #[error("mod directory '{destination}' already exists")]
    Duplicate {
        destination: PathBuf,
        staging: PathBuf,
    },

    /// The staged mod could not be moved into storage.
    #[error("failed to move '{from}' to '{to}': {message}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    /// The profile file could not be read, parsed or written.
    #[error("profile '{path}': {message}")]
    Profile { path: PathBuf, message: String },

    /// Generic I/O failure on a catalog path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Staging directory left behind by a failed import, if any.
    #[must_use]
    pub fn staging_dir(&self) -> Option<&std::path::Path> {
        match self {
            Self::Extraction { staging, .. }
            | Self::Rejected { staging, .. }
            | Self::Duplicate { staging, .. } => Some(staging),
            Self::Move { from, .. } => Some(from),
            Self::Profile { .. } | Self::Io { .. } => None,
        }
    }
}

// --- Resolve Errors ---

/// Runtime option state does not fit the manifest it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Legacy selection points past the end of `Options`.
    #[error("selected option {index} is out of range ({len} options)")]
    SelectionOutOfRange { index: usize, len: usize },

    /// V1 state arrays do not have one entry per option.
    #[error("option state has {actual} entries but the manifest has {expected} options")]
    StateMismatch { expected: usize, actual: usize },

    /// V1 sub-option selection points past the end of `SubOptions`.
    #[error("option {option}: selected sub-option {index} is out of range ({len} sub-options)")]
    SubOptionOutOfRange {
        option: usize,
        index: usize,
        len: usize,
    },

    /// Legacy state was handed a V1 manifest or vice versa.
    #[error("option state kind does not match the manifest version")]
    SchemaMismatch,

    /// An include path is absolute or leaves the mod directory.
    #[error("include path '{path}' escapes the mod directory")]
    InvalidIncludePath { path: String },
}

// --- Patch Errors ---

/// Errors raised while scanning an include directory for patch files.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The include directory does not exist.
    #[error("include directory not found: {path}")]
    IncludeNotFound { path: PathBuf },

    /// The include directory could not be listed.
    #[error("failed to scan '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- Deploy Errors ---

/// Conditions that abort a whole deployment.
///
/// Per-mod and per-file problems are collected in
/// [`crate::deploy::DeployReport`] instead.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The game data directory does not exist.
    #[error("game data directory does not exist: {path}")]
    DataDirMissing { path: PathBuf },

    /// The game data directory exists but cannot be accessed.
    #[error("game data directory is not accessible: {path}: {source}")]
    DataDirInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Purge could not remove every previously deployed file.
    #[error("purge left {failed} file(s) behind, refusing to deploy")]
    PurgeIncomplete { failed: usize },

    /// Purge itself failed.
    #[error(transparent)]
    Purge(#[from] PurgeError),

    /// Cancellation was requested before the purge started.
    #[error("deployment cancelled before purge")]
    Cancelled,
}

// --- Purge Errors ---

/// Conditions that abort a purge before any file is deleted.
#[derive(Debug, Error)]
pub enum PurgeError {
    /// The game data directory does not exist.
    #[error("game data directory does not exist: {path}")]
    DataDirMissing { path: PathBuf },

    /// The game data directory could not be listed.
    #[error("failed to list '{path}': {message}")]
    ReadDir { path: PathBuf, message: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Archive Errors ---

/// Archive extraction errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// File extension does not name a supported archive format.
    #[error("unsupported archive format: {path} (supported: .zip, .7z)")]
    UnsupportedFormat { path: PathBuf },

    /// Zip archive is corrupt or unreadable.
    #[error("failed to read zip '{path}': {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// 7z archive is corrupt or unreadable.
    #[error("failed to read 7z '{path}': {message}")]
    SevenZip { path: PathBuf, message: String },

    /// I/O failure while writing extracted entries.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The blocking extraction task panicked or was cancelled.
    #[error("extraction task failed: {0}")]
    Join(String),
}
