// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Manifest parsing and mod directory inspection.
//!
//! ```text
//! parse_dir(dir)
//!   manifest.json? --no--> infer_from_dir()      + NoManifestFound
//!        | yes
//!        v
//!   read_file() --err--> CantParse | UnknownVersion | OutOfSupport
//!        |
//!        v
//!   id taken? --yes--> Duplicate
//!        |
//!        v
//!   validate()  --> EmptyOptions, InvalidPath, ...
//! ```

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::infer::infer_from_dir;
use super::problem::{ProblemKind, ValidationProblem};
use super::validate::validate;
use super::{MANIFEST_FILE_NAME, Manifest, SchemaVersion};
use crate::error::ManifestError;
use crate::utility::encoding::{decode_text, detect};

/// Outcome of inspecting one mod directory.
#[derive(Debug)]
pub struct ParseReport {
    directory: PathBuf,
    manifest: Option<Manifest>,
    inferred: bool,
    problems: Vec<ValidationProblem>,
}

impl ParseReport {
    /// The inspected directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The parsed or inferred manifest, if one could be produced.
    #[must_use]
    pub const fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    /// Whether the manifest was inferred because `manifest.json` was missing.
    #[must_use]
    pub const fn inferred(&self) -> bool {
        self.inferred
    }

    #[must_use]
    pub fn problems(&self) -> &[ValidationProblem] {
        &self.problems
    }

    /// Whether any problem excludes the mod.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.problems.iter().any(ValidationProblem::is_error)
    }

    /// Splits the report into the admissible manifest (none if any problem
    /// is an error) and all problems.
    #[must_use]
    pub fn into_parts(self) -> (Option<Manifest>, Vec<ValidationProblem>) {
        let admitted = if self.has_errors() {
            None
        } else {
            self.manifest
        };
        (admitted, self.problems)
    }
}

/// Inspects a mod directory.
///
/// `is_taken` reports ids already used by loaded mods. A parsed manifest
/// whose id is taken yields a `Duplicate` error; an inferred manifest is
/// always given a fresh id.
pub fn parse_dir(dir: &Path, is_taken: impl Fn(&Uuid) -> bool) -> ParseReport {
    let mut report = ParseReport {
        directory: dir.to_path_buf(),
        manifest: None,
        inferred: false,
        problems: Vec::new(),
    };

    let manifest_path = dir.join(MANIFEST_FILE_NAME);
    let manifest = if manifest_path.is_file() {
        match read_file(&manifest_path) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "rejecting mod");
                report
                    .problems
                    .push(ValidationProblem::new(e.problem_kind(), dir).with_extra(e.to_string()));
                return report;
            }
        }
    } else {
        debug!(dir = %dir.display(), "no manifest, inferring one");
        report.inferred = true;
        report
            .problems
            .push(ValidationProblem::new(ProblemKind::NoManifestFound, dir));
        Manifest::Legacy(infer_from_dir(dir, &is_taken))
    };

    if !report.inferred && is_taken(&manifest.id()) {
        warn!(dir = %dir.display(), id = %manifest.id(), "duplicate mod id");
        report.problems.push(
            ValidationProblem::new(ProblemKind::Duplicate, dir).with_extra(manifest.id().to_string()),
        );
    }

    report.problems.extend(validate(&manifest, dir));
    report.manifest = Some(manifest);
    report
}

/// Reads and parses a manifest file.
///
/// # Errors
///
/// Returns [`ManifestError::Read`] if the file cannot be read, and the
/// errors of [`parse_str`] otherwise.
pub fn read_file(path: &Path) -> Result<Manifest, ManifestError> {
    let bytes = std::fs::read(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), encoding = ?detect(&bytes), "reading manifest");

    let text = decode_text(&bytes).ok_or_else(|| ManifestError::Parse {
        path: path.to_path_buf(),
        message: "file is not valid UTF-8 or UTF-16 text".to_string(),
    })?;
    parse_str(&text, path)
}

/// Parses manifest text. `path` is only used in error messages.
///
/// Comments and trailing commas are accepted.
///
/// # Errors
///
/// - [`ManifestError::OutOfSupport`] for `"Version": 2`
/// - [`ManifestError::UnknownVersion`] for any other number except 1
/// - [`ManifestError::Parse`] for malformed text, a non-numeric `Version`,
///   missing or mistyped fields, or an empty `Name`
pub fn parse_str(text: &str, path: &Path) -> Result<Manifest, ManifestError> {
    let parse_error = |message: String| ManifestError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let value: Value = json5::from_str(text).map_err(|e| parse_error(e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(parse_error("document root is not an object".to_string()));
    };

    let schema = match object.get("Version") {
        None | Some(Value::Null) => SchemaVersion::Legacy,
        Some(Value::Number(n)) => match integral(n) {
            Some(1) => SchemaVersion::V1,
            Some(2) => {
                return Err(ManifestError::OutOfSupport {
                    path: path.to_path_buf(),
                });
            }
            _ => {
                return Err(ManifestError::UnknownVersion {
                    path: path.to_path_buf(),
                    version: n.to_string(),
                });
            }
        },
        Some(other) => {
            return Err(parse_error(format!(
                "`Version` must be a number, found {other}"
            )));
        }
    };

    let manifest = match schema {
        SchemaVersion::Legacy => serde_json::from_value(value).map(Manifest::Legacy),
        SchemaVersion::V1 => serde_json::from_value(value).map(Manifest::V1),
    }
    .map_err(|e| parse_error(e.to_string()))?;

    if manifest.name().trim().is_empty() {
        return Err(parse_error("`Name` must not be empty".to_string()));
    }

    Ok(manifest)
}

/// Integer value of a JSON number, accepting `1.0` as `1`.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integral(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 1e15)
            .map(|f| f as i64)
    })
}
