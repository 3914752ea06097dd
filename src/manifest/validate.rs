// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Structural and on-disk checks of a parsed manifest.

use std::path::Path;

use super::problem::{ProblemKind, ValidationProblem};
use super::{LegacyManifest, Manifest, V1Manifest, relative_path};

/// Checks `manifest` against the mod directory `root`.
///
/// Empty lists are warnings. Any referenced image that is not a file, or
/// include entry that is not a directory, is an `InvalidPath` error carrying
/// the offending path.
#[must_use]
pub fn validate(manifest: &Manifest, root: &Path) -> Vec<ValidationProblem> {
    let mut checker = Checker {
        root,
        problems: Vec::new(),
    };

    if let Some(icon) = manifest.icon_path() {
        checker.file(icon);
    }

    match manifest {
        Manifest::Legacy(m) => checker.legacy(m),
        Manifest::V1(m) => checker.v1(m),
    }

    checker.problems
}

struct Checker<'a> {
    root: &'a Path,
    problems: Vec<ValidationProblem>,
}

impl Checker<'_> {
    fn legacy(&mut self, manifest: &LegacyManifest) {
        let Some(options) = &manifest.options else {
            return;
        };
        if options.is_empty() {
            self.warn(ProblemKind::EmptyOptions);
        }
        for option in options {
            self.dir(option);
        }
    }

    fn v1(&mut self, manifest: &V1Manifest) {
        let Some(options) = &manifest.options else {
            return;
        };
        if options.is_empty() {
            self.warn(ProblemKind::EmptyOptions);
        }

        for option in options {
            for include in option.include.iter().flatten() {
                self.dir(include);
            }
            if let Some(image) = &option.image {
                self.file(image);
            }

            let Some(subs) = &option.sub_options else {
                continue;
            };
            if subs.is_empty() {
                self.problems.push(
                    ValidationProblem::new(ProblemKind::EmptySubOptions, self.root)
                        .with_extra(option.name.clone()),
                );
            }
            for sub in subs {
                if sub.include.is_empty() {
                    self.problems.push(
                        ValidationProblem::new(ProblemKind::EmptyIncludes, self.root)
                            .with_extra(format!("{}/{}", option.name, sub.name)),
                    );
                }
                for include in &sub.include {
                    self.dir(include);
                }
                if let Some(image) = &sub.image {
                    self.file(image);
                }
            }
        }
    }

    fn warn(&mut self, kind: ProblemKind) {
        self.problems.push(ValidationProblem::new(kind, self.root));
    }

    fn file(&mut self, raw: &str) {
        if !relative_path(raw).is_some_and(|p| self.root.join(p).is_file()) {
            self.invalid(raw);
        }
    }

    fn dir(&mut self, raw: &str) {
        if !relative_path(raw).is_some_and(|p| self.root.join(p).is_dir()) {
            self.invalid(raw);
        }
    }

    fn invalid(&mut self, raw: &str) {
        self.problems
            .push(ValidationProblem::new(ProblemKind::InvalidPath, self.root).with_extra(raw));
    }
}
