// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Manifest inference for mod directories that ship without one.

use std::path::Path;

use tracing::{debug, warn};
use uuid::Uuid;

use super::LegacyManifest;

/// Description given to every inferred manifest.
pub const INFERRED_DESCRIPTION: &str = "A locally imported mod.";

/// File extensions recognized as icon candidates (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Builds a Legacy manifest from the layout of `dir`.
///
/// - id: fresh v4 UUID for which `is_taken` returns false
/// - name: the directory name
/// - icon: first image whose name contains "icon", else the first image
/// - options: immediate subdirectories, sorted by name, if there are any
///
/// Never fails. An unreadable directory yields a manifest without icon or
/// options.
pub fn infer_from_dir(dir: &Path, is_taken: impl Fn(&Uuid) -> bool) -> LegacyManifest {
    let id = loop {
        let candidate = Uuid::new_v4();
        if !is_taken(&candidate) {
            break candidate;
        }
    };

    let name = dir
        .file_name()
        .map_or_else(|| id.to_string(), |n| n.to_string_lossy().into_owned());

    let mut images = Vec::new();
    let mut directories = Vec::new();

    match std::fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                let file_name = entry.file_name().to_string_lossy().into_owned();
                if file_type.is_dir() {
                    directories.push(file_name);
                } else if file_type.is_file() && is_image(&file_name) {
                    images.push(file_name);
                }
            }
        }
        Err(e) => warn!(dir = %dir.display(), error = %e, "cannot list directory for inference"),
    }

    images.sort();
    directories.sort();

    let icon_path = images
        .iter()
        .find(|n| n.to_ascii_lowercase().contains("icon"))
        .or_else(|| images.first())
        .cloned();

    let options = (!directories.is_empty()).then_some(directories);

    debug!(
        dir = %dir.display(),
        %id,
        icon = ?icon_path,
        options = options.as_ref().map_or(0, Vec::len),
        "inferred manifest"
    );

    LegacyManifest {
        id,
        name,
        description: INFERRED_DESCRIPTION.to_string(),
        icon_path,
        options,
    }
}

fn is_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|i| ext.eq_ignore_ascii_case(i)))
}
