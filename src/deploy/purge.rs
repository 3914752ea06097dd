// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Removal of previously deployed patch files.
//!
//! ```text
//! <game>/data/*.patch_*   (top level only)
//!       |
//!   find_files (blocking walk)
//!       |
//!   remove_file x N, up to `concurrency` at a time
//!       |
//!   PurgeReport { deleted, failures }
//! ```

use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, trace, warn};

use super::report::{PurgeFailure, PurgeReport};
use crate::error::PurgeError;
use crate::utility::fs::walk::{WalkOptions, find_files};

/// Glob matching every deployed patch file form.
pub const PATCH_GLOB: &str = "*.patch_*";

/// Deletes every `*.patch_*` file directly inside `data_dir`.
///
/// Individual deletion failures are collected in the report and do not stop
/// the remaining deletions. Running it again on a purged directory deletes
/// nothing and succeeds.
///
/// # Errors
///
/// - [`PurgeError::DataDirMissing`] if `data_dir` is not a directory
/// - [`PurgeError::ReadDir`] if it cannot be listed
pub async fn purge(data_dir: &Path, concurrency: usize) -> Result<PurgeReport, PurgeError> {
    if !tokio::fs::metadata(data_dir)
        .await
        .is_ok_and(|m| m.is_dir())
    {
        return Err(PurgeError::DataDirMissing {
            path: data_dir.to_path_buf(),
        });
    }

    info!(dir = %data_dir.display(), "purging deployed patch files");

    let root = data_dir.to_path_buf();
    let files = tokio::task::spawn_blocking(move || {
        find_files(&root, PATCH_GLOB, &WalkOptions::for_game_data())
    })
    .await
    .map_err(|e| PurgeError::ReadDir {
        path: data_dir.to_path_buf(),
        message: e.to_string(),
    })?
    .map_err(|e| PurgeError::ReadDir {
        path: data_dir.to_path_buf(),
        message: format!("{e:#}"),
    })?;
    let unreadable = unreadable_entries(data_dir, files.error_count());
    let files = files.into_files();

    debug!(count = files.len(), "found patch files");

    let results: Vec<(PathBuf, std::io::Result<()>)> = stream::iter(files)
        .map(|path| async move {
            trace!(file = %path.display(), "deleting");
            let result = match tokio::fs::remove_file(&path).await {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            };
            (path, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut report = PurgeReport::default();
    report.failures.extend(unreadable);
    for (path, result) in results {
        match result {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to delete patch file");
                report.failures.push(PurgeFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }
    report.failures.sort_by(|a, b| a.path.cmp(&b.path));

    info!(
        deleted = report.deleted,
        failed = report.failures.len(),
        "purge finished"
    );
    Ok(report)
}

/// Entries the walk could not read may be patch files that stay behind.
pub(super) fn unreadable_entries(data_dir: &Path, error_count: usize) -> Option<PurgeFailure> {
    (error_count > 0).then(|| {
        warn!(dir = %data_dir.display(), count = error_count, "entries could not be read");
        PurgeFailure {
            path: data_dir.to_path_buf(),
            error: format!("{error_count} entries could not be read"),
        }
    })
}
