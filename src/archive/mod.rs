// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Archive extraction.
//!
//! ```text
//! Extractor::extract(archive, destination)
//!        |
//!   ArchiveFormat::from_extension
//!     .zip --> zip crate      (entries outside destination are skipped)
//!     .7z  --> sevenz-rust
//!        |
//!   spawn_blocking, destination created if missing
//! ```
//!
//! The catalog only depends on the [`Extractor`] trait, so tests and other
//! front-ends can supply their own.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tracing::{debug, info, trace};

use crate::error::ArchiveError;


/// Extracts an archive file into a directory.
pub trait Extractor: Send + Sync {
    /// Extracts `archive` so its top level lands directly in `destination`.
    fn extract<'a>(
        &'a self,
        archive: &'a Path,
        destination: &'a Path,
    ) -> BoxFuture<'a, Result<(), ArchiveError>>;
}

/// Archive formats understood by [`ArchiveExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    SevenZip,
}

impl ArchiveFormat {
    /// Detects the format from the file extension, case-insensitively.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("zip") {
            Some(Self::Zip)
        } else if ext.eq_ignore_ascii_case("7z") {
            Some(Self::SevenZip)
        } else {
            None
        }
    }
}

/// Built-in extractor for `.zip` and `.7z` archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Extractor for ArchiveExtractor {
    fn extract<'a>(
        &'a self,
        archive: &'a Path,
        destination: &'a Path,
    ) -> BoxFuture<'a, Result<(), ArchiveError>> {
        Box::pin(async move {
            let format = ArchiveFormat::from_extension(archive).ok_or_else(|| {
                ArchiveError::UnsupportedFormat {
                    path: archive.to_path_buf(),
                }
            })?;

            debug!(
                archive = %archive.display(),
                destination = %destination.display(),
                ?format,
                "extracting archive"
            );

            let archive_owned = archive.to_path_buf();
            let destination_owned = destination.to_path_buf();
            tokio::task::spawn_blocking(move || {
                std::fs::create_dir_all(&destination_owned).map_err(|source| ArchiveError::Io {
                    path: destination_owned.clone(),
                    source,
                })?;
                match format {
                    ArchiveFormat::Zip => extract_zip(&archive_owned, &destination_owned),
                    ArchiveFormat::SevenZip => extract_7z(&archive_owned, &destination_owned),
                }
            })
            .await
            .map_err(|e| ArchiveError::Join(e.to_string()))??;

            info!(archive = %archive.display(), "archive extracted");
            Ok(())
        })
    }
}

fn extract_zip(path: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let zip_error = |source| ArchiveError::Zip {
        path: path.to_path_buf(),
        source,
    };
    let io_error = |path: &Path, source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(zip_error)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(zip_error)?;
        let Some(relative) = entry.enclosed_name() else {
            debug!(entry = entry.name(), "skipping zip entry outside destination");
            continue;
        };
        let out_path: PathBuf = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| io_error(&out_path, e))?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        trace!(entry = %out_path.display(), "writing zip entry");
        let mut out_file = File::create(&out_path).map_err(|e| io_error(&out_path, e))?;
        std::io::copy(&mut entry, &mut out_file).map_err(|e| io_error(&out_path, e))?;
    }

    Ok(())
}

fn extract_7z(path: &Path, dest: &Path) -> Result<(), ArchiveError> {
    sevenz_rust::decompress_file(path, dest).map_err(|e| ArchiveError::SevenZip {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
