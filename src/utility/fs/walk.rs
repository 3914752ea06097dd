// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::Result;
use bon::Builder;
use flume::bounded;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Options for parallel directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Maximum depth to traverse (None = unlimited)
    #[builder(setters(name = with_max_depth))]
    max_depth: Option<usize>,
    /// Follow symbolic links
    #[builder(setters(name = with_follow_links), default = false)]
    follow_links: bool,
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = false)]
    include_hidden: bool,
    /// Respect .gitignore and .ignore files
    #[builder(setters(name = with_respect_ignore_files), default = true)]
    respect_ignore_files: bool,
    /// Number of threads (None = auto-detect based on CPU count)
    #[builder(setters(name = with_threads))]
    threads: Option<usize>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    /// Returns the maximum depth to traverse.
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Returns whether to follow symbolic links.
    #[must_use]
    pub const fn follow_links(&self) -> bool {
        self.follow_links
    }

    /// Returns whether to include hidden files/directories.
    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Returns whether to respect ignore files.
    #[must_use]
    pub const fn respect_ignore_files(&self) -> bool {
        self.respect_ignore_files
    }

    /// Returns the number of threads (None = auto-detect).
    #[must_use]
    pub const fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// Creates options for scanning the game's flat `data` directory.
    ///
    /// - Top level only
    /// - Hidden files included
    /// - Ignore files are not honored (the game directory is not a repo)
    #[must_use]
    pub fn for_game_data() -> Self {
        Self::builder()
            .with_max_depth(1)
            .with_include_hidden(true)
            .with_respect_ignore_files(false)
            .build()
    }
}

/// Builds a `WalkBuilder` with the given options.
pub(super) fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    if let Some(depth) = options.max_depth() {
        builder.max_depth(Some(depth));
    }

    builder.follow_links(options.follow_links());
    builder.hidden(!options.include_hidden());

    builder.ignore(options.respect_ignore_files());
    builder.git_ignore(options.respect_ignore_files());
    builder.git_global(options.respect_ignore_files());
    builder.git_exclude(options.respect_ignore_files());
    builder.parents(options.respect_ignore_files());

    if let Some(threads) = options.threads() {
        builder.threads(threads);
    }

    builder
}

/// Files found by [`find_files`].
#[derive(Debug, Default)]
pub struct FoundFiles {
    files: Vec<PathBuf>,
    error_count: usize,
}

impl FoundFiles {
    /// Returns the matching files, sorted by path.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Consumes the result, returning the matching files.
    #[must_use]
    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }

    /// Returns the number of entries that could not be read.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }
}

/// Finds files matching a glob pattern using parallel traversal.
///
/// The pattern is matched against the path relative to `root`. Results
/// are sorted so callers see a stable order regardless of thread timing.
///
/// # Errors
///
/// Returns an error if:
/// - The root directory does not exist.
/// - The glob pattern is invalid.
///
/// # Example
/// ```no_run
/// use hdmm_rs::utility::fs::walk::{find_files, WalkOptions};
///
/// let found = find_files("/games/helldivers2/data", "*.patch_*", &WalkOptions::for_game_data())?;
/// for file in found.files() {
///     println!("{}", file.display());
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn find_files<P: AsRef<Path>>(
    root: P,
    pattern: &str,
    options: &WalkOptions,
) -> Result<FoundFiles> {
    use wax::{Glob, Program};

    let root = root.as_ref();

    if !root.exists() {
        anyhow::bail!("root directory does not exist: {}", root.display());
    }

    let glob =
        Glob::new(pattern).map_err(|e| anyhow::anyhow!("invalid glob pattern '{pattern}': {e}"))?;

    // Bounded so a huge directory cannot exhaust memory before the receiver drains
    let (tx, rx) = bounded::<PathBuf>(1000);
    let glob = Arc::new(glob);
    let root_path = root.to_path_buf();
    let error_count = Arc::new(AtomicUsize::new(0));

    let parallel = build_walker(root, options).build_parallel();

    std::thread::scope(|scope| {
        let collector = scope.spawn(move || rx.iter().collect::<Vec<_>>());

        parallel.run(|| {
            let tx = tx.clone();
            let glob = Arc::clone(&glob);
            let root_path = root_path.clone();
            let error_count = Arc::clone(&error_count);

            Box::new(move |entry_result| {
                match entry_result {
                    Ok(entry) => {
                        if entry.file_type().is_some_and(|ft| ft.is_file())
                            && let Ok(rel_path) = entry.path().strip_prefix(&root_path)
                            && glob.is_match(rel_path)
                        {
                            let _ = tx.send(entry.path().to_path_buf());
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "walk error");
                        error_count.fetch_add(1, Ordering::Relaxed);
                    }
                }
                ignore::WalkState::Continue
            })
        });

        // Signal completion to the collector
        drop(tx);
        let mut files = collector.join().unwrap_or_default();
        files.sort();

        Ok(FoundFiles {
            files,
            error_count: error_count.load(Ordering::Relaxed),
        })
    })
}
