// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::Result;
use anyhow::Context;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Recursively copies all contents from src directory to dst directory (async version).
///
/// Creates dst if it doesn't exist. Handles both files and directories recursively.
///
/// # Arguments
/// * `src` - Source directory path
/// * `dst` - Destination directory path
///
/// # Example
/// ```no_run
/// use hdmm_rs::utility::fs::copy::copy_dir_contents_async;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// copy_dir_contents_async(Path::new("/source/dir"), Path::new("/dest/dir")).await?;
/// # Ok(())
/// # }
/// ```
/// # Errors
///
/// Returns an error if any IO operation fails (creating directory, reading, copying).
pub async fn copy_dir_contents_async(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .await
        .with_context(|| format!("failed to create directory {}", dst.display()))?;

    let mut entries = fs::read_dir(src)
        .await
        .with_context(|| format!("failed to read directory {}", src.display()))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("failed to read entry from {}", src.display()))?
    {
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            Box::pin(copy_dir_contents_async(&src_path, &dst_path)).await?;
        } else {
            fs::copy(&src_path, &dst_path).await.with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
    }

    Ok(())
}

/// Moves a directory tree from src to dst.
///
/// Tries a rename first. When that fails (typically because src and dst are
/// on different volumes) the tree is copied and src removed afterwards. dst
/// must not exist; its parent is created if needed.
///
/// # Errors
///
/// Returns an error if the fallback copy fails or src cannot be removed
/// after copying. A failed copy leaves src untouched.
pub async fn move_dir_async(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    match fs::rename(src, dst).await {
        Ok(()) => return Ok(()),
        Err(e) => {
            debug!(
                from = %src.display(),
                to = %dst.display(),
                error = %e,
                "rename failed, falling back to copy"
            );
        }
    }

    if let Err(e) = copy_dir_contents_async(src, dst).await {
        // Do not leave a half-copied destination behind
        let _ = fs::remove_dir_all(dst).await;
        return Err(e);
    }

    fs::remove_dir_all(src)
        .await
        .with_context(|| format!("failed to remove {} after copying", src.display()))
}
