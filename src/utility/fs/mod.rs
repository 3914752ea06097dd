// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities with parallel traversal and async copy.
//!
//! ```text
//! walk:  find_files()      ignore::WalkParallel + wax glob
//!        WalkOptions       max_depth, hidden, ignore files
//! copy:  copy_dir_contents_async() recursive directory copy
//!        move_dir_async()          rename, or copy + remove
//! ```

pub mod copy;
pub mod walk;
