// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! encoding
//!   decode_text()  BOM sniff, UTF-8 / UTF-16 --> UTF-8
//! fs
//!   walk:  find_files(), WalkOptions
//!   copy:  copy_dir_contents_async(), move_dir_async()
//! ```

pub mod encoding;
pub mod fs;
