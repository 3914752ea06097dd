// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Text decoding for hand-edited mod files.
//!
//! ```text
//! bytes --(BOM sniff)--> UTF-8 | UTF-16 LE | UTF-16 BE --> String
//!         no BOM      --> strict UTF-8
//! ```
//!
//! Manifests are written by mod authors with whatever editor they had at
//! hand, so a leading BOM (UTF-8 or UTF-16) is accepted. Without a BOM the
//! bytes must be valid UTF-8.

use encoding_rs::UTF_8;
use std::borrow::Cow;

/// Encoding detected for a text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8 without BOM.
    #[default]
    Utf8,
    /// UTF-8 with BOM.
    Utf8Bom,
    /// UTF-16 Little Endian with BOM.
    Utf16Le,
    /// UTF-16 Big Endian with BOM.
    Utf16Be,
}

/// Detects the encoding of `bytes` from its byte order mark.
#[must_use]
pub fn detect(bytes: &[u8]) -> Encoding {
    match encoding_rs::Encoding::for_bom(bytes) {
        Some((enc, _)) if enc == encoding_rs::UTF_16LE => Encoding::Utf16Le,
        Some((enc, _)) if enc == encoding_rs::UTF_16BE => Encoding::Utf16Be,
        Some(_) => Encoding::Utf8Bom,
        None => Encoding::Utf8,
    }
}

/// Decodes a text file to UTF-8.
///
/// Returns `None` if the bytes are not valid in the detected encoding.
///
/// # Example
/// ```
/// use hdmm_rs::utility::encoding::decode_text;
///
/// let text = decode_text(b"\xEF\xBB\xBF{\"Name\": \"x\"}").unwrap();
/// assert_eq!(text, "{\"Name\": \"x\"}");
/// ```
#[must_use]
pub fn decode_text(bytes: &[u8]) -> Option<Cow<'_, str>> {
    match encoding_rs::Encoding::for_bom(bytes) {
        Some((enc, bom_len)) => enc
            .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..]),
        None => UTF_8.decode_without_bom_handling_and_without_replacement(bytes),
    }
}

#[cfg(test)]
mod tests;
