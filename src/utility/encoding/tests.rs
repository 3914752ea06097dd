// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Encoding, decode_text, detect};

#[test]
fn test_utf8_passthrough() {
    let input = "Hello, 世界!";
    let result = decode_text(input.as_bytes()).unwrap();
    insta::assert_snapshot!(result, @"Hello, 世界!");
    assert_eq!(detect(input.as_bytes()), Encoding::Utf8);
}

#[test]
fn test_utf8_bom_stripped() {
    let result = decode_text(b"\xEF\xBB\xBF{}").unwrap();
    assert_eq!(result, "{}");
    assert_eq!(detect(b"\xEF\xBB\xBF{}"), Encoding::Utf8Bom);
}

#[test]
fn test_utf16_le_conversion() {
    // BOM + "Hi" in UTF-16 LE
    let input = b"\xFF\xFEH\x00i\x00";
    assert_eq!(detect(input), Encoding::Utf16Le);
    insta::assert_snapshot!(decode_text(input).unwrap(), @"Hi");
}

#[test]
fn test_utf16_be_conversion() {
    let input = b"\xFE\xFF\x00H\x00i";
    assert_eq!(detect(input), Encoding::Utf16Be);
    assert_eq!(decode_text(input).unwrap(), "Hi");
}

#[test]
fn test_invalid_utf8_rejected() {
    assert!(decode_text(b"caf\xe9").is_none());
}
