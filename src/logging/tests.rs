// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogContext, LogLevel};

#[test]
fn test_log_context_clear_include() {
    let mut ctx = LogContext::with_mod("Better Bullets");
    ctx.set_include("Options/Loud");
    insta::assert_snapshot!(ctx.prefix(), @"[Better Bullets/Options/Loud] ");

    ctx.clear_include();
    insta::assert_snapshot!(ctx.prefix(), @"[Better Bullets] ");
    assert!(ctx.include().is_none(), "include should be None after clear");
}

#[test]
fn test_log_context_prefix_empty() {
    let ctx = LogContext::default();
    assert_eq!(ctx.prefix(), "");
    assert!(ctx.mod_name().is_none());
}

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    assert!(LogLevel::new(7).is_err());
    assert_eq!(LogLevel::from_u8(9), None);
    assert_eq!(LogLevel::try_from(4).map(u8::from).ok(), Some(4));
}

#[test]
fn test_log_level_filter_strings() {
    assert_eq!(LogLevel::SILENT.to_filter_string(), "off");
    assert_eq!(LogLevel::WARN.to_filter_string(), "hdmm_rs=warn,hdmm=warn");
    assert_eq!(LogLevel::DUMP.to_filter_string(), "trace");
}

#[test]
fn test_log_level_serde() {
    let level: LogLevel = serde_json::from_str("5").unwrap();
    assert_eq!(level, LogLevel::TRACE);
    assert_eq!(serde_json::to_string(&level).unwrap(), "5");
    assert!(serde_json::from_str::<LogLevel>("8").is_err());
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
    assert!(!config.show_target());
}
