// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::mods::{MovePosition, Switch};
use crate::cli::{Cli, Command};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["hdmm", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_no_command() {
    let cli = Cli::try_parse_from(["hdmm"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "hdmm",
        "-l",
        "5",
        "-d",
        "/hd2",
        "-g",
        "/games/hd2",
        "-c",
        "a.toml",
        "--config",
        "b.toml",
        "-s",
        "deploy/concurrency=2",
        "deploy",
    ])
    .unwrap();

    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(
        cli.global.configs,
        vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );
    assert!(matches!(cli.command, Some(Command::Deploy)));

    insta::assert_snapshot!(cli.global.to_config_overrides().join("\n"), @r"
    deploy/concurrency=2
    global/output_log_level=5
    global/file_log_level=5
    paths/prefix=/hd2
    paths/game=/games/hd2
    ");
}

#[test]
fn test_file_log_level_overrides_console_level() {
    let cli = Cli::try_parse_from(["hdmm", "-l", "2", "--file-log-level", "6", "list"]).unwrap();
    assert_eq!(
        cli.global.to_config_overrides(),
        vec!["global/output_log_level=2", "global/file_log_level=6"]
    );
}

#[test]
fn test_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["hdmm", "-l", "7", "list"]).is_err());
}

#[test]
fn test_parse_add_requires_archive() {
    assert!(Cli::try_parse_from(["hdmm", "add"]).is_err());

    let cli = Cli::try_parse_from(["hdmm", "add", "a.zip", "b.7z"]).unwrap();
    let Some(Command::Add(args)) = cli.command else {
        panic!("expected add");
    };
    assert_eq!(
        args.archives,
        vec![PathBuf::from("a.zip"), PathBuf::from("b.7z")]
    );
}

#[test]
fn test_parse_move_positions() {
    let position = |arg: &str| {
        let cli = Cli::try_parse_from(["hdmm", "move", "Mod A", arg]).unwrap();
        let Some(Command::Move(args)) = cli.command else {
            panic!("expected move");
        };
        assert_eq!(args.target, "Mod A");
        args.position
    };

    assert_eq!(position("up"), MovePosition::Up);
    assert_eq!(position("DOWN"), MovePosition::Down);
    assert_eq!(position("3"), MovePosition::To(3));
    assert!(Cli::try_parse_from(["hdmm", "move", "Mod A", "sideways"]).is_err());
    assert!(Cli::try_parse_from(["hdmm", "move", "Mod A", "-1"]).is_err());
}

#[test]
fn test_move_position_error_message() {
    let err = "left".parse::<MovePosition>().unwrap_err();
    insta::assert_snapshot!(err, @"expected 'up', 'down' or a position, got 'left'");
}

#[test]
fn test_parse_toggle() {
    let cli = Cli::try_parse_from(["hdmm", "toggle", "Armor Pack", "1", "off"]).unwrap();
    let Some(Command::Toggle(args)) = cli.command else {
        panic!("expected toggle");
    };
    assert_eq!(args.target, "Armor Pack");
    assert_eq!(args.option, 1);
    assert_eq!(args.state, Switch::Off);
    assert!(!args.state.is_on());

    assert!(Cli::try_parse_from(["hdmm", "toggle", "Armor Pack", "1", "maybe"]).is_err());
}

#[test]
fn test_parse_select_and_choose() {
    let cli = Cli::try_parse_from(["hdmm", "select", "Legacy", "2"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Select(ref a)) if a.index == 2));

    let cli = Cli::try_parse_from(["hdmm", "choose", "Armor", "0", "1"]).unwrap();
    assert!(
        matches!(cli.command, Some(Command::Choose(ref a)) if a.option == 0 && a.sub == 1)
    );
}

#[test]
fn test_parse_simple_commands() {
    for (arg, check) in [
        ("list", matches!(Cli::try_parse_from(["hdmm", "list"]).unwrap().command, Some(Command::List))),
        ("purge", matches!(Cli::try_parse_from(["hdmm", "purge"]).unwrap().command, Some(Command::Purge))),
        ("options", matches!(Cli::try_parse_from(["hdmm", "options"]).unwrap().command, Some(Command::Options))),
        ("configs", matches!(Cli::try_parse_from(["hdmm", "configs"]).unwrap().command, Some(Command::Configs))),
    ] {
        assert!(check, "{arg} did not parse");
    }
}
