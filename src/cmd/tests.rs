// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use tempfile::TempDir;

use super::mods::{
    format_mod_list, run_move_command, run_remove_command, run_select_command,
    run_set_enabled_command, run_toggle_command,
};
use super::{find_mod, open_catalog};
use crate::catalog::MODS_DIR_NAME;
use crate::catalog::profile::PROFILE_FILE_NAME;
use crate::cli::mods::{ModArgs, MoveArgs, MovePosition, SelectArgs, Switch, ToggleArgs};
use crate::config::Config;
use crate::manifest::MANIFEST_FILE_NAME;

const GUID_A: &str = "11111111-1111-4111-8111-111111111111";
const GUID_B: &str = "33333333-3333-4333-8333-333333333333";

/// Storage with a legacy mod "Alpha" and a v1 mod "Bravo".
fn setup() -> (TempDir, Config) {
    let temp = TempDir::new().unwrap();
    let mods = temp.path().join("storage").join(MODS_DIR_NAME);

    let alpha = mods.join("Alpha");
    for option in ["Red", "Blue"] {
        std::fs::create_dir_all(alpha.join(option)).unwrap();
    }
    std::fs::write(
        alpha.join(MANIFEST_FILE_NAME),
        format!(
            r#"{{ "Guid": "{GUID_A}", "Name": "Alpha", "Description": "", "Options": ["Red", "Blue"] }}"#
        ),
    )
    .unwrap();

    let bravo = mods.join("Bravo");
    for include in ["Common", "Red", "Blue", "Sound"] {
        std::fs::create_dir_all(bravo.join(include)).unwrap();
    }
    std::fs::write(
        bravo.join(MANIFEST_FILE_NAME),
        format!(
            r#"{{
                "Version": 1,
                "Guid": "{GUID_B}",
                "Name": "Bravo",
                "Description": "",
                "Options": [
                    {{
                        "Name": "Armor",
                        "Description": "",
                        "Include": ["Common"],
                        "SubOptions": [
                            {{ "Name": "Red", "Description": "", "Include": ["Red"] }},
                            {{ "Name": "Blue", "Description": "", "Include": ["Blue"] }}
                        ]
                    }},
                    {{ "Name": "Sound", "Description": "", "Include": ["Sound"] }}
                ]
            }}"#
        ),
    )
    .unwrap();

    let config = config_for(temp.path());
    (temp, config)
}

fn config_for(root: &Path) -> Config {
    let mut config = Config::default();
    config.paths.prefix = Some(root.to_path_buf());
    config.paths.resolve().unwrap();
    config
}

fn mod_arg(target: &str) -> ModArgs {
    ModArgs {
        target: target.to_string(),
    }
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn test_find_mod_by_name_and_guid() {
    let (_temp, config) = setup();
    let catalog = open_catalog(&config).unwrap();

    assert_eq!(find_mod(&catalog, "Alpha").unwrap().to_string(), GUID_A);
    assert_eq!(find_mod(&catalog, GUID_B).unwrap().to_string(), GUID_B);

    let err = find_mod(&catalog, "alpha").unwrap_err();
    insta::assert_snapshot!(err, @"no installed mod is named or identified by 'alpha'");
}

#[test]
fn test_open_catalog_requires_storage() {
    let err = open_catalog(&Config::default()).unwrap_err();
    insta::assert_snapshot!(err, @"missing required config key 'storage' in section '[paths]'");
}

// =============================================================================
// Listing
// =============================================================================

#[test]
fn test_format_mod_list() {
    let (_temp, config) = setup();
    let catalog = open_catalog(&config).unwrap();

    assert_eq!(
        format_mod_list(&catalog),
        vec![
            format!("  0. [x] Alpha ({GUID_A})"),
            "       option 0: Red".to_string(),
            format!("  1. [x] Bravo ({GUID_B})"),
            "       [x] option 0: Armor -> Red".to_string(),
            "       [x] option 1: Sound".to_string(),
        ]
    );
}

// =============================================================================
// Editing
// =============================================================================

#[test]
fn test_edits_are_saved_to_profile() {
    let (temp, config) = setup();

    run_set_enabled_command(&mod_arg("Alpha"), &config, false).unwrap();
    run_select_command(
        &SelectArgs {
            target: "Alpha".to_string(),
            index: 1,
        },
        &config,
    )
    .unwrap();
    run_toggle_command(
        &ToggleArgs {
            target: "Bravo".to_string(),
            option: 1,
            state: Switch::Off,
        },
        &config,
    )
    .unwrap();
    run_move_command(
        &MoveArgs {
            target: "Bravo".to_string(),
            position: MovePosition::Up,
        },
        &config,
    )
    .unwrap();

    assert!(temp.path().join("storage").join(PROFILE_FILE_NAME).is_file());

    let catalog = open_catalog(&config).unwrap();
    assert_eq!(
        format_mod_list(&catalog),
        vec![
            format!("  0. [x] Bravo ({GUID_B})"),
            "       [x] option 0: Armor -> Red".to_string(),
            "       [ ] option 1: Sound".to_string(),
            format!("  1. [ ] Alpha ({GUID_A})"),
            "       option 1: Blue".to_string(),
        ]
    );
}

#[test]
fn test_select_on_v1_mod_is_rejected() {
    let (_temp, config) = setup();
    let err = run_select_command(
        &SelectArgs {
            target: "Bravo".to_string(),
            index: 0,
        },
        &config,
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "cannot change 'Bravo'");
}

#[test]
fn test_toggle_out_of_range_leaves_profile_untouched() {
    let (temp, config) = setup();
    let result = run_toggle_command(
        &ToggleArgs {
            target: "Bravo".to_string(),
            option: 5,
            state: Switch::On,
        },
        &config,
    );

    assert!(result.is_err());
    assert!(!temp.path().join("storage").join(PROFILE_FILE_NAME).exists());
}

#[tokio::test]
async fn test_remove_command_deletes_mod() {
    let (temp, config) = setup();

    run_remove_command(&mod_arg(GUID_A), &config).await.unwrap();

    assert!(!temp.path().join("storage").join(MODS_DIR_NAME).join("Alpha").exists());
    let catalog = open_catalog(&config).unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(run_remove_command(&mod_arg("Alpha"), &config).await.is_err());
}
