// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use uuid::Uuid;

use super::*;
use crate::manifest::{ModOption, SubOption};

fn legacy(options: Option<&[&str]>) -> Manifest {
    Manifest::Legacy(LegacyManifest {
        id: Uuid::new_v4(),
        name: "Legacy".to_string(),
        description: String::new(),
        icon_path: None,
        options: options.map(|o| o.iter().map(ToString::to_string).collect()),
    })
}

fn sub(name: &str, include: &[&str]) -> SubOption {
    SubOption {
        name: name.to_string(),
        description: String::new(),
        include: include.iter().map(ToString::to_string).collect(),
        image: None,
    }
}

fn option(name: &str, include: Option<&[&str]>, subs: Option<Vec<SubOption>>) -> ModOption {
    ModOption {
        name: name.to_string(),
        description: String::new(),
        include: include.map(|i| i.iter().map(ToString::to_string).collect()),
        image: None,
        sub_options: subs,
    }
}

fn v1(options: Option<Vec<ModOption>>) -> Manifest {
    Manifest::V1(V1Manifest {
        id: Uuid::new_v4(),
        name: "V1".to_string(),
        description: String::new(),
        icon_path: None,
        options,
        nexus_data: None,
    })
}

fn paths(list: &[&str]) -> Vec<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

fn choice(enabled: bool, selected_sub: usize) -> OptionChoice {
    OptionChoice {
        enabled,
        selected_sub,
    }
}

/// Two options: "Armor" with its own include plus two skins, "Sound" with one include.
fn armor_and_sound() -> Manifest {
    v1(Some(vec![
        option(
            "Armor",
            Some(&["Armor/Common"]),
            Some(vec![sub("Red", &["Armor/Red"]), sub("Blue", &["Armor/Blue", "Armor/Blue HD"])]),
        ),
        option("Sound", Some(&["Sound"]), None),
    ]))
}

#[test]
fn test_legacy_without_options_is_root() {
    let resolved = resolve_include_paths(&legacy(None), &OptionState::Legacy { selected: 7 }).unwrap();
    assert_eq!(resolved, paths(&["."]));
}

#[test]
fn test_legacy_single_select() {
    let manifest = legacy(Some(&["Option A", "Option B", "Option C"]));
    for (selected, expected) in ["Option A", "Option B", "Option C"].iter().enumerate() {
        let resolved = resolve_include_paths(&manifest, &OptionState::Legacy { selected }).unwrap();
        assert_eq!(resolved, paths(&[*expected]));
    }
}

#[test]
fn test_legacy_out_of_range() {
    let manifest = legacy(Some(&["Option A"]));
    let err = resolve_include_paths(&manifest, &OptionState::Legacy { selected: 1 }).unwrap_err();
    assert_eq!(err, ResolveError::SelectionOutOfRange { index: 1, len: 1 });
}

#[test]
fn test_v1_without_options_is_root() {
    let resolved = resolve_include_paths(&v1(None), &OptionState::V1(vec![])).unwrap();
    assert_eq!(resolved, paths(&["."]));
}

#[test]
fn test_v1_all_enabled_in_order() {
    let manifest = armor_and_sound();
    let state = OptionState::V1(vec![choice(true, 1), choice(true, 0)]);

    let resolved = resolve_include_paths(&manifest, &state).unwrap();
    assert_eq!(
        resolved,
        paths(&["Armor/Common", "Armor/Blue", "Armor/Blue HD", "Sound"])
    );
}

#[test]
fn test_v1_toggle_off_removes_all_contributions() {
    let manifest = armor_and_sound();

    let armor_off = OptionState::V1(vec![choice(false, 1), choice(true, 0)]);
    assert_eq!(
        resolve_include_paths(&manifest, &armor_off).unwrap(),
        paths(&["Sound"])
    );

    let sound_off = OptionState::V1(vec![choice(true, 0), choice(false, 0)]);
    assert_eq!(
        resolve_include_paths(&manifest, &sound_off).unwrap(),
        paths(&["Armor/Common", "Armor/Red"])
    );

    let none = OptionState::V1(vec![choice(false, 0), choice(false, 0)]);
    assert!(resolve_include_paths(&manifest, &none).unwrap().is_empty());
}

#[test]
fn test_v1_disabled_option_ignores_bad_selection() {
    let manifest = armor_and_sound();
    let state = OptionState::V1(vec![choice(false, 99), choice(true, 0)]);
    assert_eq!(resolve_include_paths(&manifest, &state).unwrap(), paths(&["Sound"]));
}

#[test]
fn test_v1_sub_option_out_of_range() {
    let manifest = armor_and_sound();
    let state = OptionState::V1(vec![choice(true, 2), choice(true, 0)]);
    let err = resolve_include_paths(&manifest, &state).unwrap_err();
    assert_eq!(
        err,
        ResolveError::SubOptionOutOfRange {
            option: 0,
            index: 2,
            len: 2
        }
    );
}

#[test]
fn test_v1_state_length_mismatch() {
    let manifest = armor_and_sound();
    let err = resolve_include_paths(&manifest, &OptionState::V1(vec![choice(true, 0)])).unwrap_err();
    assert_eq!(
        err,
        ResolveError::StateMismatch {
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn test_v1_empty_sub_options_contribute_nothing() {
    let manifest = v1(Some(vec![option("Lonely", Some(&["Base"]), Some(vec![]))]));
    let state = OptionState::V1(vec![choice(true, 3)]);
    assert_eq!(resolve_include_paths(&manifest, &state).unwrap(), paths(&["Base"]));
}

#[test]
fn test_schema_mismatch() {
    let err = resolve_include_paths(&legacy(None), &OptionState::V1(vec![])).unwrap_err();
    assert_eq!(err, ResolveError::SchemaMismatch);

    let err = resolve_include_paths(&v1(None), &OptionState::Legacy { selected: 0 }).unwrap_err();
    assert_eq!(err, ResolveError::SchemaMismatch);
}

#[test]
fn test_backslash_and_escaping_paths() {
    let manifest = legacy(Some(&["Textures\\High", "..\\Other"]));

    let resolved = resolve_include_paths(&manifest, &OptionState::Legacy { selected: 0 }).unwrap();
    assert_eq!(resolved, vec![PathBuf::from("Textures").join("High")]);

    let err = resolve_include_paths(&manifest, &OptionState::Legacy { selected: 1 }).unwrap_err();
    insta::assert_snapshot!(err, @r"include path '..\Other' escapes the mod directory");
}

#[test]
fn test_default_state() {
    assert_eq!(
        OptionState::default_for(&legacy(Some(&["A", "B"]))),
        OptionState::Legacy { selected: 0 }
    );
    assert_eq!(
        OptionState::default_for(&armor_and_sound()),
        OptionState::V1(vec![choice(true, 0), choice(true, 0)])
    );
    assert_eq!(OptionState::default_for(&v1(None)), OptionState::V1(vec![]));
}
