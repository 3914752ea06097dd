// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tempfile::TempDir;
use uuid::Uuid;

use super::profile::{ProfileRecord, read_profile};
use super::*;
use crate::error::ArchiveError;
use crate::manifest::problem::ProblemKind;
use crate::manifest::{MANIFEST_FILE_NAME, SchemaVersion};
use crate::resolve::OptionChoice;
use crate::utility::fs::copy::copy_dir_contents_async;

const GUID_A: &str = "11111111-1111-4111-8111-111111111111";
const GUID_B: &str = "22222222-2222-4222-8222-222222222222";
const GUID_V1: &str = "33333333-3333-4333-8333-333333333333";

struct Fixture {
    _temp: TempDir,
    storage: PathBuf,
    temp: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let storage = temp_dir.path().join("storage");
        let temp = temp_dir.path().join("tmp");
        std::fs::create_dir_all(storage.join(MODS_DIR_NAME)).unwrap();
        Self {
            _temp: temp_dir,
            storage,
            temp,
        }
    }

    fn mod_dir(&self, name: &str) -> PathBuf {
        let dir = self.storage.join(MODS_DIR_NAME).join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn legacy_mod(&self, dir_name: &str, guid: &str, options: &[&str]) -> PathBuf {
        let dir = self.mod_dir(dir_name);
        write_legacy(&dir, guid, dir_name, options);
        dir
    }

    fn v1_mod(&self, dir_name: &str, guid: &str) -> PathBuf {
        let dir = self.mod_dir(dir_name);
        for sub in ["Common", "Red", "Blue", "Sound"] {
            std::fs::create_dir_all(dir.join(sub)).unwrap();
        }
        let json = format!(
            r#"{{
                "Version": 1,
                "Guid": "{guid}",
                "Name": "{dir_name}",
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
        );
        std::fs::write(dir.join(MANIFEST_FILE_NAME), json).unwrap();
        dir
    }

    fn load(&self) -> (ModCatalog, Vec<ValidationProblem>) {
        ModCatalog::load(&self.storage, &self.temp).unwrap()
    }
}

fn write_legacy(dir: &Path, guid: &str, name: &str, options: &[&str]) {
    for option in options {
        std::fs::create_dir_all(dir.join(option)).unwrap();
    }
    let options_json = if options.is_empty() {
        String::new()
    } else {
        format!(
            r#", "Options": [{}]"#,
            options
                .iter()
                .map(|o| format!("\"{o}\""))
                .collect::<Vec<_>>()
                .join(", ")
        )
    };
    std::fs::write(
        dir.join(MANIFEST_FILE_NAME),
        format!(r#"{{ "Guid": "{guid}", "Name": "{name}", "Description": ""{options_json} }}"#),
    )
    .unwrap();
}

fn uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap()
}

fn names(catalog: &ModCatalog) -> Vec<String> {
    catalog.list().map(|m| m.name().to_string()).collect()
}

/// Extractor that copies a prepared directory instead of unpacking a file.
struct DirExtractor(PathBuf);

impl Extractor for DirExtractor {
    fn extract<'a>(
        &'a self,
        _archive: &'a Path,
        destination: &'a Path,
    ) -> BoxFuture<'a, Result<(), ArchiveError>> {
        Box::pin(async move {
            copy_dir_contents_async(&self.0, destination)
                .await
                .map_err(|e| ArchiveError::Io {
                    path: destination.to_path_buf(),
                    source: std::io::Error::other(e.to_string()),
                })
        })
    }
}

struct FailingExtractor;

impl Extractor for FailingExtractor {
    fn extract<'a>(
        &'a self,
        archive: &'a Path,
        _destination: &'a Path,
    ) -> BoxFuture<'a, Result<(), ArchiveError>> {
        Box::pin(async move {
            Err(ArchiveError::UnsupportedFormat {
                path: archive.to_path_buf(),
            })
        })
    }
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_empty_creates_mods_dir() {
    let temp = TempDir::new().unwrap();
    let storage = temp.path().join("storage");

    let (catalog, problems) = ModCatalog::load(&storage, temp.path()).unwrap();

    assert!(catalog.is_empty());
    assert!(problems.is_empty());
    assert!(storage.join(MODS_DIR_NAME).is_dir());
}

#[test]
fn test_load_in_directory_order() {
    let fx = Fixture::new();
    fx.legacy_mod("Beta", GUID_B, &[]);
    fx.legacy_mod("Alpha", GUID_A, &["Option A"]);

    let (catalog, problems) = fx.load();

    assert!(problems.is_empty());
    assert_eq!(names(&catalog), vec!["Alpha", "Beta"]);
    assert_eq!(catalog.enabled_ids(), vec![uuid(GUID_A), uuid(GUID_B)]);
}

#[test]
fn test_load_infers_and_persists_manifest() {
    let fx = Fixture::new();
    let dir = fx.mod_dir("Loose Files");
    std::fs::create_dir(dir.join("Variant")).unwrap();

    let (catalog, problems) = fx.load();

    assert_eq!(catalog.len(), 1);
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].kind(), ProblemKind::NoManifestFound);
    assert!(dir.join(MANIFEST_FILE_NAME).is_file());

    // The persisted manifest keeps the id stable across loads
    let first_id = catalog.list().next().unwrap().id();
    let (reloaded, problems) = fx.load();
    assert!(problems.is_empty());
    assert_eq!(reloaded.list().next().unwrap().id(), first_id);
}

#[test]
fn test_load_duplicate_id_admits_one() {
    let fx = Fixture::new();
    fx.legacy_mod("First", GUID_A, &[]);
    fx.legacy_mod("Second", GUID_A, &[]);

    let (catalog, problems) = fx.load();

    assert_eq!(names(&catalog), vec!["First"]);
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].kind(), ProblemKind::Duplicate);
    assert!(problems[0].directory().ends_with("Second"));
}

#[test]
fn test_load_skips_invalid_mods() {
    let fx = Fixture::new();
    fx.legacy_mod("Good", GUID_A, &[]);
    let broken = fx.mod_dir("Broken");
    std::fs::write(broken.join(MANIFEST_FILE_NAME), "{ not json").unwrap();
    let missing = fx.mod_dir("Missing Option");
    std::fs::write(
        missing.join(MANIFEST_FILE_NAME),
        format!(r#"{{ "Guid": "{GUID_B}", "Name": "Missing", "Description": "", "Options": ["Nope"] }}"#),
    )
    .unwrap();

    let (catalog, problems) = fx.load();

    assert_eq!(names(&catalog), vec!["Good"]);
    // Directories are visited in name order: Broken, Good, Missing Option
    let kinds: Vec<ProblemKind> = problems.iter().map(ValidationProblem::kind).collect();
    assert_eq!(
        kinds,
        vec![ProblemKind::CantParseManifest, ProblemKind::InvalidPath]
    );
}

// =============================================================================
// Profile
// =============================================================================

#[test]
fn test_profile_round_trip() {
    let fx = Fixture::new();
    fx.legacy_mod("Alpha", GUID_A, &["One", "Two"]);
    fx.legacy_mod("Beta", GUID_B, &[]);
    fx.v1_mod("Gamma", GUID_V1);

    let (mut catalog, _) = fx.load();
    let (a, b, v1) = (uuid(GUID_A), uuid(GUID_B), uuid(GUID_V1));
    catalog.get_mut(&a).unwrap().select(1).unwrap();
    catalog.get_mut(&b).unwrap().set_enabled(false);
    catalog.get_mut(&v1).unwrap().toggle(1, false).unwrap();
    catalog.get_mut(&v1).unwrap().choose(0, 1).unwrap();
    assert!(catalog.move_to(&v1, 0));
    catalog.save_profile().unwrap();

    let (reloaded, _) = fx.load();
    assert_eq!(names(&reloaded), vec!["Gamma", "Alpha", "Beta"]);
    assert_eq!(reloaded.enabled_ids(), vec![v1, a]);
    assert_eq!(
        reloaded.get_by_id(&a).unwrap().state().options,
        OptionState::Legacy { selected: 1 }
    );
    assert_eq!(
        reloaded.get_by_id(&v1).unwrap().state().options,
        OptionState::V1(vec![
            OptionChoice {
                enabled: true,
                selected_sub: 1
            },
            OptionChoice {
                enabled: false,
                selected_sub: 0
            },
        ])
    );
}

#[test]
fn test_profile_file_format() {
    let fx = Fixture::new();
    fx.legacy_mod("Alpha", GUID_A, &["One", "Two"]);
    fx.v1_mod("Gamma", GUID_V1);

    let (catalog, _) = fx.load();
    catalog.save_profile().unwrap();

    let records = read_profile(&fx.storage.join("enabled.json"))
        .unwrap()
        .unwrap();
    assert_eq!(
        records,
        vec![
            ProfileRecord {
                guid: uuid(GUID_A),
                enabled: true,
                toggled: vec![],
                selected: vec![0],
            },
            ProfileRecord {
                guid: uuid(GUID_V1),
                enabled: true,
                toggled: vec![true, true],
                selected: vec![0, 0],
            },
        ]
    );

    let raw = std::fs::read_to_string(fx.storage.join("enabled.json")).unwrap();
    assert!(raw.contains("\"Guid\""));
    assert!(raw.contains("\"Toggled\""));
}

#[test]
fn test_profile_unknown_and_missing_records() {
    let fx = Fixture::new();
    fx.legacy_mod("Alpha", GUID_A, &[]);
    fx.legacy_mod("Beta", GUID_B, &[]);
    std::fs::write(
        fx.storage.join("enabled.json"),
        format!(
            r#"[
                {{ "Guid": "{GUID_V1}", "Enabled": true, "Toggled": [], "Selected": [] }},
                {{ "Guid": "{GUID_B}", "Enabled": false, "Toggled": [], "Selected": [0] }}
            ]"#
        ),
    )
    .unwrap();

    let (catalog, _) = fx.load();

    assert_eq!(names(&catalog), vec!["Beta", "Alpha"]);
    assert_eq!(catalog.enabled_ids(), vec![uuid(GUID_A)]);
}

#[test]
fn test_profile_clamps_mismatched_state() {
    let fx = Fixture::new();
    fx.legacy_mod("Alpha", GUID_A, &["One", "Two"]);
    fx.v1_mod("Gamma", GUID_V1);
    std::fs::write(
        fx.storage.join("enabled.json"),
        format!(
            r#"[
                {{ "Guid": "{GUID_A}", "Enabled": true, "Toggled": [], "Selected": [5] }},
                {{ "Guid": "{GUID_V1}", "Enabled": true, "Toggled": [false], "Selected": [-1, 3, 9] }}
            ]"#
        ),
    )
    .unwrap();

    let (catalog, _) = fx.load();

    assert_eq!(
        catalog.get_by_id(&uuid(GUID_A)).unwrap().state().options,
        OptionState::Legacy { selected: 0 }
    );
    assert_eq!(
        catalog.get_by_id(&uuid(GUID_V1)).unwrap().state().options,
        OptionState::V1(vec![
            OptionChoice {
                enabled: false,
                selected_sub: 0
            },
            OptionChoice {
                enabled: true,
                selected_sub: 0
            },
        ])
    );
}

#[test]
fn test_profile_unreadable_is_ignored() {
    let fx = Fixture::new();
    fx.legacy_mod("Alpha", GUID_A, &[]);
    std::fs::write(fx.storage.join("enabled.json"), "{}").unwrap();

    let (catalog, _) = fx.load();
    assert_eq!(catalog.enabled_ids(), vec![uuid(GUID_A)]);
}

// =============================================================================
// Ordering and lookup
// =============================================================================

#[test]
fn test_reordering() {
    let fx = Fixture::new();
    fx.legacy_mod("A", GUID_A, &[]);
    fx.legacy_mod("B", GUID_B, &[]);
    fx.legacy_mod("C", GUID_V1, &[]);
    let (mut catalog, _) = fx.load();
    let (a, c) = (uuid(GUID_A), uuid(GUID_V1));

    assert!(!catalog.move_up(&a));
    assert!(catalog.move_down(&a));
    assert_eq!(names(&catalog), vec!["B", "A", "C"]);

    assert!(!catalog.move_down(&c));
    assert!(catalog.move_up(&c));
    assert_eq!(names(&catalog), vec!["B", "C", "A"]);

    assert!(catalog.move_to(&a, 0));
    assert_eq!(names(&catalog), vec!["A", "B", "C"]);
    assert!(catalog.move_to(&a, 99));
    assert_eq!(names(&catalog), vec!["B", "C", "A"]);

    assert!(!catalog.move_to(&Uuid::nil(), 0));
    assert_eq!(catalog.position(&a), Some(2));
}

#[test]
fn test_find_by_guid_or_name() {
    let fx = Fixture::new();
    fx.legacy_mod("Alpha", GUID_A, &[]);
    let (catalog, _) = fx.load();

    assert_eq!(catalog.find(GUID_A).unwrap().name(), "Alpha");
    assert_eq!(catalog.find("Alpha").unwrap().id(), uuid(GUID_A));
    assert!(catalog.find("alpha").is_none());
    assert!(catalog.find(GUID_B).is_none());
}

#[test]
fn test_entry_selection_errors() {
    let fx = Fixture::new();
    fx.legacy_mod("Alpha", GUID_A, &["One"]);
    fx.v1_mod("Gamma", GUID_V1);
    let (mut catalog, _) = fx.load();

    let legacy = catalog.get_mut(&uuid(GUID_A)).unwrap();
    assert_eq!(
        legacy.select(1),
        Err(ResolveError::SelectionOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(legacy.toggle(0, false), Err(ResolveError::SchemaMismatch));

    let v1 = catalog.get_mut(&uuid(GUID_V1)).unwrap();
    assert_eq!(v1.select(0), Err(ResolveError::SchemaMismatch));
    assert_eq!(
        v1.toggle(2, false),
        Err(ResolveError::SelectionOutOfRange { index: 2, len: 2 })
    );
    assert_eq!(
        v1.choose(1, 0),
        Err(ResolveError::SubOptionOutOfRange {
            option: 1,
            index: 0,
            len: 0
        })
    );
    assert_eq!(
        v1.choose(0, 2),
        Err(ResolveError::SubOptionOutOfRange {
            option: 0,
            index: 2,
            len: 2
        })
    );
}

#[test]
fn test_storage_dir_name() {
    let id = uuid(GUID_A);
    assert_eq!(storage_dir_name("Better Armor", id), "Better Armor");
    assert_eq!(storage_dir_name("Armor: Red/Blue?", id), "Armor_ Red_Blue_");
    assert_eq!(storage_dir_name("Trailing... ", id), "Trailing");
    assert_eq!(storage_dir_name("???", id), GUID_A);
    assert_eq!(storage_dir_name("", id), GUID_A);
}

// =============================================================================
// Import and removal
// =============================================================================

#[tokio::test]
async fn test_add_from_archive_registers_and_notifies() {
    let fx = Fixture::new();
    let (mut catalog, _) = fx.load();
    let mut events = catalog.subscribe();

    let source = TempDir::new().unwrap();
    write_legacy(source.path(), GUID_A, "Imported Mod", &["Option A"]);

    let added = catalog
        .add_from_archive(Path::new("Imported Mod-1-0.zip"), &DirExtractor(source.path().into()))
        .await
        .unwrap();

    assert_eq!(added.id, uuid(GUID_A));
    assert!(added.warnings.is_empty());
    let entry = catalog.get_by_id(&added.id).unwrap();
    assert_eq!(
        entry.directory(),
        fx.storage.join(MODS_DIR_NAME).join("Imported Mod")
    );
    assert!(entry.directory().join("Option A").is_dir());

    assert_eq!(
        events.try_recv().unwrap(),
        CatalogEvent::Added {
            id: uuid(GUID_A),
            name: "Imported Mod".to_string()
        }
    );

    // Staging directory is gone after a successful import
    let leftovers: Vec<_> = std::fs::read_dir(&fx.temp)
        .map(|r| r.flatten().collect())
        .unwrap_or_default();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_add_from_archive_infers_manifest() {
    let fx = Fixture::new();
    let (mut catalog, _) = fx.load();

    let source = TempDir::new().unwrap();
    std::fs::write(source.path().join("0123456789abcdef.patch_0"), b"x").unwrap();

    let added = catalog
        .add_from_archive(Path::new("Loose.zip"), &DirExtractor(source.path().into()))
        .await
        .unwrap();

    assert_eq!(added.warnings.len(), 1);
    assert_eq!(added.warnings[0].kind(), ProblemKind::NoManifestFound);

    let entry = catalog.get_by_id(&added.id).unwrap();
    assert_eq!(entry.manifest().schema_version(), SchemaVersion::Legacy);
    assert!(entry.directory().join(MANIFEST_FILE_NAME).is_file());
    assert_eq!(entry.name(), "Loose");
    assert!(entry.directory().ends_with("Loose"));
}

#[tokio::test]
async fn test_add_from_archive_same_loose_archive_twice() {
    let fx = Fixture::new();
    let (mut catalog, _) = fx.load();

    let source = TempDir::new().unwrap();
    std::fs::write(source.path().join("0123456789abcdef.patch_0"), b"x").unwrap();
    let extractor = DirExtractor(source.path().into());

    catalog
        .add_from_archive(Path::new("Loose.zip"), &extractor)
        .await
        .unwrap();
    let err = catalog
        .add_from_archive(Path::new("Loose.zip"), &extractor)
        .await
        .unwrap_err();

    assert!(
        matches!(&err, CatalogError::Duplicate { destination, .. } if destination.ends_with("Loose")),
        "{err}"
    );
    let staging = err.staging_dir().unwrap();
    assert!(staging.starts_with(&fx.temp));
    assert!(staging.join("Loose").is_dir());
    assert_eq!(catalog.len(), 1);
}

#[tokio::test]
async fn test_add_from_archive_duplicate_directory() {
    let fx = Fixture::new();
    fx.legacy_mod("Imported Mod", GUID_B, &[]);
    let (mut catalog, _) = fx.load();

    let source = TempDir::new().unwrap();
    write_legacy(source.path(), GUID_A, "Imported Mod", &[]);

    let err = catalog
        .add_from_archive(Path::new("Imported.zip"), &DirExtractor(source.path().into()))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Duplicate { .. }));
    assert!(err.staging_dir().is_some_and(Path::is_dir));
    assert_eq!(catalog.len(), 1);
}

#[tokio::test]
async fn test_add_from_archive_duplicate_id_rejected() {
    let fx = Fixture::new();
    fx.legacy_mod("Original", GUID_A, &[]);
    let (mut catalog, _) = fx.load();

    let source = TempDir::new().unwrap();
    write_legacy(source.path(), GUID_A, "Copy", &[]);

    let err = catalog
        .add_from_archive(Path::new("Copy.zip"), &DirExtractor(source.path().into()))
        .await
        .unwrap_err();

    let CatalogError::Rejected { problems, .. } = &err else {
        panic!("expected rejection, got {err:?}");
    };
    assert_eq!(problems[0].kind(), ProblemKind::Duplicate);
    assert_eq!(catalog.len(), 1);
}

#[tokio::test]
async fn test_add_from_archive_extraction_failure() {
    let fx = Fixture::new();
    let (mut catalog, _) = fx.load();

    let err = catalog
        .add_from_archive(Path::new("Broken.rar"), &FailingExtractor)
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Extraction { .. }));
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn test_remove_deletes_directory() {
    let fx = Fixture::new();
    let dir = fx.legacy_mod("Alpha", GUID_A, &[]);
    fx.legacy_mod("Beta", GUID_B, &[]);
    let (mut catalog, _) = fx.load();
    let mut events = catalog.subscribe();

    assert!(catalog.remove(&uuid(GUID_A)).await.unwrap());
    assert!(!dir.exists());
    assert_eq!(names(&catalog), vec!["Beta"]);
    assert_eq!(
        events.try_recv().unwrap(),
        CatalogEvent::Removed {
            id: uuid(GUID_A),
            name: "Alpha".to_string()
        }
    );

    assert!(!catalog.remove(&uuid(GUID_A)).await.unwrap());
}
