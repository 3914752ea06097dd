// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mod catalog.
//!
//! ```text
//! <storage>/
//!   enabled.json          profile, see [`profile`]
//!   Mods/
//!     <display name>/     one directory per mod
//!       manifest.json
//!       ...
//!
//! ModCatalog
//!   entries: Uuid -> ModEntry { manifest, directory, state }
//!   order:   [Uuid]        deployment priority, first = lowest
//!   events:  broadcast     Added | Removed
//! ```
//!
//! # Importing
//!
//! ```text
//! archive --extract--> <temp>/<uuid>/<stem> --parse_dir--> problems?
//!                                |                            | errors
//!                                | inferred? write manifest   v
//!                                v                         Rejected
//!                      <storage>/Mods/<name> exists? --yes--> Duplicate
//!                                | rename, or copy + delete
//!                                v
//!                        register + Added event
//! ```
//!
//! A mod without a manifest is named after the archive stem. A failed
//! import leaves `<temp>/<uuid>` on disk; the error carries its path
//! ([`CatalogError::staging_dir`]).

pub mod profile;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::archive::Extractor;
use crate::error::{CatalogError, ResolveError};
use crate::manifest::parse::parse_dir;
use crate::manifest::problem::ValidationProblem;
use crate::manifest::Manifest;
use crate::resolve::OptionState;
use crate::utility::fs::copy::move_dir_async;
use profile::{PROFILE_FILE_NAME, ProfileRecord, read_profile, write_profile};

/// Name of the directory under storage that holds installed mods.
pub const MODS_DIR_NAME: &str = "Mods";

const EVENT_CAPACITY: usize = 64;

/// Mutable per-mod state, persisted in the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModRuntimeState {
    /// Whether the mod participates in deployment.
    pub enabled: bool,
    pub options: OptionState,
}

impl ModRuntimeState {
    /// Enabled, with the default option state for `manifest`.
    #[must_use]
    pub fn default_for(manifest: &Manifest) -> Self {
        Self {
            enabled: true,
            options: OptionState::default_for(manifest),
        }
    }
}

/// An installed mod.
#[derive(Debug, Clone)]
pub struct ModEntry {
    manifest: Manifest,
    directory: PathBuf,
    state: ModRuntimeState,
}

impl ModEntry {
    #[must_use]
    pub fn new(manifest: Manifest, directory: PathBuf) -> Self {
        let state = ModRuntimeState::default_for(&manifest);
        Self {
            manifest,
            directory,
            state,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.manifest.id()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.manifest.name()
    }

    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Root directory of the mod in storage.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    #[must_use]
    pub const fn state(&self) -> &ModRuntimeState {
        &self.state
    }

    pub const fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    /// Selects a Legacy option by index.
    ///
    /// # Errors
    ///
    /// [`ResolveError::SchemaMismatch`] for a V1 mod,
    /// [`ResolveError::SelectionOutOfRange`] for a bad index.
    pub fn select(&mut self, index: usize) -> Result<(), ResolveError> {
        let Manifest::Legacy(m) = &self.manifest else {
            return Err(ResolveError::SchemaMismatch);
        };
        let len = m.options.as_ref().map_or(0, Vec::len);
        if index >= len {
            return Err(ResolveError::SelectionOutOfRange { index, len });
        }
        self.state.options = OptionState::Legacy { selected: index };
        Ok(())
    }

    /// Turns a V1 option on or off.
    ///
    /// # Errors
    ///
    /// [`ResolveError::SchemaMismatch`] for a Legacy mod,
    /// [`ResolveError::SelectionOutOfRange`] for a bad option index.
    pub fn toggle(&mut self, option: usize, enabled: bool) -> Result<(), ResolveError> {
        let OptionState::V1(choices) = &mut self.state.options else {
            return Err(ResolveError::SchemaMismatch);
        };
        let len = choices.len();
        let choice = choices
            .get_mut(option)
            .ok_or(ResolveError::SelectionOutOfRange { index: option, len })?;
        choice.enabled = enabled;
        Ok(())
    }

    /// Selects the active sub-option of a V1 option.
    ///
    /// # Errors
    ///
    /// [`ResolveError::SchemaMismatch`] for a Legacy mod,
    /// [`ResolveError::SelectionOutOfRange`] for a bad option index,
    /// [`ResolveError::SubOptionOutOfRange`] for a bad sub-option index.
    pub fn choose(&mut self, option: usize, sub: usize) -> Result<(), ResolveError> {
        let (Manifest::V1(m), OptionState::V1(choices)) = (&self.manifest, &mut self.state.options)
        else {
            return Err(ResolveError::SchemaMismatch);
        };
        let options = m.options.as_deref().unwrap_or_default();
        let (Some(opt), Some(choice)) = (options.get(option), choices.get_mut(option)) else {
            return Err(ResolveError::SelectionOutOfRange {
                index: option,
                len: options.len(),
            });
        };
        let len = opt.sub_options.as_ref().map_or(0, Vec::len);
        if sub >= len {
            return Err(ResolveError::SubOptionOutOfRange {
                option,
                index: sub,
                len,
            });
        }
        choice.selected_sub = sub;
        Ok(())
    }
}

/// Notification sent when the set of installed mods changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    Added { id: Uuid, name: String },
    Removed { id: Uuid, name: String },
}

/// Successful import from an archive.
#[derive(Debug)]
pub struct AddedMod {
    pub id: Uuid,
    /// Non-blocking problems found while importing.
    pub warnings: Vec<ValidationProblem>,
}

/// The installed mods and their deployment order.
#[derive(Debug)]
pub struct ModCatalog {
    mods_dir: PathBuf,
    profile_path: PathBuf,
    temp_dir: PathBuf,
    entries: HashMap<Uuid, ModEntry>,
    order: Vec<Uuid>,
    events: broadcast::Sender<CatalogEvent>,
}

impl ModCatalog {
    /// Empty catalog over `storage`, staging imports under `temp`.
    #[must_use]
    pub fn new(storage: &Path, temp: &Path) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            mods_dir: storage.join(MODS_DIR_NAME),
            profile_path: storage.join(PROFILE_FILE_NAME),
            temp_dir: temp.to_path_buf(),
            entries: HashMap::new(),
            order: Vec::new(),
            events,
        }
    }

    /// Loads every mod under `storage/Mods` and applies the saved profile.
    ///
    /// Directories are visited in name order. Mods with error problems are
    /// left out; all problems are returned. A directory without a manifest
    /// gets the inferred one written to disk. An unreadable profile is
    /// logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the mods directory cannot be created
    /// or listed.
    pub fn load(storage: &Path, temp: &Path) -> Result<(Self, Vec<ValidationProblem>), CatalogError> {
        let mut catalog = Self::new(storage, temp);
        let io_error = |path: &Path, source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };

        std::fs::create_dir_all(&catalog.mods_dir).map_err(|e| io_error(&catalog.mods_dir, e))?;
        let mut dirs: Vec<PathBuf> = std::fs::read_dir(&catalog.mods_dir)
            .map_err(|e| io_error(&catalog.mods_dir, e))?
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .map(|e| e.path())
            .collect();
        dirs.sort();

        info!(dir = %catalog.mods_dir.display(), candidates = dirs.len(), "loading mods");

        let mut problems = Vec::new();
        for dir in dirs {
            let report = parse_dir(&dir, |id| catalog.entries.contains_key(id));
            let inferred = report.inferred();
            let (manifest, found) = report.into_parts();
            problems.extend(found);

            let Some(manifest) = manifest else {
                warn!(dir = %dir.display(), "skipping mod");
                continue;
            };
            if inferred {
                match manifest.write_to_dir(&dir) {
                    Ok(path) => info!(path = %path.display(), "wrote inferred manifest"),
                    Err(e) => warn!(error = %e, "inferred manifest not saved"),
                }
            }
            catalog.insert(ModEntry::new(manifest, dir));
        }

        match read_profile(&catalog.profile_path) {
            Ok(Some(records)) => catalog.apply_profile(&records),
            Ok(None) => debug!(path = %catalog.profile_path.display(), "no profile, using defaults"),
            Err(e) => warn!(error = %e, "ignoring unreadable profile"),
        }

        info!(mods = catalog.len(), problems = problems.len(), "catalog loaded");
        Ok((catalog, problems))
    }

    /// Mods in deployment order.
    pub fn list(&self) -> impl Iterator<Item = &ModEntry> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn get_by_id(&self, id: &Uuid) -> Option<&ModEntry> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut ModEntry> {
        self.entries.get_mut(id)
    }

    /// Looks a mod up by GUID or exact display name.
    #[must_use]
    pub fn find(&self, query: &str) -> Option<&ModEntry> {
        if let Ok(id) = Uuid::parse_str(query) {
            return self.get_by_id(&id);
        }
        self.list().find(|m| m.name() == query)
    }

    /// Position of a mod in the deployment order.
    #[must_use]
    pub fn position(&self, id: &Uuid) -> Option<usize> {
        self.order.iter().position(|o| o == id)
    }

    /// Ids of enabled mods in deployment order.
    #[must_use]
    pub fn enabled_ids(&self) -> Vec<Uuid> {
        self.list()
            .filter(|m| m.state().enabled)
            .map(ModEntry::id)
            .collect()
    }

    /// Moves a mod one place earlier. Returns false if it is absent or first.
    pub fn move_up(&mut self, id: &Uuid) -> bool {
        match self.position(id) {
            Some(pos) if pos > 0 => {
                self.order.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    /// Moves a mod one place later. Returns false if it is absent or last.
    pub fn move_down(&mut self, id: &Uuid) -> bool {
        match self.position(id) {
            Some(pos) if pos + 1 < self.order.len() => {
                self.order.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }

    /// Moves a mod to `index`, clamped to the last position.
    /// Returns false if the mod is absent.
    pub fn move_to(&mut self, id: &Uuid, index: usize) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let id = self.order.remove(pos);
        let index = index.min(self.order.len());
        self.order.insert(index, id);
        true
    }

    /// Receives future [`CatalogEvent`]s.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    /// Imports a mod from an archive file.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Extraction`] if the archive cannot be extracted
    /// - [`CatalogError::Rejected`] if the mod has error problems
    /// - [`CatalogError::Duplicate`] if the storage directory already exists
    /// - [`CatalogError::Move`] if the mod cannot be moved into storage
    pub async fn add_from_archive(
        &mut self,
        archive: &Path,
        extractor: &dyn Extractor,
    ) -> Result<AddedMod, CatalogError> {
        let stem = archive
            .file_stem()
            .map_or_else(|| "mod".to_string(), |s| s.to_string_lossy().into_owned());
        // The leaf keeps the archive stem; inference names the mod after it.
        let staging_root = self.temp_dir.join(Uuid::new_v4().simple().to_string());
        let staging = staging_root.join(&stem);

        info!(archive = %archive.display(), staging = %staging.display(), "importing mod");

        extractor
            .extract(archive, &staging)
            .await
            .map_err(|source| CatalogError::Extraction {
                archive: archive.to_path_buf(),
                staging: staging_root.clone(),
                source,
            })?;

        let taken: HashSet<Uuid> = self.entries.keys().copied().collect();
        let dir = staging.clone();
        let report = tokio::task::spawn_blocking(move || parse_dir(&dir, |id| taken.contains(id)))
            .await
            .map_err(|e| CatalogError::Io {
                path: staging.clone(),
                source: std::io::Error::other(e),
            })?;

        let inferred = report.inferred();
        let (manifest, problems) = report.into_parts();
        let Some(manifest) = manifest else {
            warn!(staging = %staging.display(), "import rejected");
            return Err(CatalogError::Rejected {
                staging: staging_root,
                problems,
            });
        };

        if inferred {
            manifest
                .write_to_dir(&staging)
                .map_err(|e| CatalogError::Io {
                    path: staging.clone(),
                    source: std::io::Error::other(e),
                })?;
        }

        let destination = self
            .mods_dir
            .join(storage_dir_name(manifest.name(), manifest.id()));
        if destination.exists() {
            warn!(destination = %destination.display(), "mod directory already exists");
            return Err(CatalogError::Duplicate {
                destination,
                staging: staging_root,
            });
        }

        move_dir_async(&staging, &destination)
            .await
            .map_err(|e| CatalogError::Move {
                from: staging.clone(),
                to: destination.clone(),
                message: format!("{e:#}"),
            })?;

        if let Err(e) = tokio::fs::remove_dir_all(&staging_root).await {
            warn!(dir = %staging_root.display(), error = %e, "staging directory not removed");
        }

        let id = manifest.id();
        let name = manifest.name().to_string();
        self.insert(ModEntry::new(manifest, destination));
        let _ = self.events.send(CatalogEvent::Added {
            id,
            name: name.clone(),
        });

        info!(%id, name, "mod added");
        Ok(AddedMod {
            id,
            warnings: problems,
        })
    }

    /// Removes a mod and deletes its directory.
    ///
    /// Returns `Ok(false)` if no mod has this id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the directory cannot be deleted; the
    /// mod then stays in the catalog.
    pub async fn remove(&mut self, id: &Uuid) -> Result<bool, CatalogError> {
        let Some(entry) = self.entries.get(id) else {
            debug!(%id, "remove: mod not in catalog");
            return Ok(false);
        };

        let directory = entry.directory().to_path_buf();
        match tokio::fs::remove_dir_all(&directory).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(dir = %directory.display(), "mod directory already gone");
            }
            Err(source) => {
                return Err(CatalogError::Io {
                    path: directory,
                    source,
                });
            }
        }

        let Some(entry) = self.entries.remove(id) else {
            return Ok(false);
        };
        self.order.retain(|o| o != id);
        let name = entry.name().to_string();
        let _ = self.events.send(CatalogEvent::Removed {
            id: *id,
            name: name.clone(),
        });

        info!(%id, name, "mod removed");
        Ok(true)
    }

    /// Writes the current order and runtime state to the profile.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Profile`] if the file cannot be written.
    pub fn save_profile(&self) -> Result<(), CatalogError> {
        let records: Vec<ProfileRecord> = self
            .list()
            .map(|m| ProfileRecord::capture(m.id(), m.state()))
            .collect();
        write_profile(&self.profile_path, &records)?;
        debug!(path = %self.profile_path.display(), records = records.len(), "profile saved");
        Ok(())
    }

    /// Applies profile records: known mods move to the front in record
    /// order with their saved state, unknown ids are skipped, and the rest
    /// keep their defaults after them.
    pub fn apply_profile(&mut self, records: &[ProfileRecord]) {
        let mut order = Vec::with_capacity(self.order.len());
        for record in records {
            if order.contains(&record.guid) {
                continue;
            }
            let Some(entry) = self.entries.get_mut(&record.guid) else {
                warn!(id = %record.guid, "profile entry has no matching mod, skipping");
                continue;
            };
            entry.state = record.restore(&entry.manifest);
            order.push(record.guid);
        }

        let remainder: Vec<Uuid> = self
            .order
            .iter()
            .filter(|id| !order.contains(id))
            .copied()
            .collect();
        if !remainder.is_empty() {
            info!(count = remainder.len(), "mods without a profile entry keep defaults");
        }
        order.extend(remainder);
        self.order = order;
    }

    fn insert(&mut self, entry: ModEntry) {
        let id = entry.id();
        if self.entries.insert(id, entry).is_none() {
            self.order.push(id);
        }
    }
}

/// Directory name for a mod in storage, derived from its display name.
///
/// Characters that are invalid in Windows file names become `_`; trailing
/// dots and spaces are dropped. Falls back to the id if nothing is left.
#[must_use]
pub fn storage_dir_name(name: &str, id: Uuid) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = cleaned.trim().trim_end_matches(['.', ' ']);
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '_') {
        id.to_string()
    } else {
        trimmed.to_string()
    }
}
