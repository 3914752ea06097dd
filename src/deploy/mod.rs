// hdmm-rs: Helldivers 2 Mod Manager - deployment engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deployment engine.
//!
//! ```text
//! Deployer::deploy(ids, catalog)
//!   ids empty ------------------------------------------> Ok(empty report)
//!   cancelled? -----------------------------------------> Err(Cancelled)
//!   data dir missing / inaccessible --------------------> Err(...)
//!   purge(data dir)   any file left ---------------------> Err(PurgeIncomplete)
//!   plan:   id --> catalog --> resolve_include_paths     failure --> ModFailure
//!   scan:   one blocking task per mod, in parallel       failure --> ModFailure
//!   merge:  sequential, in id order, then include order
//!             asset id --> [triplet, triplet, ...]
//!   assign: index 0.. (1.. for ids in the skip set)
//!   write:  <asset>.patch_<i>, .gpu_resources, .stream   failure --> FileFailure
//!             copy member, or create an empty file
//! ```
//!
//! Parallelism never changes the result: scan results are merged in a fixed
//! order after every scan has finished. Cancellation is only honored before
//! the purge starts.

pub mod purge;
pub mod report;


use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::catalog::ModCatalog;
use crate::config::types::default_concurrency;
use crate::error::{DeployError, PatchError, PurgeError};
use crate::logging::LogContext;
use crate::patch::{AssetId, PatchFileName, PatchFileTriplet, PatchKind, ScanResult, scan};
use crate::resolve::resolve_include_paths;
use report::{DeployReport, FileFailure, ModFailure, PurgeReport};

/// Triplets per asset id, in override order.
pub type AssetGroups = BTreeMap<AssetId, Vec<PatchFileTriplet>>;

/// One triplet at its final patch index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub asset_id: AssetId,
    pub index: u64,
    pub triplet: PatchFileTriplet,
}

/// Appends scan results to `groups`, keeping the order they are given in.
pub fn merge(groups: &mut AssetGroups, scans: impl IntoIterator<Item = ScanResult>) {
    for scan in scans {
        for (asset_id, triplets) in scan {
            groups.entry(asset_id).or_default().extend(triplets);
        }
    }
}

/// Assigns sequential patch indices to every triplet.
///
/// Numbering starts at 0, or at 1 for asset ids in `skip_set`.
#[must_use]
pub fn assign_indices(groups: AssetGroups, skip_set: &BTreeSet<AssetId>) -> Vec<Placement> {
    let mut placements = Vec::new();
    for (asset_id, triplets) in groups {
        let offset = u64::from(skip_set.contains(&asset_id));
        placements.extend(
            (offset..)
                .zip(triplets)
                .map(|(index, triplet)| Placement {
                    asset_id,
                    index,
                    triplet,
                }),
        );
    }
    placements
}

/// A mod ready to be scanned.
#[derive(Debug)]
struct ModPlan {
    id: Uuid,
    name: String,
    root: PathBuf,
    includes: Vec<PathBuf>,
}

/// Deploys mods into a game data directory.
#[derive(Debug)]
pub struct Deployer {
    data_dir: PathBuf,
    skip_set: BTreeSet<AssetId>,
    cancel_token: CancellationToken,
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl Deployer {
    /// Creates a deployer for `data_dir`.
    ///
    /// The default concurrency limit is the number of CPU cores.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let concurrency = default_concurrency();
        Self {
            data_dir: data_dir.into(),
            skip_set: BTreeSet::new(),
            cancel_token: CancellationToken::new(),
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        }
    }

    /// Limits how many scans, copies and deletions run at once.
    #[must_use]
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.concurrency = max_concurrent.max(1);
        self.semaphore = Arc::new(Semaphore::new(self.concurrency));
        self
    }

    /// Asset ids whose numbering starts at 1.
    #[must_use]
    pub fn with_skip_set(mut self, skip_set: BTreeSet<AssetId>) -> Self {
        self.skip_set = skip_set;
        self
    }

    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub const fn skip_set(&self) -> &BTreeSet<AssetId> {
        &self.skip_set
    }

    /// Returns the cancellation token for sharing with the caller.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Requests cancellation. A deployment that has already started its
    /// purge runs to completion.
    pub fn interrupt(&self) {
        info!("interrupting deployment");
        self.cancel_token.cancel();
    }

    /// Purges the data directory without deploying.
    ///
    /// # Errors
    ///
    /// See [`purge::purge`].
    pub async fn purge(&self) -> Result<PurgeReport, PurgeError> {
        purge::purge(&self.data_dir, self.concurrency).await
    }

    /// Purges the data directory and deploys `ids` in order.
    ///
    /// Later mods in `ids` take precedence in game.
    ///
    /// # Errors
    ///
    /// Only conditions that make the whole deployment meaningless:
    /// cancellation, a missing or inaccessible data directory, and an
    /// incomplete purge. Everything else is reported in [`DeployReport`].
    pub async fn deploy(
        &self,
        ids: &[Uuid],
        catalog: &ModCatalog,
    ) -> Result<DeployReport, DeployError> {
        if ids.is_empty() {
            info!("no mods enabled, skipping deployment");
            return Ok(DeployReport::default());
        }
        if self.is_cancelled() {
            return Err(DeployError::Cancelled);
        }
        self.check_data_dir().await?;

        let purged = self.purge().await?;
        if !purged.is_complete() {
            error!(failed = purged.failures.len(), "purge incomplete");
            return Err(DeployError::PurgeIncomplete {
                failed: purged.failures.len(),
            });
        }

        info!(mods = ids.len(), "starting deployment");
        let mut report = DeployReport {
            purged: purged.deleted,
            ..DeployReport::default()
        };

        let plans = plan(ids, catalog, &mut report.mod_failures);
        let scanned = self.scan_all(plans).await;

        let mut groups = AssetGroups::new();
        for (plan, result) in scanned {
            match result {
                Ok(scans) => {
                    merge(&mut groups, scans);
                    report.mods_deployed += 1;
                }
                Err(reason) => {
                    warn!(mod_id = %plan.id, name = %plan.name, %reason, "skipping mod");
                    report.mod_failures.push(ModFailure {
                        id: plan.id,
                        name: Some(plan.name),
                        reason,
                    });
                }
            }
        }

        let placements = assign_indices(groups, &self.skip_set);
        debug!(placements = placements.len(), "writing patch files");
        let (written, file_failures) = self.write_all(placements).await;
        report.files_written = written;
        report.file_failures = file_failures;

        info!(
            mods = report.mods_deployed,
            files = report.files_written,
            mod_failures = report.mod_failures.len(),
            file_failures = report.file_failures.len(),
            "deployment finished"
        );
        Ok(report)
    }

    async fn check_data_dir(&self) -> Result<(), DeployError> {
        match tokio::fs::metadata(&self.data_dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(DeployError::DataDirMissing {
                path: self.data_dir.clone(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DeployError::DataDirMissing {
                    path: self.data_dir.clone(),
                })
            }
            Err(source) => Err(DeployError::DataDirInaccessible {
                path: self.data_dir.clone(),
                source,
            }),
        }
    }

    /// Scans every plan in parallel and returns the results in plan order.
    async fn scan_all(&self, plans: Vec<ModPlan>) -> Vec<(ModPlan, Result<Vec<ScanResult>, String>)> {
        let mut handles = Vec::with_capacity(plans.len());
        for plan in &plans {
            let permit = Arc::clone(&self.semaphore).acquire_owned().await;
            let root = plan.root.clone();
            let includes = plan.includes.clone();
            let mut ctx = LogContext::with_mod(plan.name.clone());
            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                scan_includes(&root, &includes, &mut ctx)
            }));
        }

        let mut results = Vec::with_capacity(plans.len());
        for (plan, handle) in plans.into_iter().zip(handles) {
            let result = match handle.await {
                Ok(Ok(scans)) => Ok(scans),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(format!("scan task failed: {e}")),
            };
            results.push((plan, result));
        }
        results
    }

    /// Writes every placement and returns the number of files written.
    async fn write_all(&self, placements: Vec<Placement>) -> (usize, Vec<FileFailure>) {
        let mut handles = Vec::with_capacity(placements.len());
        for placement in placements {
            let permit = Arc::clone(&self.semaphore).acquire_owned().await;
            let data_dir = self.data_dir.clone();
            let slot = (placement.asset_id, placement.index);
            handles.push((
                slot,
                tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    write_placement(&data_dir, &placement)
                }),
            ));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for ((asset_id, index), handle) in handles {
            let outcome = handle.await.map_err(|e| format!("write task failed: {e}"));
            outcomes.push((asset_id, index, outcome));
        }
        collect_writes(&self.data_dir, outcomes)
    }
}

/// Outcome of writing one placement: files written and per-file failures,
/// or the reason the write task never finished.
type WriteOutcome = Result<(usize, Vec<FileFailure>), String>;

/// Totals the write outcomes. A task that never finished is reported
/// against the base file of its placement.
fn collect_writes(
    data_dir: &Path,
    outcomes: Vec<(AssetId, u64, WriteOutcome)>,
) -> (usize, Vec<FileFailure>) {
    let mut written = 0;
    let mut failures = Vec::new();
    for (asset_id, index, outcome) in outcomes {
        match outcome {
            Ok((count, mut failed)) => {
                written += count;
                failures.append(&mut failed);
            }
            Err(message) => {
                let name = PatchFileName {
                    asset_id,
                    index,
                    kind: PatchKind::Base,
                };
                error!(asset = %asset_id, index, error = %message, "write task failed");
                failures.push(FileFailure {
                    asset_id,
                    index,
                    destination: data_dir.join(name.file_name()),
                    message,
                });
            }
        }
    }
    (written, failures)
}

/// Resolves every requested mod. Mods that cannot be resolved are recorded
/// in `failures` and left out.
fn plan(ids: &[Uuid], catalog: &ModCatalog, failures: &mut Vec<ModFailure>) -> Vec<ModPlan> {
    let mut plans = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(entry) = catalog.get_by_id(id) else {
            warn!(mod_id = %id, "mod not found, skipping");
            failures.push(ModFailure {
                id: *id,
                name: None,
                reason: "mod is not in the catalog".to_string(),
            });
            continue;
        };

        match resolve_include_paths(entry.manifest(), &entry.state().options) {
            Ok(includes) => {
                debug!(
                    mod_id = %id,
                    name = entry.name(),
                    schema = %entry.manifest().schema_version(),
                    includes = includes.len(),
                    "resolved include paths"
                );
                plans.push(ModPlan {
                    id: *id,
                    name: entry.name().to_string(),
                    root: entry.directory().to_path_buf(),
                    includes,
                });
            }
            Err(e) => {
                warn!(mod_id = %id, name = entry.name(), error = %e, "cannot resolve options");
                failures.push(ModFailure {
                    id: *id,
                    name: Some(entry.name().to_string()),
                    reason: e.to_string(),
                });
            }
        }
    }
    plans
}

fn scan_includes(
    root: &Path,
    includes: &[PathBuf],
    ctx: &mut LogContext,
) -> Result<Vec<ScanResult>, PatchError> {
    let mut scans = Vec::with_capacity(includes.len());
    for include in includes {
        ctx.set_include(include.display().to_string());
        let result = scan(&root.join(include));
        match &result {
            Ok(found) => debug!("{}found {} asset(s)", ctx.prefix(), found.len()),
            Err(e) => warn!("{}{e}", ctx.prefix()),
        }
        scans.push(result?);
    }
    ctx.clear_include();
    Ok(scans)
}

/// Writes the three files of one placement. Returns the number written and
/// one failure per file that could not be written.
fn write_placement(data_dir: &Path, placement: &Placement) -> (usize, Vec<FileFailure>) {
    let mut written = 0;
    let mut failures = Vec::new();

    for kind in PatchKind::ALL {
        let name = PatchFileName {
            asset_id: placement.asset_id,
            index: placement.index,
            kind,
        };
        let destination = data_dir.join(name.file_name());
        let result = match placement.triplet.member(kind) {
            Some(source) => std::fs::copy(source, &destination).map(|_| ()),
            None => std::fs::File::create(&destination).map(|_| ()),
        };
        match result {
            Ok(()) => written += 1,
            Err(e) => {
                warn!(file = %destination.display(), error = %e, "failed to write patch file");
                failures.push(FileFailure {
                    asset_id: placement.asset_id,
                    index: placement.index,
                    destination,
                    message: e.to_string(),
                });
            }
        }
    }

    (written, failures)
}
