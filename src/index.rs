use crate::config::AppConfig;
use crate::error::AppError;
use crate::geocode::{self, GeocodeResolver};
use crate::manifest::Manifest;
use crate::metadata::{PhotoRecord, SkippedEntry};
use crate::processor;
use crate::query::{self, Query};
use std::collections::HashSet;
use std::path::Path;

/// Read-only collection of photos in manifest order, plus the entries the
/// last build had to skip. Rebuilding means constructing a new index.
#[derive(Debug, Clone, Default)]
pub struct PhotoIndex {
    records: Vec<PhotoRecord>,
    skipped: Vec<SkippedEntry>,
}

impl PhotoIndex {
    /// Ingests every manifest entry. Per-entry failures end up in
    /// [`PhotoIndex::skipped`]; they never fail the build.
    pub fn build(manifest: &Manifest, resolver: &dyn GeocodeResolver) -> Self {
        let mut seen = HashSet::new();
        let mut slots = Vec::with_capacity(manifest.len());
        let mut unique = Vec::with_capacity(manifest.len());
        for path in manifest.entries() {
            if seen.insert(path.as_str()) {
                slots.push(Some(unique.len()));
                unique.push(path.clone());
            } else {
                slots.push(None);
            }
        }

        let mut results: Vec<Option<Result<PhotoRecord, AppError>>> =
            processor::process_all(&unique, resolver).into_iter().map(Some).collect();

        let mut index = PhotoIndex::default();
        for (path, slot) in manifest.entries().iter().zip(slots) {
            match slot.and_then(|i| results[i].take()) {
                Some(Ok(record)) => index.records.push(record),
                Some(Err(e)) => index.skipped.push(SkippedEntry {
                    path: path.clone(),
                    reason: skip_reason(e),
                }),
                None => {
                    log::warn!("Skipping duplicate manifest entry: {}", path);
                    index.skipped.push(SkippedEntry {
                        path: path.clone(),
                        reason: "duplicate manifest entry".into(),
                    });
                }
            }
        }

        log::info!(
            "Index built: {} photos ingested, {} skipped",
            index.records.len(),
            index.skipped.len()
        );
        index
    }

    /// Builds on a dedicated pool of `workers` threads (0 lets rayon decide).
    pub fn build_with_workers(
        manifest: &Manifest,
        resolver: &dyn GeocodeResolver,
        workers: usize,
    ) -> Result<Self, AppError> {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
        log::info!("Starting image processing with {} workers", pool.current_num_threads());
        Ok(pool.install(|| Self::build(manifest, resolver)))
    }

    /// Reads the manifest at `manifest_path` and builds with the configured
    /// resolver and pool size. Only a manifest that cannot be read fails.
    pub fn from_manifest_file(manifest_path: impl AsRef<Path>, config: &AppConfig) -> Result<Self, AppError> {
        let manifest = Manifest::from_file(manifest_path)?;
        let resolver = geocode::from_config(config)?;
        Self::build_with_workers(&manifest, resolver.as_ref(), config.num_workers)
    }

    pub fn query(&self, predicates: &Query) -> Vec<&PhotoRecord> {
        let found = query::run(&self.records, predicates);
        log::debug!("Query {:?} matched {} of {} photos", predicates, found.len(), self.records.len());
        found
    }

    pub fn records(&self) -> &[PhotoRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, file_path: &str) -> Option<&PhotoRecord> {
        self.records.iter().find(|r| r.file_path == file_path)
    }
}

/// Unreadable-image errors already name the path; report just the cause.
fn skip_reason(error: AppError) -> String {
    match error {
        AppError::UnreadableImage { reason, .. } => reason,
        other => other.to_string(),
    }
}
