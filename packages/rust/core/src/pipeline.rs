//! Package scan pipeline: glob patterns → directories → package records.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use docsite_discovery::{
    extract_definition, get_all_directories, get_files_in_dir, is_doc, is_example,
};
use docsite_shared::{
    DocsiteError, FileRef, PackageRecord, Result, ScanFailure, ScanOptions, ScanResult,
};

/// Progress callback for reporting scan status.
pub trait ScanObserver: Send + Sync {
    /// Called after a package record has been built.
    fn package_found(&self, record: &PackageRecord);
    /// Called for a candidate directory with no definition file.
    fn directory_skipped(&self, dir: &Path);
    /// Called when a candidate directory could not be processed.
    fn directory_failed(&self, dir: &Path, error: &DocsiteError);
    /// Called when the scan completes.
    fn done(&self, result: &ScanResult);
}

/// No-op observer for headless/test usage.
pub struct SilentObserver;

impl ScanObserver for SilentObserver {
    fn package_found(&self, _record: &PackageRecord) {}
    fn directory_skipped(&self, _dir: &Path) {}
    fn directory_failed(&self, _dir: &Path, _error: &DocsiteError) {}
    fn done(&self, _result: &ScanResult) {}
}

/// Scan every directory matched by `patterns` and build the package catalog.
pub fn get_packages_info<S: AsRef<str>>(
    patterns: &[S],
    options: &ScanOptions,
) -> Result<ScanResult> {
    get_packages_info_with(patterns, options, &SilentObserver)
}

/// Like [`get_packages_info`], reporting progress to `observer`.
///
/// 1. Resolve patterns to candidate directories
/// 2. Find each candidate's definition file; skip candidates without one
/// 3. Collect README, examples and docs for each package
/// 4. Flatten every example path into `external_sources`
///
/// A failing directory is recorded in `errors` and the scan continues, unless
/// `options.strict` is set, in which case the first error is returned.
#[instrument(skip_all, fields(patterns = patterns.len(), strict = options.strict))]
pub fn get_packages_info_with<S: AsRef<str>>(
    patterns: &[S],
    options: &ScanOptions,
    observer: &dyn ScanObserver,
) -> Result<ScanResult> {
    let candidates = get_all_directories(patterns, options.root.as_deref())?;
    debug!(candidates = candidates.len(), "resolved candidate directories");

    let mut result = ScanResult::default();
    let mut ids: HashMap<String, PathBuf> = HashMap::new();

    for dir in candidates {
        let outcome = build_record(&dir, options.use_manifests).and_then(|record| match record {
            Some(record) => claim_id(&mut ids, record).map(Some),
            None => Ok(None),
        });

        match outcome {
            Ok(Some(record)) => {
                result
                    .external_sources
                    .extend(record.examples_paths.iter().map(|example| example.path.clone()));
                observer.package_found(&record);
                result.packages.push(record);
            }
            Ok(None) => {
                debug!(dir = %dir.display(), "no package definition, skipping");
                observer.directory_skipped(&dir);
            }
            Err(e) if options.strict => return Err(e),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to read package");
                observer.directory_failed(&dir, &e);
                result.errors.push(ScanFailure {
                    dir,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        packages = result.packages.len(),
        external_sources = result.external_sources.len(),
        errors = result.errors.len(),
        "package scan complete"
    );
    observer.done(&result);

    Ok(result)
}

/// Build the record for one candidate, or `None` if it is not a package.
fn build_record(pkg_path: &Path, use_manifests: bool) -> Result<Option<PackageRecord>> {
    let Some(definition) = extract_definition(pkg_path, use_manifests)? else {
        return Ok(None);
    };

    let id = pkg_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let readme = pkg_path.join("README.md");
    let readme_path = if readme.exists() { readme } else { PathBuf::new() };

    let examples_paths = filter_files(&pkg_path.join("examples"), is_example)?;
    let docs_paths = filter_files(&pkg_path.join("docs"), is_doc)?;

    Ok(Some(PackageRecord {
        id,
        name: definition.value_field("name"),
        description: definition.value_field("description"),
        version: definition.value_field("version"),
        maintainers: definition.value_field("maintainers"),
        repository: definition.value_field("repository"),
        pkg_path: pkg_path.to_path_buf(),
        readme_path,
        examples_paths,
        docs_paths,
        definition: definition.kind,
    }))
}

fn filter_files(dir: &Path, keep: fn(&Path) -> Result<bool>) -> Result<Vec<FileRef>> {
    let mut kept = Vec::new();
    for file in get_files_in_dir(dir)? {
        if keep(&file.path)? {
            kept.push(file);
        }
    }
    Ok(kept)
}

fn claim_id(ids: &mut HashMap<String, PathBuf>, record: PackageRecord) -> Result<PackageRecord> {
    if let Some(first) = ids.get(&record.id) {
        return Err(DocsiteError::DuplicateId {
            id: record.id,
            first: first.clone(),
            second: record.pkg_path,
        });
    }
    ids.insert(record.id.clone(), record.pkg_path.clone());
    Ok(record)
}
