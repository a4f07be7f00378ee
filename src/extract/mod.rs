//! # Selective extraction
//!
//! Extraction runs in two phases:
//!
//! 1. **Classification** walks the archive directory once, sequentially, and
//!    builds an [`ExtractionPlan`]: which entries to write, where, and how many
//!    bytes in total. Destination directories are created at the end of this
//!    phase.
//! 2. **Materialization** hands every file task to a fixed pool of workers
//!    (see [`pool`]). Workers write independently; the first error in
//!    completion order becomes the result once all of them are done.
//!
//! A failed run is not rolled back. Files written before the failure stay on
//! disk and a rerun overwrites them, so repeated runs converge on the same
//! tree.

mod pool;

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{InstallError, Result};
use crate::layout::{normalize_entry_name, region_of, safe_relative_path, Region};
use crate::progress::ProgressSink;
use crate::selection::Selection;

/// Worker count used when the caller does not pick one.
pub const DEFAULT_WORKERS: usize = 4;

/// Tuning knobs for [`extract`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Number of parallel writer threads. Values below 1 are treated as 1.
    pub workers: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { workers: DEFAULT_WORKERS }
    }
}

/// One archive entry paired with the file it will be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTask {
    /// Position of the entry in the archive directory.
    pub index: usize,
    /// Entry name as stored in the archive.
    pub entry: String,
    /// Absolute destination path.
    pub destination: PathBuf,
    /// Uncompressed size in bytes.
    pub size: u64,
}

/// Result of the classification phase.
#[derive(Debug, Clone, Default)]
pub struct ExtractionPlan {
    /// File entries to write.
    pub files: Vec<ExtractionTask>,
    /// Directories to create: selected directory entries and the parents of
    /// every file task. Deduplicated, in first-seen order.
    pub directories: Vec<PathBuf>,
    /// Sum of `size` over `files`.
    pub total_bytes: u64,
    /// Entries that were not selected or resolved to nothing.
    pub skipped: usize,
}

/// Summary of a successful [`extract`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub files_written: usize,
    pub bytes_written: u64,
    pub directories_created: usize,
    pub entries_skipped: usize,
}

/// Extracts the mandatory region plus every selected optional group of the
/// archive at `archive_path` into `destination`.
///
/// Existing files are truncated and rewritten. On a per-file failure the
/// remaining files are still written and the first error is returned.
pub fn extract(
    archive_path: &Path,
    destination: &Path,
    selection: &Selection,
    options: &ExtractOptions,
    progress: &dyn ProgressSink,
) -> Result<ExtractionReport> {
    let mut archive = open_archive(archive_path)?;
    let plan = plan_extraction(&mut archive, destination, selection)?;
    drop(archive);

    info!(
        files = plan.files.len(),
        bytes = plan.total_bytes,
        skipped = plan.skipped,
        groups = %selection,
        "classified archive entries"
    );

    create_directories(&plan.directories)?;

    progress.start(Some(plan.total_bytes));
    let outcome = pool::run(archive_path, plan.files, options.workers.max(1), progress);
    progress.finish();

    if let Some(first) = outcome.errors.into_iter().next() {
        return Err(first);
    }

    Ok(ExtractionReport {
        files_written: outcome.files_written,
        bytes_written: outcome.bytes_written,
        directories_created: plan.directories.len(),
        entries_skipped: plan.skipped,
    })
}

/// Opens `archive_path` as a zip archive, mapping every failure to
/// [`InstallError::ArchiveOpen`].
pub fn open_archive(archive_path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let open_err = |source| InstallError::ArchiveOpen { path: archive_path.to_path_buf(), source };
    let file = File::open(archive_path).map_err(|e| open_err(e.into()))?;
    ZipArchive::new(BufReader::new(file)).map_err(open_err)
}

/// Classification phase. Walks every entry once and decides where, if
/// anywhere, it goes. Touches nothing on disk.
///
/// Only raw entry metadata is read here; entry streams are opened by the
/// workers, so an encrypted or undecodable entry fails its own task and
/// nothing else.
pub fn plan_extraction<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    destination: &Path,
    selection: &Selection,
) -> Result<ExtractionPlan> {
    let mut plan = ExtractionPlan::default();
    let mut seen_dirs = HashSet::new();
    let mut push_dir = |plan: &mut ExtractionPlan, dir: PathBuf| {
        if seen_dirs.insert(dir.clone()) {
            plan.directories.push(dir);
        }
    };

    for index in 0..archive.len() {
        let entry = archive
            .by_index_raw(index)
            .map_err(|e| InstallError::read(format!("#{index}"), e.into()))?;
        let raw_name = entry.name().to_string();
        let is_dir = entry.is_dir();
        let size = entry.size();
        drop(entry);

        let name = normalize_entry_name(&raw_name);
        let relative = match region_of(&name) {
            Region::Mandatory { relative } => relative,
            Region::Optional { group, relative } if selection.contains(group) => relative,
            _ => {
                plan.skipped += 1;
                continue;
            }
        };

        let Some(relative_path) = safe_relative_path(relative) else {
            return Err(InstallError::UnsafePath { entry: raw_name });
        };
        if relative_path.as_os_str().is_empty() {
            plan.skipped += 1;
            continue;
        }

        let target = destination.join(relative_path);
        if is_dir {
            debug!(entry = %raw_name, target = %target.display(), "directory");
            push_dir(&mut plan, target);
            continue;
        }

        if let Some(parent) = target.parent() {
            push_dir(&mut plan, parent.to_path_buf());
        }
        debug!(entry = %raw_name, target = %target.display(), size, "file");
        plan.total_bytes += size;
        plan.files.push(ExtractionTask { index, entry: raw_name, destination: target, size });
    }

    Ok(plan)
}

fn create_directories(directories: &[PathBuf]) -> Result<()> {
    for dir in directories {
        fs::create_dir_all(dir).map_err(|e| InstallError::write(dir, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn archive(entries: &[(&str, &[u8])]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        ZipArchive::new(writer.finish().unwrap()).unwrap()
    }

    fn destinations(plan: &ExtractionPlan) -> Vec<PathBuf> {
        plan.files.iter().map(|t| t.destination.clone()).collect()
    }

    #[test]
    fn optional_entry_is_remapped_below_destination() {
        let mut zip = archive(&[("modpack/optional/alpha/config/settings.json", b"{}")]);
        let selection: Selection = ["alpha".to_string()].into_iter().collect();
        let plan = plan_extraction(&mut zip, Path::new("/out"), &selection).unwrap();
        assert_eq!(destinations(&plan), vec![PathBuf::from("/out/config/settings.json")]);
        assert_eq!(plan.directories, vec![PathBuf::from("/out/config")]);
    }

    #[test]
    fn mandatory_entry_ignores_selection() {
        let mut zip = archive(&[("modpack/mods/foo.jar", b"jar")]);
        for selection in [Selection::none(), ["zzz".to_string()].into_iter().collect()] {
            let plan = plan_extraction(&mut zip, Path::new("/out"), &selection).unwrap();
            assert_eq!(destinations(&plan), vec![PathBuf::from("/out/mods/foo.jar")]);
            assert_eq!(plan.total_bytes, 3);
        }
    }

    #[test]
    fn unselected_and_foreign_entries_are_skipped() {
        let mut zip = archive(&[
            ("modpack/optional/alpha/", b""),
            ("modpack/optional/alpha/a.txt", b"a"),
            ("modpack/optional/beta/b.txt", b"bb"),
            ("modpack/readme.md", b"readme"),
            ("elsewhere/mods/x.jar", b"x"),
            ("modpack/mods/m.jar", b"mmm"),
        ]);
        let selection: Selection = ["alpha".to_string()].into_iter().collect();
        let plan = plan_extraction(&mut zip, Path::new("/out"), &selection).unwrap();
        assert_eq!(
            destinations(&plan),
            vec![PathBuf::from("/out/a.txt"), PathBuf::from("/out/mods/m.jar")]
        );
        assert_eq!(plan.total_bytes, 4);
        // group directory itself + beta + readme + foreign
        assert_eq!(plan.skipped, 4);
    }

    #[test]
    fn directory_entries_only_create_directories() {
        let mut zip = archive(&[("modpack/mods/", b""), ("modpack/mods/sub/", b"")]);
        let plan = plan_extraction(&mut zip, Path::new("/out"), &Selection::none()).unwrap();
        assert!(plan.files.is_empty());
        assert_eq!(
            plan.directories,
            vec![PathBuf::from("/out/mods"), PathBuf::from("/out/mods/sub")]
        );
    }

    #[test]
    fn escaping_entry_is_rejected() {
        let mut zip = archive(&[("modpack/optional/alpha/../../evil.sh", b"#!")]);
        let selection: Selection = ["alpha".to_string()].into_iter().collect();
        let err = plan_extraction(&mut zip, Path::new("/out"), &selection).unwrap_err();
        assert!(matches!(err, InstallError::UnsafePath { .. }));
    }

    #[test]
    fn prefixed_names_classify_like_normalized_ones() {
        let mut zip = archive(&[("./modpack/mods/a.jar", b"a"), ("/modpack/mods/b.jar", b"b")]);
        let plan = plan_extraction(&mut zip, Path::new("/out"), &Selection::none()).unwrap();
        assert_eq!(
            destinations(&plan),
            vec![PathBuf::from("/out/mods/a.jar"), PathBuf::from("/out/mods/b.jar")]
        );
    }
}
