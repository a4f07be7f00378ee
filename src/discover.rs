//! Optional group discovery.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::{InstallError, Result};
use crate::layout::{normalize_entry_name, optional_group};

/// Lists the optional groups of the archive at `archive_path`, sorted and
/// without duplicates. Reads only the central directory.
pub fn discover_groups(archive_path: &Path) -> Result<Vec<String>> {
    let file = File::open(archive_path).map_err(|e| InstallError::ArchiveOpen {
        path: archive_path.to_path_buf(),
        source: e.into(),
    })?;
    discover_groups_from(BufReader::new(file)).map_err(|e| match e {
        InstallError::ArchiveRead { source } => InstallError::ArchiveOpen {
            path: archive_path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Same as [`discover_groups`] for an already opened reader.
pub fn discover_groups_from<R: Read + Seek>(reader: R) -> Result<Vec<String>> {
    let archive = ZipArchive::new(reader).map_err(|source| InstallError::ArchiveRead { source })?;

    let groups: BTreeSet<String> = archive
        .file_names()
        .filter_map(|raw| optional_group(&normalize_entry_name(raw)).map(str::to_string))
        .collect();

    debug!(count = groups.len(), "discovered optional groups");
    Ok(groups.into_iter().collect())
}
