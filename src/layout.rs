//! Naming convention of a pack archive.
//!
//! ```text
//! modpack/                       package root, everything else is ignored
//! modpack/mods/...               mandatory, lands in <dest>/mods/...
//! modpack/optional/<group>/...   optional, lands in <dest>/... when <group> is selected
//! ```
//!
//! The functions here are pure string/path manipulation and are shared by group
//! discovery and the extractor.

use std::path::{Component, Path, PathBuf};

/// Top-level directory that holds all package content.
pub const PACKAGE_ROOT: &str = "modpack/";
/// Mandatory region, relative to [`PACKAGE_ROOT`].
pub const MANDATORY_DIR: &str = "mods/";
/// Optional region, relative to [`PACKAGE_ROOT`].
pub const OPTIONAL_DIR: &str = "optional/";

/// Where an archive entry belongs according to the package layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region<'a> {
    /// Under `<root>/mods/`. Carries the destination-relative path (`mods/...`).
    Mandatory { relative: &'a str },
    /// Under `<root>/optional/<group>/`. `relative` is the remainder after
    /// `<group>/` and is empty for the group directory itself.
    Optional { group: &'a str, relative: &'a str },
    /// Inside the package root but in neither region.
    Unrecognized,
    /// Not under the package root at all.
    Outside,
}

/// Normalizes a raw zip entry name: backslashes become `/`, and any leading
/// `./` or `/` is removed.
pub fn normalize_entry_name(raw: &str) -> String {
    let slashed = raw.replace('\\', "/");
    let mut name = slashed.as_str();
    loop {
        if let Some(rest) = name.strip_prefix("./") {
            name = rest;
        } else if let Some(rest) = name.strip_prefix('/') {
            name = rest;
        } else {
            break;
        }
    }
    name.to_string()
}

/// Classifies an already-normalized entry name.
pub fn region_of(name: &str) -> Region<'_> {
    let Some(in_root) = name.strip_prefix(PACKAGE_ROOT) else {
        return Region::Outside;
    };

    if in_root.starts_with(MANDATORY_DIR) {
        return Region::Mandatory { relative: in_root };
    }

    if let Some(rest) = in_root.strip_prefix(OPTIONAL_DIR) {
        let (group, relative) = rest.split_once('/').unwrap_or((rest, ""));
        if !group.is_empty() {
            return Region::Optional { group, relative };
        }
    }

    Region::Unrecognized
}

/// Returns the optional group named by an entry, if the entry name contains the
/// optional-region marker anywhere. Used by group discovery only; extraction
/// requires the marker at the start of the name (see [`region_of`]).
pub fn optional_group(name: &str) -> Option<&str> {
    let marker = optional_marker();
    let start = name.find(&marker)? + marker.len();
    let rest = &name[start..];
    let group = rest.split('/').next().unwrap_or("");
    (!group.is_empty()).then_some(group)
}

fn optional_marker() -> String {
    format!("{PACKAGE_ROOT}{OPTIONAL_DIR}")
}

/// Turns a destination-relative path into a path that cannot leave the
/// destination root. Returns `None` for `..`, absolute paths and drive prefixes.
/// `.` components and repeated separators are dropped.
pub fn safe_relative_path(relative: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}
