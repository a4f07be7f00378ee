//! Install configuration: where packs come from and where they go.
//!
//! Everything here is resolved once by the binary and then passed down as plain
//! values; the extractor never looks at the environment itself.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InstallError, Result};
use crate::extract::ExtractOptions;

/// Environment variable overriding the destination directory.
pub const DEST_ENV: &str = "MODPACK_LOADER_DEST";
/// Environment variable pointing at a JSON pack catalog.
pub const CATALOG_ENV: &str = "MODPACK_LOADER_CATALOG";

/// A downloadable pack offered in the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPack {
    pub name: String,
    pub url: String,
}

impl CatalogPack {
    /// File name the pack is stored under locally: the last segment of its URL.
    pub fn file_name(&self) -> Option<&str> {
        let path = self.url.split(['?', '#']).next().unwrap_or("");
        path.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

/// On-disk catalog format: `{ "packs": [ { "name": ..., "url": ... } ] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackCatalog {
    pub packs: Vec<CatalogPack>,
}

/// Packs offered when no catalog file is configured.
pub fn default_catalog() -> Vec<CatalogPack> {
    vec![
        CatalogPack {
            name: "Main pack".into(),
            url: "https://pub-7ac6523b994b44f9b233ee0cbd3afccc.r2.dev/main.zip".into(),
        },
        CatalogPack {
            name: "War pack".into(),
            url: "https://pub-7ac6523b994b44f9b233ee0cbd3afccc.r2.dev/war.zip".into(),
        },
    ]
}

/// Loads the pack catalog from `path`, or returns [`default_catalog`].
pub fn load_catalog(path: Option<&Path>) -> Result<Vec<CatalogPack>> {
    let Some(path) = path else {
        return Ok(default_catalog());
    };
    let raw = fs::read_to_string(path).map_err(|e| InstallError::io(path, e))?;
    let catalog: PackCatalog = serde_json::from_str(&raw)
        .map_err(|e| InstallError::Config(format!("invalid catalog '{}': {e}", path.display())))?;
    if catalog.packs.is_empty() {
        return Err(InstallError::Config(format!("catalog '{}' lists no packs", path.display())));
    }
    debug!(path = %path.display(), packs = catalog.packs.len(), "loaded pack catalog");
    Ok(catalog.packs)
}

/// Gets the catalog path from the command-line option or the `MODPACK_LOADER_CATALOG`
/// environment variable, in that order.
pub fn catalog_path_from_opt_or_env(opt: Option<PathBuf>) -> Option<PathBuf> {
    opt.or_else(|| std::env::var_os(CATALOG_ENV).map(PathBuf::from))
}

/// Where the install lands when no directory is given explicitly.
#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DestinationPolicy {
    /// Directory of the running executable (drop the loader into the game folder).
    #[default]
    ExecutableDir,
    /// Current working directory.
    CurrentDir,
}

/// Resolves the destination root.
///
/// Priority:
/// 1. `explicit` (the `--dest` option).
/// 2. `MODPACK_LOADER_DEST` environment variable.
/// 3. `policy`.
pub fn resolve_destination(explicit: Option<PathBuf>, policy: DestinationPolicy) -> Result<PathBuf> {
    if let Some(dest) = explicit {
        return Ok(dest);
    }
    if let Some(dest) = std::env::var_os(DEST_ENV) {
        return Ok(PathBuf::from(dest));
    }
    match policy {
        DestinationPolicy::ExecutableDir => {
            let exe = std::env::current_exe().map_err(|e| InstallError::io("<current executable>", e))?;
            exe.parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| InstallError::Config(format!("executable '{}' has no parent directory", exe.display())))
        }
        DestinationPolicy::CurrentDir => std::env::current_dir().map_err(|e| InstallError::io(".", e)),
    }
}

/// Everything an install run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    pub destination: PathBuf,
    pub catalog: Vec<CatalogPack>,
    pub extract: ExtractOptions,
}

impl InstallConfig {
    pub fn new(destination: PathBuf, catalog: Vec<CatalogPack>, extract: ExtractOptions) -> Self {
        Self { destination, catalog, extract }
    }

    /// Catalog packs that were already downloaded into the destination root.
    pub fn local_archives(&self) -> Vec<PathBuf> {
        self.catalog
            .iter()
            .filter_map(CatalogPack::file_name)
            .map(|name| self.destination.join(name))
            .filter(|path| path.is_file())
            .collect()
    }
}
