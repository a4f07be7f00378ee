//! The install routine: obtain the archive, pick groups, replace the mandatory
//! content and extract.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use scopeguard::defer;
use tracing::{info, warn};

use crate::config::{CatalogPack, InstallConfig};
use crate::discover::discover_groups;
use crate::error::{InstallError, Result};
use crate::extract::{extract, ExtractionReport};
use crate::fetch::download_file;
use crate::layout::MANDATORY_DIR;
use crate::progress::{BarProgress, NoProgress, ProgressSink};
use crate::selection::Selection;

/// Name of the temporary download inside the destination root.
pub const DOWNLOAD_FILE_NAME: &str = "pack.zip";

/// Where the archive of an install run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackSource {
    /// Downloaded for this run and deleted afterwards.
    Remote { name: String, url: String },
    /// An archive already on disk, used in place.
    Local { path: PathBuf },
}

impl PackSource {
    /// Interprets a command-line value: anything starting with `http` is a URL,
    /// everything else a local path.
    pub fn from_arg(value: &str) -> Self {
        if value.starts_with("http") {
            PackSource::Remote { name: value.to_string(), url: value.to_string() }
        } else {
            PackSource::Local { path: PathBuf::from(value) }
        }
    }

    /// Menu label.
    pub fn label(&self) -> String {
        match self {
            PackSource::Remote { name, .. } => name.clone(),
            PackSource::Local { path } => format!("{} (local)", path.display()),
        }
    }
}

impl From<&CatalogPack> for PackSource {
    fn from(pack: &CatalogPack) -> Self {
        PackSource::Remote { name: pack.name.clone(), url: pack.url.clone() }
    }
}

impl fmt::Display for PackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackSource::Remote { url, .. } => f.write_str(url),
            PackSource::Local { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Runs installs against one resolved [`InstallConfig`].
pub struct Installer<'a> {
    config: &'a InstallConfig,
    show_progress: bool,
}

impl<'a> Installer<'a> {
    pub fn new(config: &'a InstallConfig) -> Self {
        Self { config, show_progress: false }
    }

    /// Draw progress bars for the download and the extraction.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Every source the menu offers: the catalog packs, then the catalog
    /// archives already present in the destination root.
    pub fn menu_sources(&self) -> Vec<PackSource> {
        let remote = self.config.catalog.iter().map(PackSource::from);
        let local = self
            .config
            .local_archives()
            .into_iter()
            .map(|path| PackSource::Local { path });
        remote.chain(local).collect()
    }

    /// Installs `source`. `choose` receives the discovered groups (sorted) and
    /// returns the selection; it is not called when the archive has no groups.
    pub fn run<F>(&self, source: &PackSource, choose: F) -> Result<ExtractionReport>
    where
        F: FnOnce(&[String]) -> Selection,
    {
        let destination = &self.config.destination;
        fs::create_dir_all(destination).map_err(|e| InstallError::write(destination, e))?;

        match source {
            PackSource::Remote { url, .. } => {
                let archive = destination.join(DOWNLOAD_FILE_NAME);
                println!("Downloading {DOWNLOAD_FILE_NAME}...");
                let progress = self.sink("Downloading");
                download_file(url, &archive, progress.as_ref())?;
                defer! {
                    if let Err(e) = fs::remove_file(&archive) {
                        warn!(path = %archive.display(), error = %e, "could not remove downloaded archive");
                    }
                }
                self.install_from(&archive, choose)
            }
            PackSource::Local { path } => {
                println!("Using local file: {}", path.display());
                self.install_from(path, choose)
            }
        }
    }

    fn install_from<F>(&self, archive: &Path, choose: F) -> Result<ExtractionReport>
    where
        F: FnOnce(&[String]) -> Selection,
    {
        let groups = discover_groups(archive)?;
        let selection = if groups.is_empty() {
            println!("No optional groups found in the archive.");
            Selection::none()
        } else {
            choose(&groups)
        };
        info!(groups = %selection, "selection");

        self.remove_mandatory_content()?;

        println!("Extracting selected files...");
        let progress = self.sink("Extracting");
        let report = extract(archive, &self.config.destination, &selection, &self.config.extract, progress.as_ref())?;
        println!(
            "Done! Pack installed: {} files, {} bytes.",
            report.files_written, report.bytes_written
        );
        Ok(report)
    }

    /// Deletes `<destination>/mods` so mods dropped from the pack do not
    /// linger. A missing directory is not an error.
    pub fn remove_mandatory_content(&self) -> Result<()> {
        let mods = self.config.destination.join(MANDATORY_DIR.trim_end_matches('/'));
        match fs::remove_dir_all(&mods) {
            Ok(()) => {
                info!(path = %mods.display(), "removed previous mandatory content");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(InstallError::write(mods, e)),
        }
    }

    fn sink(&self, label: &str) -> Box<dyn ProgressSink> {
        if self.show_progress {
            Box::new(BarProgress::new(label))
        } else {
            Box::new(NoProgress)
        }
    }
}
