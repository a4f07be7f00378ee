//! # modpack-loader core library
//!
//! This crate provides the core functionality for the `modpack-loader` installer.
//!
//! A pack is a zip archive laid out as `modpack/mods/...` (always installed) and
//! `modpack/optional/<group>/...` (installed when `<group>` is selected). The
//! library discovers the optional groups, classifies and remaps every entry, and
//! writes the selected ones with a small pool of worker threads.
//!
//! ## Key Modules
//!
//! - [`discover`]: lists the optional groups of an archive.
//! - [`extract`]: selective, parallel extraction.
//! - [`layout`]: the archive naming convention and path remapping.
//! - [`selection`]: the chosen group set and the menu answer parser.
//! - [`install`]: the full install routine (download, select, replace, extract).
//!
//! ## Examples
//!
//! ```no_run
//! use std::path::Path;
//! use modpack_loader::{discover_groups, extract, ExtractOptions, NoProgress, Selection};
//!
//! let archive = Path::new("pack.zip");
//! let groups = discover_groups(archive)?;
//! let selection = Selection::all(&groups);
//! extract(archive, Path::new("game"), &selection, &ExtractOptions::default(), &NoProgress)?;
//! # Ok::<(), modpack_loader::InstallError>(())
//! ```

pub mod cli;
pub mod cli_runner;
pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod install;
pub mod layout;
pub mod menu;
pub mod progress;
pub mod selection;
pub mod term;

pub use discover::discover_groups;
pub use error::{InstallError, Result};
pub use extract::{extract, ExtractOptions, ExtractionReport};
pub use progress::{ByteCounter, NoProgress, ProgressSink};
pub use selection::Selection;
