use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::DestinationPolicy;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Install into this directory. Defaults to MODPACK_LOADER_DEST, then to the loader's own directory.
    #[arg(long, global = true)]
    pub dest: Option<PathBuf>,

    /// How to pick the destination when --dest and MODPACK_LOADER_DEST are both absent.
    #[arg(long, value_enum, default_value_t = DestinationPolicy::ExecutableDir, global = true)]
    pub dest_policy: DestinationPolicy,

    /// JSON pack catalog replacing the built-in pack list. Also read from MODPACK_LOADER_CATALOG.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Interactive installer (the default when no command is given).
    #[command(alias = "m")]
    Menu,

    /// Install a pack without prompting.
    #[command(alias = "i")]
    Install {
        /// Local archive path or http(s) URL of the pack.
        #[arg(required = true)]
        source: String,

        #[command(flatten)]
        groups: GroupArgs,

        /// Number of parallel extraction threads.
        #[arg(long, value_enum, default_value_t = WorkerMode::W4)]
        workers: WorkerMode,

        /// Hide progress bars.
        #[arg(long)]
        quiet: bool,
    },

    /// List the optional groups of an archive.
    #[command(alias = "g")]
    Groups {
        /// The archive to inspect.
        #[arg(required = true)]
        archive: PathBuf,
    },

    /// Show where every selected entry would be written, without writing anything.
    #[command(alias = "p")]
    Plan {
        /// The archive to inspect.
        #[arg(required = true)]
        archive: PathBuf,

        #[command(flatten)]
        groups: GroupArgs,
    },
}

/// Optional group choice for non-interactive commands.
#[derive(ClapArgs, Clone, Debug, Default)]
pub struct GroupArgs {
    /// Comma-separated optional groups to install (e.g. --groups shaders,maps).
    #[arg(long, value_delimiter = ',', conflicts_with = "all")]
    pub groups: Vec<String>,

    /// Install every optional group.
    #[arg(long)]
    pub all: bool,
}

/// Defines the mode for multi-threaded extraction workers.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum WorkerMode {
    /// One worker per CPU core.
    Auto,
    /// Use 2 worker threads.
    W2,
    /// Use 4 worker threads.
    W4,
}

impl WorkerMode {
    pub fn worker_count(self) -> usize {
        match self {
            WorkerMode::Auto => num_cpus::get(),
            WorkerMode::W2 => 2,
            WorkerMode::W4 => 4,
        }
    }
}

/// Parses command-line arguments using `clap`.
///
/// `--help`, `--version` and usage errors are handled by `clap`, which prints
/// and exits the process.
pub fn run() -> Args {
    Args::parse()
}
