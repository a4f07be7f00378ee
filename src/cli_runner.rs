//! Command dispatch shared by the binary and the integration tests.

use std::error::Error;
use std::io::{self, Write};

use tracing::warn;

use crate::cli::{Args, Commands, GroupArgs, WorkerMode};
use crate::config::{self, InstallConfig};
use crate::discover::discover_groups;
use crate::extract::{self, ExtractOptions};
use crate::install::{Installer, PackSource};
use crate::menu;
use crate::selection::Selection;
use crate::term;

/// Runs the command selected by `args`.
pub fn run_cli_app(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command.clone().unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let config = resolve_config(&args, WorkerMode::W4)?;
            run_menu(&config)?;
        }
        Commands::Install { source, groups, workers, quiet } => {
            let config = resolve_config(&args, workers)?;
            let source = PackSource::from_arg(&source);
            let installer = Installer::new(&config).with_progress(!quiet);
            installer.run(&source, |available| preset_selection(&groups, available))?;
        }
        Commands::Groups { archive } => {
            let groups = discover_groups(&archive)?;
            let mut stdout = io::stdout().lock();
            for group in groups {
                writeln!(stdout, "{group}")?;
            }
        }
        Commands::Plan { archive, groups } => {
            let destination = config::resolve_destination(args.dest.clone(), args.dest_policy)?;
            let available = discover_groups(&archive)?;
            let selection = preset_selection(&groups, &available);
            let mut zip = extract::open_archive(&archive)?;
            let plan = extract::plan_extraction(&mut zip, &destination, &selection)?;

            let mut stdout = io::stdout().lock();
            for task in &plan.files {
                writeln!(stdout, "{} -> {}", task.entry, task.destination.display())?;
            }
            writeln!(
                stdout,
                "{} files, {} bytes, {} entries skipped (groups: {})",
                plan.files.len(),
                plan.total_bytes,
                plan.skipped,
                selection
            )?;
        }
    }
    Ok(())
}

fn resolve_config(args: &Args, workers: WorkerMode) -> Result<InstallConfig, Box<dyn Error>> {
    let destination = config::resolve_destination(args.dest.clone(), args.dest_policy)?;
    let catalog_path = config::catalog_path_from_opt_or_env(args.catalog.clone());
    let catalog = config::load_catalog(catalog_path.as_deref())?;
    let extract = ExtractOptions { workers: workers.worker_count() };
    Ok(InstallConfig::new(destination, catalog, extract))
}

fn preset_selection(groups: &GroupArgs, available: &[String]) -> Selection {
    if groups.all {
        Selection::all(available)
    } else {
        Selection::from_names(&groups.groups, available)
    }
}

/// The interactive installer: pick a pack, pick groups, install, then wait for
/// Enter so a console window opened by double-click stays readable.
fn run_menu(config: &InstallConfig) -> Result<(), Box<dyn Error>> {
    let installer = Installer::new(config).with_progress(true);
    let sources = installer.menu_sources();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    let source = loop {
        term::clear_screen();
        term::print_banner(&mut stdout)?;
        match menu::choose_pack(&sources, &mut input, &mut stdout)? {
            Some(source) => break source,
            None => {
                writeln!(stdout, "Invalid input.")?;
                writeln!(stdout, "\nPress Enter to continue...")?;
                if !menu::wait_for_enter(&mut input)? {
                    return Ok(());
                }
            }
        }
    };

    term::clear_screen();
    let result = installer.run(&source, |groups| {
        let mut out = io::stdout();
        menu::prompt_groups(groups, &mut input, &mut out).unwrap_or_else(|e| {
            warn!(error = %e, "could not read group selection, installing mandatory content only");
            Selection::none()
        })
    });

    if let Err(e) = result {
        writeln!(stdout, "Install failed: {e}")?;
        writeln!(
            stdout,
            "Try downloading the pack yourself and placing it in the loader's folder, then run the loader again."
        )?;
        if let PackSource::Remote { url, .. } = &source {
            writeln!(stdout, "Download link: {url}")?;
        }
    }

    writeln!(stdout, "\nPress Enter to exit...")?;
    stdout.flush()?;
    menu::wait_for_enter(&mut input)?;
    Ok(())
}
