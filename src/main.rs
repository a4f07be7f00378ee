//! Main entry point for the modpack-loader CLI app

use modpack_loader::{cli, cli_runner};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> std::process::ExitCode {
    let args = cli::run();
    init_tracing(args.verbose);

    if let Err(e) = cli_runner::run_cli_app(args) {
        eprintln!("Error: {}", e);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "modpack_loader=warn",
        1 => "modpack_loader=info",
        _ => "modpack_loader=debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
