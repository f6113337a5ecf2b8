mod commands;
pub mod core;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;
use crate::core::config::Settings;
use crate::core::state::AdminState;
use crate::core::workdir::WorkingDirectory;

/// Structured logging to stderr; stdout carries command output only.
/// `RUST_LOG` takes precedence over the debug flag.
pub fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point of the `mcadmin` binary.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    let workdir = WorkingDirectory::resolve(cli.work_dir.as_deref());
    let settings = Settings::read(&workdir.conf_dir());
    init_tracing(cli.debug || settings.as_ref().is_ok_and(|s| s.debug));
    let settings = settings.unwrap_or_else(|e| {
        warn!("Ignoring corrupt settings in {:?}: {}", workdir.conf_dir(), e);
        Settings::default()
    });

    let mut state = match AdminState::new(cli.config(), workdir, settings) {
        Ok(state) => state,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("Working directory: {}", state.workdir.root().display());

    match commands::execute(cli.command, &mut state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            ExitCode::FAILURE
        }
    }
}
