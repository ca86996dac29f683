use anyhow::{Context, Result};
use iscdhcp::daemon::{DaemonStatus, Dhcpd};
use iscdhcp::report::render_warnings;
use iscdhcp::settings::{default_settings, load_settings, DaemonSettings};

use crate::cli::DaemonArgs;

pub fn run_status(args: DaemonArgs) -> Result<()> {
    let daemon = Dhcpd::new(settings(&args)?);
    let status = daemon.status().context("failed to query daemon status")?;
    let label = match status {
        DaemonStatus::Running => "running",
        DaemonStatus::Stopped => "stopped",
    };
    println!("{}: {label}", daemon.settings().process_name);
    Ok(())
}

pub fn run_start(args: DaemonArgs) -> Result<()> {
    load(&args)?.start().context("failed to start daemon")
}

pub fn run_stop(args: DaemonArgs) -> Result<()> {
    Dhcpd::new(settings(&args)?)
        .stop()
        .context("failed to stop daemon")
}

pub fn run_restart(args: DaemonArgs) -> Result<()> {
    load(&args)?.restart().context("failed to restart daemon")
}

fn settings(args: &DaemonArgs) -> Result<DaemonSettings> {
    match &args.settings {
        Some(path) => Ok(load_settings(path)?),
        None => Ok(default_settings()),
    }
}

/// Supervisor preloaded with the configured file.
fn load(args: &DaemonArgs) -> Result<Dhcpd> {
    let daemon = Dhcpd::new(settings(args)?);
    let warnings = daemon.reload_config().with_context(|| {
        format!(
            "failed to load {}",
            daemon.settings().config_path.display()
        )
    })?;
    if !warnings.is_empty() {
        eprintln!("{}", render_warnings(&warnings));
    }
    Ok(daemon)
}
