use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "iscdhcp")]
#[command(version, about = "Read, rewrite and supervise ISC DHCP server configuration")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Decode a config file and show the typed model.
    Show(ShowArgs),
    /// Rewrite a config file in canonical form.
    Regen(RegenArgs),
    /// Decode a config file and report warnings.
    Check(CheckArgs),
    /// Show the generic statement tree of a config file.
    Inspect(InspectArgs),
    /// Report whether the daemon is running.
    Status(DaemonArgs),
    /// Load the configured file, write it back and start the daemon.
    Start(DaemonArgs),
    /// Stop the daemon.
    Stop(DaemonArgs),
    /// Stop, then start the daemon.
    Restart(DaemonArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct RegenArgs {
    pub file: PathBuf,
    /// Write to this path instead of stdout. Must differ from the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    pub file: PathBuf,
    /// Fail when any warning is raised.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct DaemonArgs {
    /// Supervisor settings TOML. Built-in defaults apply when omitted.
    #[arg(long)]
    pub settings: Option<PathBuf>,
}
