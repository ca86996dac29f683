use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use iscdhcp::config_file::load_config;
use iscdhcp::decode::{DecodeWarning, Decoded};
use iscdhcp::report::{render_summary, render_warnings};
use iscdhcp::root::ConfigRoot;
use isc_cfg_core::{format_json, format_tree, parse_file};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod cli;
mod daemon_cmd;
mod path_guard;

use cli::{CheckArgs, Cli, Command, InspectArgs, OutputFormat, RegenArgs, ShowArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Show(args) => run_show(args),
        Command::Regen(args) => run_regen(args),
        Command::Check(args) => run_check(args),
        Command::Inspect(args) => run_inspect(args),
        Command::Status(args) => daemon_cmd::run_status(args),
        Command::Start(args) => daemon_cmd::run_start(args),
        Command::Stop(args) => daemon_cmd::run_stop(args),
        Command::Restart(args) => daemon_cmd::run_restart(args),
    }
}

#[derive(Serialize)]
struct ShowReport<'a> {
    config: &'a ConfigRoot,
    warnings: &'a [DecodeWarning],
}

fn load(path: &Path) -> Result<Decoded> {
    load_config(path).with_context(|| format!("failed to load {}", path.display()))
}

fn run_show(args: ShowArgs) -> Result<()> {
    let decoded = load(&args.file)?;

    match args.format {
        OutputFormat::Json => {
            let report = ShowReport {
                config: &decoded.root,
                warnings: &decoded.warnings,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("{}", render_summary(&decoded.root, &decoded.warnings));
            println!();
            print!("{}", decoded.root);
        }
    }
    Ok(())
}

fn run_regen(args: RegenArgs) -> Result<()> {
    let decoded = load(&args.file)?;
    if !decoded.warnings.is_empty() {
        eprintln!("{}", render_warnings(&decoded.warnings));
    }

    match &args.output {
        Some(output) => {
            path_guard::ensure_distinct_output(output, &args.file)?;
            fs::write(output, decoded.root.to_config_string())
                .with_context(|| format!("failed to write {}", output.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            decoded.root.write_to(&mut stdout)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let decoded = load(&args.file)?;

    if !decoded.warnings.is_empty() {
        println!("{}", render_warnings(&decoded.warnings));
    }
    println!(
        "subnets={} custom_options={} warnings={}",
        decoded.root.subnets.len(),
        decoded.root.registry.len(),
        decoded.warnings.len()
    );

    if args.strict && !decoded.warnings.is_empty() {
        bail!(
            "strict mode failed: {} warning(s) in {}",
            decoded.warnings.len(),
            args.file.display()
        );
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let tree = parse_file(&args.file)
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    match args.format {
        OutputFormat::Json => println!("{}", format_json(&tree)),
        OutputFormat::Text => print!("{}", format_tree(&tree, args.depth)),
    }
    Ok(())
}
