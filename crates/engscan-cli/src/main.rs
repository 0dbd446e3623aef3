use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use engscan_core::inspect;
use engscan_core::profiles::ProfileRegistry;
use engscan_core::report::{model::ToolInfo, render};

mod args;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = args::Args::parse();

    if args.list_profiles {
        let output = list_profiles()?;
        emit(args.out.as_deref(), &output)?;
        return Ok(());
    }

    let snapshot_path = args
        .snapshot_path
        .as_deref()
        .context("a snapshot path is required")?;

    let tool = ToolInfo {
        name: engscan_core::TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: args.commit.clone(),
    };

    let report = inspect(snapshot_path, tool)?;
    tracing::debug!(exit_code = report.exit_code, "inspection finished");

    let output = match args.format {
        args::OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        args::OutputFormat::Text => render::render_text(&report),
    };

    emit(args.out.as_deref(), &output)?;

    std::process::exit(report.exit_code);
}

fn list_profiles() -> Result<String> {
    let registry = ProfileRegistry::builtin()?;

    let mut out = String::new();
    for profile in registry.iter() {
        writeln!(out, "{}\t{}", profile.name, profile.label)?;
    }
    Ok(out)
}

fn emit(out: Option<&std::path::Path>, output: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{output}"),
    }
    Ok(())
}
