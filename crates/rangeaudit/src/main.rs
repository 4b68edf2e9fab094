mod cli;
mod pyproject;
mod text_format;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, OutputFormat};
use rangeaudit_advisories::OsvAdvisoryService;
use rangeaudit_core::{assemble_report, OutputOptions, RangeAuditor};
use rangeaudit_metadata::PyPiMetadataProvider;
use std::time::Duration;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    std::process::exit(run(args)?);
}

fn run(args: Cli) -> Result<i32> {
    let pyproject_path = args.project_path.join("pyproject.toml");
    if !pyproject_path.exists() {
        eprintln!("Error: pyproject.toml not found at {}", pyproject_path.display());
        return Ok(1);
    }

    let direct_deps = match pyproject::parse_direct_dependencies(&pyproject_path) {
        Ok(deps) => deps,
        Err(e) => {
            eprintln!("Error: failed to parse pyproject.toml: {e}");
            return Ok(1);
        }
    };

    if direct_deps.is_empty() {
        eprintln!("No dependencies found in pyproject.toml");
        return Ok(0);
    }

    let timeout = Duration::from_secs(args.timeout_secs);
    let metadata_provider = PyPiMetadataProvider::new(timeout, args.cache_dir.clone());
    let advisory_service = OsvAdvisoryService::new(args.ecosystem.clone(), timeout, args.cache_dir.clone());

    eprintln!("Analyzing constraints for {} direct dependencies...", direct_deps.len());
    let auditor = RangeAuditor::new(&metadata_provider, &advisory_service)
        .with_max_depth(args.max_depth)
        .with_prereleases(args.include_prereleases);
    let report = auditor.audit(direct_deps);
    eprintln!(
        "Built constraint graph with {} packages",
        report.metadata_coverage.packages_total
    );

    let options = OutputOptions {
        include_description: args.desc,
        include_aliases: args.aliases,
    };
    let output = assemble_report(&report.findings, &report.unsatisfiable, &report.metadata_coverage, options);

    match args.format {
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&output)?;
            println!("{rendered}");
        }
        OutputFormat::Plain => {
            println!("{}", text_format::format_report(&output));
        }
    }

    if args.range_strict && (!report.findings.is_empty() || !report.unsatisfiable.is_empty()) {
        return Ok(1);
    }

    Ok(0)
}
