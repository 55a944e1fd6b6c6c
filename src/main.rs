//! # Recorder Impact - Main Entry Point
//!
//! Loads the JSON produced by the benchmark harness and its log parser,
//! runs the requested analysis and writes a structured JSON report for an
//! external renderer.
//!
//! ## Subcommands
//!
//! - `compare`: one baseline run against one recorder-enabled run
//! - `workloads`: repeated runs per workload with confidence intervals
//! - `ddl`: DDL blocking rate, risk tier and collision projection
//!
//! ## Error Handling
//!
//! Unreadable input files and invalid parameters abort with an `anyhow`
//! error. Malformed records and workloads with too little data are skipped
//! with a warning and the rest of the analysis continues.

use anyhow::{Context, Result};
use clap::Parser;
use recorder_impact::{
    cli::{Args, Command},
    comparison::{self, BenchmarkRun, RunComparison},
    config::AnalysisConfig,
    ddl::{self, DdlReport},
    logging,
    report::{AnalysisReport, ReportBuilder, ReportWriter},
    utils::{self, colorize_severity, colorize_verdict, format_delta_ms, format_impact, format_ms},
    workload::{self, WorkloadInput, WorkloadOutcome},
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Top-level layout of a workloads input file
#[derive(Debug, Deserialize)]
struct WorkloadsFile {
    workloads: BTreeMap<String, WorkloadInput>,
}

/// Top-level layout of a DDL timings file
#[derive(Debug, Deserialize)]
struct DdlTimingsFile {
    #[serde(default)]
    ddl_operations: Vec<Value>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    info!("Starting recorder impact analysis");

    let config = AnalysisConfig::from(&args);
    config.validate()?;

    let builder = ReportBuilder::new();
    let report = match &args.command {
        Command::Compare { baseline, test } => {
            let baseline: BenchmarkRun = load_json(baseline)?;
            let test: BenchmarkRun = load_json(test)?;
            let comparison = comparison::compare_runs(&baseline, &test)
                .context("Failed to compare benchmark runs")?;
            builder.comparison(comparison).build()
        }
        Command::Workloads { input } => {
            let file: WorkloadsFile = load_json(input)?;
            info!("Analyzing {} workloads", file.workloads.len());
            let outcomes = workload::analyze_workloads(&file.workloads, config.confidence_level)?;
            builder.workloads(outcomes).build()
        }
        Command::Ddl { input } => {
            let file: DdlTimingsFile = load_json(input)?;
            if file.ddl_operations.is_empty() {
                anyhow::bail!("No DDL operations found in {}", input.display());
            }
            let report = ddl::analyze_records(&file.ddl_operations, &config)?;
            builder.ddl(report).build()
        }
    };

    let writer = ReportWriter::new(&args.output_file);
    writer.write(&report)?;

    if !args.quiet {
        print_summary(&report);
    }

    info!("Analysis completed successfully");
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

fn print_summary(report: &AnalysisReport) {
    println!();
    utils::print_separator(60);
    println!("Recorder Impact Results");
    utils::print_separator(60);

    if let Some(comparison) = &report.comparison {
        print_comparison(comparison);
    }
    for (name, outcome) in &report.workloads {
        print_workload(name, outcome);
    }
    if let Some(ddl) = &report.ddl {
        print_ddl(ddl);
    }

    println!();
    utils::print_separator(60);
}

fn print_comparison(comparison: &RunComparison) {
    println!("\n{}:", comparison.scenario);
    println!("  Throughput impact: {}", format_impact(comparison.throughput.percent_delta));
    if let Some(p95) = comparison.latency.get("p95") {
        println!("  Latency (p95) impact: {}", format_impact(p95.percent_delta));
    }
    println!("  Assessment: {}", colorize_severity(comparison.severity));
    for warning in &comparison.warnings {
        println!("  Warning: {}", warning);
    }
}

fn print_workload(name: &str, outcome: &WorkloadOutcome) {
    let analysis = match outcome {
        WorkloadOutcome::Analyzed(analysis) => analysis,
        WorkloadOutcome::InsufficientData { reason } => {
            println!("\n{}: Insufficient data ({})", name, reason);
            return;
        }
    };

    println!("\n{}:", name);
    println!("{}", "-".repeat(40));
    println!(
        "  TPS: {:.1} -> {:.1} ({})",
        analysis.tps.baseline.mean,
        analysis.tps.test.mean,
        format_impact(analysis.tps.impact.percent_delta)
    );
    for metric in ["p50", "p95", "p99"] {
        if let Some(impact) = analysis.latency.get(metric) {
            println!(
                "  {}: {} -> {} ({}, {})",
                metric,
                format_ms(impact.baseline_value),
                format_ms(impact.test_value),
                format_impact(impact.percent_delta),
                format_delta_ms(impact.absolute_delta)
            );
        }
    }
    println!("  Assessment: {}", colorize_verdict(analysis.assessment.overall));
}

fn print_ddl(ddl: &DdlReport) {
    println!(
        "\nDDL operations: {} ({} rejected)",
        utils::format_count(ddl.total_operations as i64),
        ddl.rejected_records
    );
    println!(
        "  Blocked by recorder: {} ({:.2}%)",
        ddl.blocking.recorder_blocked, ddl.blocking.recorder_blocked_pct
    );
    println!(
        "  Expected collisions/day at {} DDL ops/hour: ~{:.1}",
        ddl.collision.operations_per_hour, ddl.estimated_collisions_per_day
    );
    for estimate in &ddl.mode_estimates {
        println!(
            "    {} ({}s, {} collections/day): ~{:.1}/day",
            estimate.mode,
            estimate.interval_seconds,
            estimate.collections_per_day,
            estimate.collisions_per_day
        );
    }
    println!(
        "  Per-collection upper bound at {}s: {:.1}/day",
        ddl.collision.interval_seconds, ddl.collision.expected_collisions_per_day
    );
    println!("  Risk level: {}", ddl.risk.label());
    println!("  Recommendation: {}", ddl.risk.recommendation_text());
}
