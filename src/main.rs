use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};

use mdbench::errors::MdbenchError;
use mdbench::types::{AvailabilityCheck, BenchmarkRun, ProjectPaths, ToolDescriptor};
use mdbench::{acquire, chart, engine, probe, results, sync, template};

#[derive(Parser)]
#[command(
    name = "mdbench",
    version,
    about = "Cold start benchmarks for markdown linters and formatters"
)]
struct Cli {
    /// Project root that anchors the benchmark/, assets/ and docs/ paths
    #[arg(long, global = true, default_value = ".")]
    project_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover tools and run the cold start benchmark
    Run {
        /// Target repository to benchmark
        #[arg(long, default_value = "../rust-book")]
        target: PathBuf,

        /// Number of warmup runs
        #[arg(long, default_value_t = 2)]
        warmup: u32,

        /// Minimum number of benchmark runs
        #[arg(long, default_value_t = 3)]
        min_runs: u32,

        /// Select specific tools to benchmark (default: all available)
        #[arg(long, num_args = 1..)]
        tools: Option<Vec<String>>,
    },
    /// Render the chart and update the comparison doc from saved results
    Report,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = ProjectPaths::new(&cli.project_root);

    match cli.command {
        Commands::Run {
            target,
            warmup,
            min_runs,
            tools,
        } => run_benchmark(&paths, &target, warmup, min_runs, tools.as_deref()),
        Commands::Report => run_report(&paths),
    }
}

fn run_benchmark(
    paths: &ProjectPaths,
    target: &Path,
    warmup: u32,
    min_runs: u32,
    tools: Option<&[String]>,
) -> Result<()> {
    println!("🚀 Markdown Linter Cold Start Benchmark");
    println!("{}", "=".repeat(50));

    if !probe::engine_available() {
        return Err(MdbenchError::HyperfineNotFound.into());
    }

    let available = probe::discover(tools, paths);
    if available.is_empty() {
        return Err(MdbenchError::NoToolsAvailable.into());
    }

    // Canonicalized once, before templating, so every tool receives the same
    // absolute target regardless of the invoking shell's working directory.
    let target_abs = target.canonicalize().map_err(|_| MdbenchError::TargetNotFound {
        path: target.to_path_buf(),
    })?;

    let md_count = count_markdown_files(&target_abs);
    println!("\n📁 Target: {} ({md_count} markdown files)", target_abs.display());

    fs::create_dir_all(paths.results_dir())?;

    let names: Vec<&str> = available.iter().map(|tool| tool.name).collect();
    println!("\n🔥 Running cold start benchmarks on {}...", target_abs.display());
    println!("   Tools: {}", names.join(", "));
    println!("   Warmup: {warmup}, Min runs: {min_runs}\n");

    let commands = available
        .iter()
        .map(|tool| {
            let binary = resolve_binary(tool, paths);
            (tool.name.to_string(), template::render(tool, &target_abs, &binary))
        })
        .collect();

    let bench = BenchmarkRun {
        commands,
        warmup,
        min_runs,
        results_path: paths.results_file(),
        ignore_failure: true,
    };
    engine::run(&bench)?;

    println!("\n✅ Benchmark complete!");
    println!("   Results saved to: {}", paths.results_file().display());
    println!("\nNext step: run `mdbench report` to render the chart and update the docs");
    Ok(())
}

/// Resolve the `{binary}` placeholder value for one tool. Launcher tools
/// have no binary of their own; their templates simply ignore it.
fn resolve_binary(tool: &ToolDescriptor, paths: &ProjectPaths) -> PathBuf {
    let binary = match tool.check {
        AvailabilityCheck::LocalBinary { path } => paths.local_binary(path),
        AvailabilityCheck::ReleaseDownload => acquire::cache_path(&paths.tools_dir()),
        AvailabilityCheck::Launcher { .. } => return PathBuf::new(),
    };
    binary.canonicalize().unwrap_or(binary)
}

fn count_markdown_files(dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let mut count = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            count += count_markdown_files(&path);
        } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
            count += 1;
        }
    }
    count
}

fn run_report(paths: &ProjectPaths) -> Result<()> {
    println!("📊 Generating benchmark comparison chart");
    println!("{}", "=".repeat(50));

    let records = results::load(&paths.results_file())?;
    chart::write_chart(paths, &records)?;
    sync::sync_comparison_doc(&paths.comparison_doc(), &records, Local::now())?;

    println!("\n{}", "=".repeat(50));
    println!("✅ Chart generation complete!");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("❌ {}", err);
        process::exit(1);
    }
}
