use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Tool category shown in status lines and the comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Lint,
    Format,
}

impl Category {
    /// Table-cell form ("Lint" / "Format").
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Lint => "Lint",
            Category::Format => "Format",
        }
    }

    /// Status-line form ("lint" / "format").
    pub fn as_lower(self) -> &'static str {
        match self {
            Category::Lint => "lint",
            Category::Format => "format",
        }
    }
}

/// How a tool proves it can run in the current environment.
#[derive(Debug, Clone, Copy)]
pub enum AvailabilityCheck {
    /// A launcher answers `<program> --version` with a zero exit.
    Launcher { program: &'static str },
    /// A pre-built binary exists at this project-relative path.
    LocalBinary { path: &'static str },
    /// The binary is fetched from a release archive on first use.
    ReleaseDownload,
}

/// Static description of one comparable command-line tool.
///
/// The command template may contain `{target}` (absolute benchmark target
/// directory) and `{binary}` (resolved tool binary path) placeholders; both
/// are substituted once per run by `template::render`.
#[derive(Debug)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub category: Category,
    pub template: &'static str,
    pub check: AvailabilityCheck,
    /// Shown to the operator when the availability check fails.
    pub check_msg: &'static str,
}

/// Project-relative path table. Every artifact the harness reads or writes
/// lives under one root so tests can point the whole pipeline at a temp dir.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache directory for downloaded tool binaries.
    pub fn tools_dir(&self) -> PathBuf {
        self.root.join("benchmark").join(".tools")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join("benchmark").join("results")
    }

    /// The fixed results document written by the benchmarking engine.
    pub fn results_file(&self) -> PathBuf {
        self.results_dir().join("cold_start.json")
    }

    /// Public chart asset referenced from the docs.
    pub fn chart_asset(&self) -> PathBuf {
        self.root.join("assets").join("benchmark.svg")
    }

    /// Intermediate copy of the chart kept next to the raw results.
    pub fn chart_intermediate(&self) -> PathBuf {
        self.results_dir().join("cold_start_comparison.svg")
    }

    pub fn comparison_doc(&self) -> PathBuf {
        self.root.join("docs").join("comparison.md")
    }

    /// Resolve a descriptor's project-relative binary path.
    pub fn local_binary(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }
}

/// One full engine invocation: constructed once, consumed once.
#[derive(Debug)]
pub struct BenchmarkRun {
    /// Ordered (tool name, final command string) pairs.
    pub commands: Vec<(String, String)>,
    pub warmup: u32,
    pub min_runs: u32,
    pub results_path: PathBuf,
    /// Keep going past a failing tool command instead of aborting the batch.
    pub ignore_failure: bool,
}

/// The engine's exported results document. Schema is trusted; only the
/// fields the renderer and synchronizer need are modeled.
#[derive(Debug, Deserialize)]
pub struct BenchmarkReport {
    pub results: Vec<ResultRecord>,
}

/// Per-tool timing summary. `command` matches a submitted command label.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultRecord {
    pub command: String,
    /// Mean duration in seconds.
    pub mean: f64,
    #[serde(default)]
    pub stddev: Option<f64>,
    #[serde(default)]
    pub times: Option<Vec<f64>>,
}
