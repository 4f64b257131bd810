use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum MdbenchError {
    #[error("hyperfine not found. Install it with: brew install hyperfine")]
    HyperfineNotFound,

    #[error("No tools found to benchmark")]
    NoToolsAvailable,

    #[error("Target repository not found: {path}")]
    TargetNotFound { path: PathBuf },

    #[error("Benchmark failed: hyperfine exited with {status}")]
    EngineFailure { status: std::process::ExitStatus },

    #[error("Benchmark results not found: {path}. Run `mdbench run` first")]
    ResultsNotFound { path: PathBuf },
}
