use std::ffi::OsString;
use std::process::Command;

use anyhow::Result;

use crate::errors::MdbenchError;
use crate::types::BenchmarkRun;

const ENGINE: &str = "hyperfine";

/// Build the full engine argument vector for one batch invocation.
///
/// `--prepare sync` flushes filesystem buffers between measured runs; the OS
/// disk cache stays warm after the warmup runs, which is the cold-start
/// definition being measured (no app cache, warm OS cache).
fn engine_args(run: &BenchmarkRun) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--warmup".into(),
        run.warmup.to_string().into(),
        "--min-runs".into(),
        run.min_runs.to_string().into(),
        "--prepare".into(),
        "sync".into(),
    ];
    if run.ignore_failure {
        args.push("--ignore-failure".into());
    }
    args.push("--export-json".into());
    args.push(run.results_path.clone().into());
    args.push("--style".into());
    args.push("full".into());
    for (name, command) in &run.commands {
        args.push("--command-name".into());
        args.push(name.into());
        args.push(command.into());
    }
    args
}

/// Invoke the external benchmarking engine once for the whole batch,
/// inheriting stdio so its progress output reaches the operator.
///
/// # Errors
///
/// A non-zero engine exit is `EngineFailure`: the results document is not
/// guaranteed consistent and callers must not assume partial results.
/// Per-command failures inside the batch are tolerated via
/// `--ignore-failure` and do not trip this.
pub fn run(run: &BenchmarkRun) -> Result<()> {
    let status = Command::new(ENGINE)
        .args(engine_args(run))
        .status()
        .map_err(|_| MdbenchError::HyperfineNotFound)?;

    if !status.success() {
        return Err(MdbenchError::EngineFailure { status }.into());
    }
    Ok(())
}
