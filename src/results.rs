use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::errors::MdbenchError;
use crate::types::{BenchmarkReport, ResultRecord};

/// Load the engine's exported results document.
///
/// # Errors
///
/// `ResultsNotFound` when the benchmark step has not produced the document
/// yet. The schema itself is trusted (written by the engine), so a parse
/// failure only reports the underlying serde error.
pub fn load(path: &Path) -> Result<Vec<ResultRecord>> {
    if !path.is_file() {
        return Err(MdbenchError::ResultsNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let report: BenchmarkReport = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(report.results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_results_instructs_to_run_first() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load(&tmp.path().join("cold_start.json")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Benchmark results not found"));
        assert!(message.contains("Run `mdbench run` first"));
    }

    #[test]
    fn loads_records_in_engine_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cold_start.json");
        fs::write(
            &path,
            r#"{"results": [
                {"command": "mado", "mean": 0.8},
                {"command": "rumdl", "mean": 0.05}
            ]}"#,
        )
        .unwrap();

        let records = load(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].command, "mado");
        assert_eq!(records[1].command, "rumdl");
    }
}
