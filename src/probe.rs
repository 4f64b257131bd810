use std::process::{Command, Stdio};

use owo_colors::{OwoColorize, Stream};

use crate::acquire;
use crate::registry;
use crate::types::{AvailabilityCheck, ProjectPaths, ToolDescriptor};

/// Returns true iff `<program> --version` spawns and exits successfully.
/// A missing executable or non-zero exit is reported as unavailable,
/// never propagated.
fn launcher_responds(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Check whether the external benchmarking engine is on PATH.
pub fn engine_available() -> bool {
    launcher_responds("hyperfine")
}

/// Run one tool's availability check. Acquisition failures degrade the tool
/// to unavailable after printing a diagnostic; they never abort the run.
pub fn is_available(tool: &ToolDescriptor, paths: &ProjectPaths) -> bool {
    match tool.check {
        AvailabilityCheck::Launcher { program } => launcher_responds(program),
        AvailabilityCheck::LocalBinary { path } => paths.local_binary(path).is_file(),
        AvailabilityCheck::ReleaseDownload => match acquire::ensure_binary(&paths.tools_dir()) {
            Ok(_) => true,
            Err(err) => {
                println!("   ⚠️  {err:#}");
                false
            }
        },
    }
}

/// Probe the registry (or a requested subset) and return the available tools
/// in registry order. Unknown requested names are warned about and skipped;
/// an empty result is the caller's decision to treat as fatal.
pub fn discover(
    selected: Option<&[String]>,
    paths: &ProjectPaths,
) -> Vec<&'static ToolDescriptor> {
    let names: Vec<&str> = match selected {
        Some(names) => names.iter().map(String::as_str).collect(),
        None => registry::TOOLS.iter().map(|tool| tool.name).collect(),
    };

    let mut available = Vec::new();
    for name in names {
        let Some(tool) = registry::find(name) else {
            println!("⚠️  Unknown tool: {name}");
            continue;
        };

        if is_available(tool, paths) {
            println!(
                "✅ Found {} ({})",
                tool.name.if_supports_color(Stream::Stdout, |s| s.green()),
                tool.category.as_lower()
            );
            available.push(tool);
        } else {
            println!(
                "⚠️  {} not available: {}",
                tool.name,
                tool.check_msg.if_supports_color(Stream::Stdout, |s| s.dimmed())
            );
        }
    }

    available
}
