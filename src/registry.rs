use crate::types::{AvailabilityCheck, Category, ToolDescriptor};

/// The baseline tool: highlighted in the chart and used as the denominator
/// for the table's ratio column.
pub const BASELINE_TOOL: &str = "rumdl";

/// Project-relative path of the locally built baseline binary.
pub const RUMDL_LOCAL_BIN: &str = "target/release/rumdl";

/// Every tool the harness knows how to benchmark. Adding a comparison tool
/// means adding one entry here; prober, templater and orchestrator are all
/// generic over this slice.
pub static TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "rumdl",
        category: Category::Lint,
        template: "'{binary}' check --no-cache '{target}'",
        check: AvailabilityCheck::LocalBinary {
            path: RUMDL_LOCAL_BIN,
        },
        check_msg: "Run: cargo build --release",
    },
    ToolDescriptor {
        name: "markdownlint-cli",
        category: Category::Lint,
        template: "npx markdownlint-cli '{target}'",
        check: AvailabilityCheck::Launcher { program: "npx" },
        check_msg: "npx required (install Node.js)",
    },
    ToolDescriptor {
        name: "markdownlint-cli2",
        category: Category::Lint,
        // markdownlint-cli2 must be run from within the target directory
        template: "cd '{target}' && npx markdownlint-cli2 '**/*.md'",
        check: AvailabilityCheck::Launcher { program: "npx" },
        check_msg: "npx required (install Node.js)",
    },
    ToolDescriptor {
        name: "remark-lint",
        category: Category::Lint,
        template: "npx remark --use remark-preset-lint-recommended --quiet '{target}'",
        check: AvailabilityCheck::Launcher { program: "npx" },
        check_msg: "npx required (install Node.js)",
    },
    ToolDescriptor {
        name: "pymarkdown",
        category: Category::Lint,
        template: "uvx pymarkdownlnt scan '{target}'",
        check: AvailabilityCheck::Launcher { program: "uvx" },
        check_msg: "uvx required (install uv)",
    },
    ToolDescriptor {
        name: "mado",
        category: Category::Lint,
        template: "'{binary}' check '{target}'",
        check: AvailabilityCheck::ReleaseDownload,
        check_msg: "Failed to download mado binary",
    },
    ToolDescriptor {
        name: "mdformat",
        category: Category::Format,
        template: "uvx mdformat --check '{target}'",
        check: AvailabilityCheck::Launcher { program: "uvx" },
        check_msg: "uvx required (install uv)",
    },
    ToolDescriptor {
        name: "Prettier",
        category: Category::Format,
        template: "npx prettier --check '{target}/**/*.md'",
        check: AvailabilityCheck::Launcher { program: "npx" },
        check_msg: "npx required (install Node.js)",
    },
];

pub fn find(name: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|tool| tool.name == name)
}

pub fn category_of(name: &str) -> Option<Category> {
    find(name).map(|tool| tool.category)
}
