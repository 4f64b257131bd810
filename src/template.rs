use std::path::Path;

use crate::types::ToolDescriptor;

/// Substitute the run-time placeholders into a tool's command template.
///
/// `target` must already be canonicalized so every tool receives the same
/// absolute path regardless of the invoking shell's working directory.
/// Templates carry their own single quotes around the substituted segments;
/// they are trusted static data, not user input, so no further escaping
/// happens here.
pub fn render(tool: &ToolDescriptor, target: &Path, binary: &Path) -> String {
    tool.template
        .replace("{target}", &target.to_string_lossy())
        .replace("{binary}", &binary.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::registry;

    #[test]
    fn substitutes_target_and_binary() {
        let tool = registry::find("mado").unwrap();
        let rendered = render(
            tool,
            Path::new("/abs/docs"),
            Path::new("/cache/.tools/mado"),
        );
        assert_eq!(rendered, "'/cache/.tools/mado' check '/abs/docs'");
    }

    #[test]
    fn launcher_templates_ignore_binary() {
        let tool = registry::find("markdownlint-cli").unwrap();
        let rendered = render(tool, Path::new("/abs/docs"), Path::new(""));
        assert_eq!(rendered, "npx markdownlint-cli '/abs/docs'");
    }

    #[test]
    fn distinct_targets_render_distinct_commands() {
        let tool = registry::find("pymarkdown").unwrap();
        let a = render(tool, Path::new("/repo/a"), Path::new(""));
        let b = render(tool, Path::new("/repo/b"), Path::new(""));
        assert_ne!(a, b);
    }

    #[test]
    fn canonicalized_target_appears_absolute() {
        let tmp = tempfile::tempdir().unwrap();
        let relative = PathBuf::from(".");
        let canonical = tmp.path().join(relative).canonicalize().unwrap();
        assert!(canonical.is_absolute());

        let tool = registry::find("Prettier").unwrap();
        let rendered = render(tool, &canonical, Path::new(""));
        assert!(rendered.contains(canonical.to_string_lossy().as_ref()));
    }
}
