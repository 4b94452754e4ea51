//! External tool lookup

use std::path::{Path, PathBuf};

/// Resolve `program` through `PATH` (or as given, when it contains a path
/// separator). Returns `None` when nothing executable is found.
pub fn resolve_tool(program: &Path) -> Option<PathBuf> {
    which::which(program).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool() {
        assert!(resolve_tool(Path::new("definitely_not_a_real_tool_xyz")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_is_resolved() {
        let resolved = resolve_tool(Path::new("sh")).expect("sh should be on PATH");
        assert!(resolved.is_absolute());
    }
}
