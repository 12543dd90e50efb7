use std::path::{Path, PathBuf};

use crate::error::Result;

/// Recursively walk a directory and list every regular file below it.
///
/// Skips hidden files/directories (names starting with `.`). Paths are
/// returned as they appear under `root`, sorted.
pub fn discover_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    walk_dir(root, &mut results)?;
    results.sort();
    Ok(results)
}

fn walk_dir(current: &Path, results: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(current)?;

    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        // Skip hidden files and directories.
        if name.starts_with('.') {
            continue;
        }

        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk_dir(&entry.path(), results)?;
        } else if file_type.is_symlink() {
            // Follow links to files only; linked directories could cycle.
            if entry.path().is_file() {
                results.push(entry.path());
            }
        } else if file_type.is_file() {
            results.push(entry.path());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn discovers_every_extension() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("note.md"), "# Hello").unwrap();
        std::fs::write(tmp.path().join("readme.txt"), "Hello").unwrap();
        std::fs::write(tmp.path().join("page.html"), "<p>hi</p>").unwrap();

        let files = discover_files(tmp.path()).unwrap();
        assert_eq!(
            names(tmp.path(), &files),
            vec!["note.md", "page.html", "readme.txt"]
        );
    }

    #[test]
    fn skips_hidden_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(".hidden.md"), "secret").unwrap();
        std::fs::write(tmp.path().join("visible.md"), "hello").unwrap();

        let files = discover_files(tmp.path()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["visible.md"]);
    }

    #[test]
    fn skips_hidden_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let hidden = tmp.path().join(".git");
        std::fs::create_dir(&hidden).unwrap();
        std::fs::write(hidden.join("config"), "git config").unwrap();
        std::fs::write(tmp.path().join("notes.md"), "notes").unwrap();

        let files = discover_files(tmp.path()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["notes.md"]);
    }

    #[test]
    fn recurses_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("subdir");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("deep.md"), "deep").unwrap();
        std::fs::write(tmp.path().join("top.md"), "top").unwrap();

        let files = discover_files(tmp.path()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["subdir/deep.md", "top.md"]);
    }

    #[test]
    fn empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let files = discover_files(tmp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(discover_files(&tmp.path().join("nope")).is_err());
    }
}
