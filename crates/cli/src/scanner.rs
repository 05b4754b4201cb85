use anyhow::{Context, Result};
use ignore::WalkBuilder;
use locator_code_extractor::{Grammar, SourceFile};
use std::path::{Component, Path, PathBuf};

/// Finds source files with a supported grammar under a project root
pub struct ProjectScanner {
    root: PathBuf,
    max_file_bytes: u64,
}

impl ProjectScanner {
    pub fn new(root: impl AsRef<Path>, max_file_bytes: u64) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_file_bytes,
        }
    }

    /// Scan for source files (.gitignore aware), sorted by path
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false);
        builder.filter_entry(move |entry| !is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            if Grammar::from_path(path).is_none() {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                if meta.len() > self.max_file_bytes {
                    log::debug!(
                        "Skipping large file {} ({} bytes > {})",
                        path.display(),
                        meta.len(),
                        self.max_file_bytes
                    );
                    continue;
                }
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        log::info!("Found {} source files", files.len());
        files
    }

    /// Read every scanned file; unreadable files are skipped with a warning
    pub fn read_sources(&self) -> Vec<SourceFile> {
        let mut sources = Vec::new();
        for path in self.scan() {
            match std::fs::read(&path) {
                Ok(content) => sources.push(SourceFile::new(self.relative(&path), content)),
                Err(e) => log::warn!("Skipping unreadable file {}: {e}", path.display()),
            }
        }
        sources
    }

    /// Project-relative path with `/` separators
    pub fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Canonical project root; errors when the path is not a directory
pub fn project_root(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Invalid project path {}", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Project path {} is not a directory", root.display());
    }
    Ok(root)
}

fn is_ignored_scope(path: &Path, root: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            IGNORED_SCOPES.iter().any(|ignored| *ignored == name)
        }
        _ => false,
    })
}

const IGNORED_SCOPES: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    "venv",
    "env",
    ".venv",
    "dist",
    "build",
    ".next",
    "coverage",
    ".cache",
    "target",
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    const LIMIT: u64 = 512 * 1024;

    #[test]
    fn skips_ignored_directories_and_unsupported_files() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/api")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("venv/lib")).unwrap();
        fs::write(root.join("src/api/routes.py"), "def route():\n    pass\n").unwrap();
        fs::write(root.join("src/app.ts"), "function main() {}\n").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "function x() {}\n").unwrap();
        fs::write(root.join("venv/lib/site.py"), "def x():\n    pass\n").unwrap();
        fs::write(root.join("README.md"), "# readme\n").unwrap();

        let scanner = ProjectScanner::new(root, LIMIT);
        let names: Vec<String> = scanner.scan().iter().map(|p| scanner.relative(p)).collect();

        assert_eq!(names, vec!["src/api/routes.py", "src/app.ts"]);
    }

    #[test]
    fn respects_gitignore_and_size_limit() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join(".gitignore"), "generated/\n").unwrap();
        fs::create_dir_all(root.join("generated")).unwrap();
        fs::write(root.join("generated/out.js"), "function g() {}\n").unwrap();
        fs::write(root.join("big.py"), "x = 1\n".repeat(100)).unwrap();
        fs::write(root.join("small.py"), "x = 1\n").unwrap();

        let scanner = ProjectScanner::new(root, 100);
        let names: Vec<String> = scanner.scan().iter().map(|p| scanner.relative(p)).collect();

        assert_eq!(names, vec!["small.py"]);
    }

    #[test]
    fn reads_sources_with_relative_paths() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("pkg")).unwrap();
        fs::write(temp.path().join("pkg/mod.rs"), "fn f() {}\n").unwrap();

        let sources = ProjectScanner::new(temp.path(), LIMIT).read_sources();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].path, "pkg/mod.rs");
        assert_eq!(sources[0].content, b"fn f() {}\n".to_vec());
    }

    #[test]
    fn rejects_missing_project() {
        let temp = tempdir().unwrap();
        assert!(project_root(&temp.path().join("missing")).is_err());
        assert!(project_root(temp.path()).is_ok());
    }
}
