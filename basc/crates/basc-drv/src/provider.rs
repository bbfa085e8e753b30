//! The file provider boundary (section 6). Everything about reading source
//! text and enumerating a project's files lives behind [`FileProvider`], so
//! [`crate::Program`] never touches a filesystem or a retry policy
//! directly — per section 5, "reads are retried only by the provider,
//! never by the core."

use std::path::{Path, PathBuf};

/// Consumed by [`crate::Program`] to read file contents and enumerate a
/// project's files.
pub trait FileProvider: Send + Sync {
    /// Reads a file's text by logical path. `None` means not found, not an
    /// error — callers decide whether that's a `fileUnreachable` diagnostic
    /// or a missing-optional-file no-op.
    fn get_file_contents(&self, logical_path: &str) -> Option<String>;

    /// Enumerates `(source_path, logical_path)` pairs under `root_dir`
    /// matching `include` and none of `exclude`.
    fn list_files(&self, root_dir: &Path, include: &[&str], exclude: &[&str]) -> Vec<(PathBuf, String)>;

    fn file_exists(&self, path: &Path) -> bool;
}

/// The reference [`FileProvider`]: reads directly from the local
/// filesystem. `include`/`exclude` are `*.ext`-style suffix patterns — the
/// workspace carries no general glob-matching dependency, and the driver
/// only ever needs "files ending in .bs/.brs/.xml", not arbitrary glob
/// syntax.
#[derive(Debug, Clone)]
pub struct FsFileProvider {
    root: PathBuf,
}

impl FsFileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn walk(&self, dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = std::fs::read_dir(dir) else { return };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.walk(&path, out);
            } else {
                out.push(path);
            }
        }
    }
}

impl FileProvider for FsFileProvider {
    fn get_file_contents(&self, logical_path: &str) -> Option<String> {
        std::fs::read_to_string(self.root.join(logical_path)).ok()
    }

    fn list_files(&self, root_dir: &Path, include: &[&str], exclude: &[&str]) -> Vec<(PathBuf, String)> {
        let mut all = Vec::new();
        self.walk(root_dir, &mut all);
        all.into_iter()
            .filter(|p| include.is_empty() || matches_any(p, include))
            .filter(|p| !matches_any(p, exclude))
            .map(|src| {
                let logical = src
                    .strip_prefix(&self.root)
                    .unwrap_or(&src)
                    .to_string_lossy()
                    .replace('\\', "/");
                (src, logical)
            })
            .collect()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn matches_any(path: &Path, patterns: &[&str]) -> bool {
    let name = path.to_string_lossy();
    patterns.iter().any(|pat| match pat.strip_prefix('*') {
        Some(suffix) => name.ends_with(suffix),
        None => name.as_ref() == *pat,
    })
}
