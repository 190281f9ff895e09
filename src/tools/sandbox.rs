use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

/// A model-supplied path escaped the working directory. Carries the
/// original path string for the model-facing error message.
#[derive(Debug, Error)]
#[error("path \"{0}\" escapes the working directory")]
pub struct EscapeError(pub String);

/// Filesystem jail for tool calls.
///
/// Every path the model supplies is resolved against the root and rejected
/// when it escapes. Containment is advisory, not an OS-level jail: the root
/// is canonicalized once, targets are normalized lexically so paths that do
/// not exist yet can still be checked.
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// The root directory must exist; it is canonicalized once so later
    /// prefix checks compare real paths.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root
            .as_ref()
            .canonicalize()
            .with_context(|| format!("working directory not found: {}", root.as_ref().display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a model-supplied path onto the root and normalize it, without
    /// checking containment. An empty path maps to the root itself.
    pub fn join(&self, relative: &str) -> PathBuf {
        normalize(&self.root.join(relative))
    }

    /// Component-wise prefix check against the root.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// Resolve a model-supplied path against the root. The resolved path
    /// does not have to exist.
    pub fn resolve(&self, relative: &str) -> std::result::Result<PathBuf, EscapeError> {
        let resolved = self.join(relative);
        if self.contains(&resolved) {
            Ok(resolved)
        } else {
            Err(EscapeError(relative.to_string()))
        }
    }
}

/// Resolve `.` and `..` lexically, without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
