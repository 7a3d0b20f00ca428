use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// A file written by one successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub filename: String,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Names already claimed in the target directory.
///
/// Seeded once from a directory listing and grown as files are written. This
/// is the only duplicate check: identical bytes under another name are not
/// detected.
#[derive(Debug, Clone, Default)]
pub struct KnownFiles {
    names: HashSet<String>,
}

impl KnownFiles {
    /// Snapshot every entry currently in `dir` (files and subdirectories alike).
    pub async fn snapshot(dir: &Path) -> io::Result<Self> {
        let mut names = HashSet::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
        tracing::debug!(dir = %dir.display(), count = names.len(), "snapshotted existing files");
        Ok(Self { names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns `false` if the name was already known.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}
