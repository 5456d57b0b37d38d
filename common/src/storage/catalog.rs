use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{
    error::AppError,
    storage::types::document::{DocumentKey, DocumentScope},
};

pub const DOCUMENT_EXTENSION: &str = "md";

/// Read-only view of the data directory:
/// `{root}/{language}/{doc_type}/{id}.md`.
#[derive(Clone, Debug)]
pub struct Catalog {
    root: PathBuf,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scope_path(&self, scope: &DocumentScope) -> PathBuf {
        self.root.join(&scope.language).join(&scope.doc_type)
    }

    pub fn document_path(&self, key: &DocumentKey) -> PathBuf {
        self.root
            .join(&key.language)
            .join(&key.doc_type)
            .join(format!("{}.{DOCUMENT_EXTENSION}", key.id))
    }

    /// Subdirectory names of the root, sorted. Like every listing here, only
    /// lowercase names are returned, so each one round-trips through
    /// [`Catalog::document_path`].
    pub async fn list_languages(&self) -> Result<Vec<String>, AppError> {
        list_names(&self.root, EntryKind::Dir).await
    }

    /// Subdirectory names of one language, sorted.
    pub async fn list_doc_types(&self, language: &str) -> Result<Vec<String>, AppError> {
        list_names(&self.root.join(language), EntryKind::Dir).await
    }

    /// The document files of one scope, sorted by path.
    pub async fn list_files(&self, scope: &DocumentScope) -> Result<Vec<PathBuf>, AppError> {
        let dir = self.scope_path(scope);
        let mut files: Vec<PathBuf> = list_names(&dir, EntryKind::File)
            .await?
            .into_iter()
            .map(|name| dir.join(name))
            .filter(|path| path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION))
            .collect();
        files.sort();
        Ok(files)
    }

    /// True when the root can be listed at all.
    pub async fn is_readable(&self) -> bool {
        fs::read_dir(&self.root).await.is_ok()
    }
}

async fn list_names(dir: &Path, kind: EntryKind) -> Result<Vec<String>, AppError> {
    let enumeration_error = |source| AppError::Enumeration {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir).await.map_err(enumeration_error)?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(enumeration_error)? {
        // Follows symlinks, so a linked language directory still counts.
        let Ok(metadata) = fs::metadata(entry.path()).await else {
            tracing::debug!(path = %entry.path().display(), "Skipping unreadable entry");
            continue;
        };
        let matches = match kind {
            EntryKind::Dir => metadata.is_dir(),
            EntryKind::File => metadata.is_file(),
        };
        if !matches {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 entry");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        // Keys are lowercase; a name that is not would never resolve back
        // to the same path.
        if name != name.trim() || name != name.to_lowercase() {
            tracing::warn!(path = %entry.path().display(), "Skipping entry with non-lowercase name");
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}
