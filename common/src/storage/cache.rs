use std::{
    collections::HashMap,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use futures::future::try_join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    error::AppError,
    storage::{
        catalog::Catalog,
        types::document::{Document, DocumentKey, DocumentScope},
    },
    utils::frontmatter::parse_document,
};

type Index = HashMap<DocumentKey, Arc<Document>>;

/// Process-wide index of parsed documents.
///
/// Entries are populated lazily by [`DocumentCache::get_or_load`] or per
/// scope by [`DocumentCache::load_all_and_replace`]. Keys always come from
/// the request, never from the file header. The lock is never held across
/// file I/O; concurrent misses on one key may both load it and the last
/// insert wins.
#[derive(Clone)]
pub struct DocumentCache {
    catalog: Catalog,
    entries: Arc<RwLock<Index>>,
    loads: Arc<AtomicUsize>,
}

impl DocumentCache {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            entries: Arc::new(RwLock::new(HashMap::new())),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the cached document for `key`, reading it from disk on a miss.
    ///
    /// Read and parse failures both surface as [`AppError::NotFound`], with
    /// the original failure kept as its source.
    pub async fn get_or_load(&self, key: &DocumentKey) -> Result<Arc<Document>, AppError> {
        if let Some(doc) = self.entries.read().await.get(key) {
            debug!(%key, "Document cache hit");
            return Ok(Arc::clone(doc));
        }

        let path = self.catalog.document_path(key);
        let document = self
            .load(key, &path)
            .await
            .map_err(|source| AppError::NotFound {
                key: key.clone(),
                source: Box::new(source),
            })?;

        let document = Arc::new(document);
        self.entries
            .write()
            .await
            .insert(key.clone(), Arc::clone(&document));
        debug!(%key, path = %path.display(), "Document loaded into cache");

        Ok(document)
    }

    /// Re-reads every document of `scope` and swaps them into the index.
    ///
    /// Only keys belonging to `scope` are removed or replaced; entries of
    /// other scopes are left untouched. If any file fails, the index is not
    /// modified and the error names the offending path. The returned list is
    /// ordered by `(order, id)`.
    pub async fn load_all_and_replace(
        &self,
        scope: &DocumentScope,
    ) -> Result<Vec<Arc<Document>>, AppError> {
        let files = self.catalog.list_files(scope).await?;

        let batch = try_join_all(files.iter().map(|path| async move {
            let key = key_for_file(scope, path)?;
            let document = self.load(&key, path).await?;
            Ok::<_, AppError>((key, Arc::new(document)))
        }))
        .await?;

        let mut documents: Vec<Arc<Document>> =
            batch.iter().map(|(_, doc)| Arc::clone(doc)).collect();
        documents.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

        {
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|key, _| !scope.contains(key));
            let evicted = before.saturating_sub(entries.len());
            entries.extend(batch);
            info!(
                %scope,
                loaded = documents.len(),
                replaced = evicted,
                total = entries.len(),
                "Replaced cached scope"
            );
        }

        Ok(documents)
    }

    /// Every loadable document of one language, resolved through the cache.
    ///
    /// Files that fail to load are logged and skipped.
    pub async fn load_language(&self, language: &str) -> Result<Vec<Arc<Document>>, AppError> {
        let mut documents = Vec::new();

        for doc_type in self.catalog.list_doc_types(language).await? {
            let Ok(scope) = DocumentScope::new(language, &doc_type) else {
                debug!(%language, %doc_type, "Skipping directory with unusable name");
                continue;
            };
            for path in self.catalog.list_files(&scope).await? {
                let loaded = match key_for_file(&scope, &path) {
                    Ok(key) => self.get_or_load(&key).await,
                    Err(err) => Err(err),
                };
                match loaded {
                    Ok(doc) => documents.push(doc),
                    Err(err) => warn!(path = %path.display(), error = %err, "Skipping document"),
                }
            }
        }

        Ok(documents)
    }

    pub async fn contains(&self, key: &DocumentKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Number of document files read from disk since creation.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    async fn load(&self, key: &DocumentKey, path: &Path) -> Result<Document, AppError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AppError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut document = parse_document(&raw, path)?;
        for (field, header_value) in document.assign_key(key) {
            warn!(
                %key,
                field,
                header_value = %header_value,
                path = %path.display(),
                "Frontmatter disagrees with file location; using location"
            );
        }

        Ok(document)
    }
}

fn key_for_file(scope: &DocumentScope, path: &Path) -> Result<DocumentKey, AppError> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| AppError::Validation(format!("unusable file name: {}", path.display())))?;
    scope.key(stem)
}
