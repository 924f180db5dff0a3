use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::ops::Bound;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::error::CatalogError;
use super::model::Item;

/// Minimal async interface the pipeline needs from the catalog.
///
/// Reads are unrestricted; the only write is [`set_embedding`](Self::set_embedding),
/// which must replace one item's vector atomically from a reader's point of view.
pub trait CatalogStore: Send + Sync {
    /// Returns every item with a present, non-empty embedding.
    fn searchable_items(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Item>, CatalogError>> + Send;

    /// Returns up to `limit` items lacking an embedding, ordered by id ascending.
    /// With `after`, only ids strictly greater than it are considered.
    fn pending_embeddings(
        &self,
        limit: usize,
        after: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<Item>, CatalogError>> + Send;

    /// Stores the embedding for one item.
    fn set_embedding(
        &self,
        id: &str,
        embedding: Vec<f32>,
    ) -> impl std::future::Future<Output = Result<(), CatalogError>> + Send;

    /// Looks up one item by id.
    fn get(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Item>, CatalogError>> + Send;

    /// Fixed vector dimensionality, once known.
    fn dimension(&self) -> Option<usize>;
}

impl<T: CatalogStore> CatalogStore for Arc<T> {
    async fn searchable_items(&self) -> Result<Vec<Item>, CatalogError> {
        self.as_ref().searchable_items().await
    }

    async fn pending_embeddings(
        &self,
        limit: usize,
        after: Option<&str>,
    ) -> Result<Vec<Item>, CatalogError> {
        self.as_ref().pending_embeddings(limit, after).await
    }

    async fn set_embedding(&self, id: &str, embedding: Vec<f32>) -> Result<(), CatalogError> {
        self.as_ref().set_embedding(id, embedding).await
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, CatalogError> {
        self.as_ref().get(id).await
    }

    fn dimension(&self) -> Option<usize> {
        self.as_ref().dimension()
    }
}

#[derive(Debug, Default)]
struct CatalogInner {
    items: BTreeMap<String, Item>,
    dimension: Option<usize>,
}

impl CatalogInner {
    /// Pins the dimensionality on first use, rejects mismatches afterwards.
    fn check_dimension(&mut self, id: &str, len: usize) -> Result<(), CatalogError> {
        match self.dimension {
            Some(expected) if expected != len => Err(CatalogError::InvalidDimension {
                id: id.to_string(),
                expected,
                actual: len,
            }),
            Some(_) => Ok(()),
            None => {
                self.dimension = Some(len);
                Ok(())
            }
        }
    }
}

/// Catalog held in memory, keyed (and therefore ordered) by item id.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<CatalogInner>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty catalog with a fixed vector dimensionality.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            inner: RwLock::new(CatalogInner {
                items: BTreeMap::new(),
                dimension: Some(dimension),
            }),
        }
    }

    /// Builds a catalog from rows, rejecting duplicate ids and ragged vectors.
    pub fn from_items<I>(items: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Item>,
    {
        let catalog = Self::new();
        for item in items {
            if catalog.contains(&item.id) {
                return Err(CatalogError::DuplicateId { id: item.id });
            }
            catalog.upsert(item)?;
        }
        Ok(catalog)
    }

    /// Inserts or replaces a row (catalog ingestion path).
    pub fn upsert(&self, item: Item) -> Result<(), CatalogError> {
        let mut inner = self.inner.write();
        if let Some(embedding) = item.searchable_embedding() {
            inner.check_dimension(&item.id, embedding.len())?;
        }
        inner.items.insert(item.id.clone(), item);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    /// Number of items with a non-empty embedding.
    pub fn searchable_count(&self) -> usize {
        self.inner
            .read()
            .items
            .values()
            .filter(|item| item.is_searchable())
            .count()
    }

    /// Clones every row in id order.
    pub fn snapshot(&self) -> Vec<Item> {
        self.inner.read().items.values().cloned().collect()
    }

    /// Loads a catalog from a JSONL file (one [`Item`] per line, blank lines skipped).
    pub fn load_jsonl(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut items = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| CatalogError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let item: Item =
                serde_json::from_str(&line).map_err(|e| CatalogError::MalformedRow {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    message: e.to_string(),
                })?;
            items.push(item);
        }

        let catalog = Self::from_items(items)?;
        info!(
            path = %path.display(),
            items = catalog.len(),
            searchable = catalog.searchable_count(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Writes the catalog to a JSONL file in id order, replacing it atomically.
    pub fn save_jsonl(&self, path: &Path) -> Result<(), CatalogError> {
        let io_err = |e: std::io::Error| CatalogError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let tmp_path = path.with_extension("jsonl.tmp");
        let snapshot = self.snapshot();
        {
            let file = std::fs::File::create(&tmp_path).map_err(io_err)?;
            let mut writer = BufWriter::new(file);
            for item in &snapshot {
                serde_json::to_writer(&mut writer, item).map_err(|e| CatalogError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                writer.write_all(b"\n").map_err(io_err)?;
            }
            writer.flush().map_err(io_err)?;
        }
        std::fs::rename(&tmp_path, path).map_err(io_err)?;

        debug!(path = %path.display(), items = snapshot.len(), "Catalog saved");
        Ok(())
    }
}

impl CatalogStore for InMemoryCatalog {
    async fn searchable_items(&self) -> Result<Vec<Item>, CatalogError> {
        Ok(self
            .inner
            .read()
            .items
            .values()
            .filter(|item| item.is_searchable())
            .cloned()
            .collect())
    }

    async fn pending_embeddings(
        &self,
        limit: usize,
        after: Option<&str>,
    ) -> Result<Vec<Item>, CatalogError> {
        let lower = after.map_or(Bound::Unbounded, Bound::Excluded);
        Ok(self
            .inner
            .read()
            .items
            .range::<str, _>((lower, Bound::Unbounded))
            .map(|(_, item)| item)
            .filter(|item| !item.is_searchable())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn set_embedding(&self, id: &str, embedding: Vec<f32>) -> Result<(), CatalogError> {
        if embedding.is_empty() {
            return Err(CatalogError::EmptyEmbedding { id: id.to_string() });
        }

        let mut inner = self.inner.write();
        if !inner.items.contains_key(id) {
            return Err(CatalogError::ItemNotFound { id: id.to_string() });
        }
        inner.check_dimension(id, embedding.len())?;

        if let Some(item) = inner.items.get_mut(id) {
            item.embedding = Some(embedding);
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, CatalogError> {
        Ok(self.inner.read().items.get(id).cloned())
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.read().dimension
    }
}
