//! Disk-based route collection.
//!
//! The collection file holds a JSON array of route documents, the same
//! shape the seeding scripts push to the document database. A missing file
//! is an empty collection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::{RecordRead, RouteRecord};

use super::error::StoreError;
use super::{RouteSnapshot, RouteStore};

/// Route collection stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Open the collection `name` in `data_dir`, stored as `<data_dir>/<name>.json`.
    ///
    /// Names are limited to ASCII letters, digits, `_` and `-`.
    pub fn collection(data_dir: impl AsRef<Path>, name: &str) -> Result<Self, StoreError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidCollection {
                name: name.to_string(),
            });
        }

        Ok(Self::new(data_dir.as_ref().join(format!("{name}.json"))))
    }

    /// Get the collection file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the raw documents in the collection.
    pub async fn load_documents(&self) -> Result<Vec<Value>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        parse_collection(&contents)
    }

    /// Load and decode every route in the collection.
    pub async fn read_routes(&self) -> Result<Vec<RecordRead>, StoreError> {
        let documents = self.load_documents().await?;

        Ok(documents
            .iter()
            .enumerate()
            .map(|(idx, doc)| RouteRecord::from_document(&document_key(doc, idx), doc))
            .collect())
    }

    /// Insert or replace documents, keyed by their `id` field.
    ///
    /// Documents without an `id` are given a fresh one. Returns the IDs
    /// written, in input order.
    pub async fn upsert(&self, documents: Vec<Value>) -> Result<Vec<String>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut existing = self.load_documents().await?;
        let mut positions: HashMap<String, usize> = existing
            .iter()
            .enumerate()
            .filter_map(|(idx, doc)| document_id(doc).map(|id| (id.to_string(), idx)))
            .collect();

        let mut written = Vec::with_capacity(documents.len());
        for mut document in documents {
            let Some(fields) = document.as_object_mut() else {
                return Err(StoreError::Json {
                    message: "route documents must be JSON objects".to_string(),
                });
            };

            let id = match fields.get("id").and_then(Value::as_str) {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => {
                    let id = uuid::Uuid::new_v4().to_string();
                    fields.insert("id".to_string(), Value::String(id.clone()));
                    id
                }
            };

            match positions.get(&id) {
                Some(&idx) => existing[idx] = document,
                None => {
                    positions.insert(id.clone(), existing.len());
                    existing.push(document);
                }
            }
            debug!(id = %id, "upserted route document");
            written.push(id);
        }

        write_collection(&self.path, &existing).await?;
        info!(path = %self.path.display(), count = written.len(), "route documents written");

        Ok(written)
    }

    /// Remove every document. Returns how many were removed.
    pub async fn delete_all(&self) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;

        let removed = self.load_documents().await?.len();
        if removed > 0 {
            write_collection(&self.path, &[]).await?;
        }
        info!(path = %self.path.display(), removed, "route collection cleared");

        Ok(removed)
    }

    /// Write a copy of the collection to `out`. Returns the document count.
    ///
    /// Creates parent directories if they don't exist.
    pub async fn export_to(&self, out: &Path) -> Result<usize, StoreError> {
        let documents = self.load_documents().await?;
        write_collection(out, &documents).await?;
        info!(path = %out.display(), count = documents.len(), "route collection exported");

        Ok(documents.len())
    }
}

impl RouteStore for JsonFileStore {
    fn list_routes(&self) -> BoxFuture<'_, Result<RouteSnapshot, StoreError>> {
        async move {
            let routes = self.read_routes().await?;
            Ok::<_, StoreError>(Arc::new(routes))
        }
        .boxed()
    }
}

fn parse_collection(contents: &str) -> Result<Vec<Value>, StoreError> {
    match serde_json::from_str(contents) {
        Ok(Value::Array(documents)) => Ok(documents),
        Ok(_) => Err(StoreError::Json {
            message: "collection file must contain a JSON array".to_string(),
        }),
        Err(e) => Err(StoreError::Json {
            message: e.to_string(),
        }),
    }
}

async fn write_collection(path: &Path, documents: &[Value]) -> Result<(), StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }

    let json = serde_json::to_string_pretty(documents).map_err(|e| StoreError::Json {
        message: format!("failed to serialize collection: {e}"),
    })?;

    // Readers in other processes must never see a half-written array
    let staging = staging_path(path);
    if let Err(source) = tokio::fs::write(&staging, json).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(io_error(source));
    }
    tokio::fs::rename(&staging, path).await.map_err(io_error)
}

/// Temporary file beside `path`, so the final rename stays on one filesystem.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()))
}

fn document_id(document: &Value) -> Option<&str> {
    document
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Key for decoding: the document ID, or its position if it has none.
fn document_key(document: &Value, idx: usize) -> String {
    document_id(document)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{idx}"))
}
