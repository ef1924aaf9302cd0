//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::geometry::DEFAULT_CELL_SIZE;
use crate::scene::ScenePatch;
use crate::snapshot::{SceneDocument, parse_layout};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Layouts are kept as JSON text so loads go through the same parsing as
/// persistent backends.
pub struct MemoryStorage {
    layouts: RwLock<HashMap<String, String>>,
    cell_size: f64,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self {
            layouts: RwLock::new(HashMap::new()),
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell size used to convert pixel coordinates in older data.
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Store raw JSON as-is, e.g. data written by an older client.
    pub fn insert_raw(&self, id: &str, json: impl Into<String>) -> StorageResult<()> {
        let mut layouts = self
            .layouts
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        layouts.insert(id.to_string(), json.into());
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &SceneDocument) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let json = document.to_json();
        Box::pin(async move {
            let json = json?;
            let mut layouts = self.layouts.write().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            layouts.insert(id, json);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<ScenePatch>> {
        let id = id.to_string();
        Box::pin(async move {
            let layouts = self.layouts.read().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            let json = layouts.get(&id).ok_or_else(|| StorageError::NotFound(id.clone()))?;
            Ok(parse_layout(json, self.cell_size)?)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut layouts = self.layouts.write().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            layouts.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let layouts = self.layouts.read().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            Ok(layouts.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let layouts = self.layouts.read().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            Ok(layouts.contains_key(&id))
        })
    }
}
