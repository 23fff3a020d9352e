//! In-process catalog and metadata store.
//!
//! [`Site`] implements both [`AttachmentCatalog`] and [`MetaStore`] over plain
//! maps, and can be loaded from / saved to a JSON site file:
//!
//! ```json
//! {
//!   "attachments": [
//!     { "id": 3, "parent": 5, "mime_type": "image/jpeg",
//!       "url": "/uploads/dawn.jpg", "width": 1600, "height": 1200,
//!       "title": "Dawn", "alt": "", "caption": "First light" }
//!   ],
//!   "meta": { "5": { "gallery_images": ["3"] } }
//! }
//! ```
//!
//! The CLI runs against such a file; tests build sites in memory.

use crate::catalog::{
    AttachmentCatalog, AttachmentRecord, CatalogError, MediaKind, MetaError, MetaStore,
};
use crate::types::{AttachmentId, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type EntityMeta = BTreeMap<String, serde_json::Value>;

/// On-disk shape of a site file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SiteFile {
    #[serde(default)]
    attachments: Vec<AttachmentRecord>,
    #[serde(default)]
    meta: BTreeMap<EntityId, EntityMeta>,
}

/// Attachments and entity metadata held in memory.
#[derive(Debug, Default)]
pub struct Site {
    attachments: BTreeMap<AttachmentId, AttachmentRecord>,
    meta: Mutex<BTreeMap<EntityId, EntityMeta>>,
    offline: AtomicBool,
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attachments(records: impl IntoIterator<Item = AttachmentRecord>) -> Self {
        let mut site = Self::new();
        for record in records {
            site.insert_attachment(record);
        }
        site
    }

    pub fn insert_attachment(&mut self, record: AttachmentRecord) {
        self.attachments.insert(record.id, record);
    }

    pub fn remove_attachment(&mut self, id: AttachmentId) -> Option<AttachmentRecord> {
        self.attachments.remove(&id)
    }

    /// Simulate the catalog being unreachable: every query fails while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Load a site file. A missing file yields an empty site.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        let file: SiteFile = serde_json::from_str(&content)?;
        let mut site = Self::with_attachments(file.attachments);
        site.meta = Mutex::new(file.meta);
        Ok(site)
    }

    /// Write the site back, attachments in id order.
    pub fn save(&self, path: &Path) -> Result<(), SiteError> {
        let file = SiteFile {
            attachments: self.attachments.values().cloned().collect(),
            meta: self.lock_meta().clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn lock_meta(&self) -> std::sync::MutexGuard<'_, BTreeMap<EntityId, EntityMeta>> {
        // A poisoned lock only means another writer panicked mid-insert;
        // the map itself is still consistent.
        self.meta.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_online(&self) -> Result<(), CatalogError> {
        if self.offline.load(Ordering::Relaxed) {
            Err(CatalogError::Unavailable("site is offline".into()))
        } else {
            Ok(())
        }
    }
}

impl AttachmentCatalog for Site {
    fn attachment(&self, id: AttachmentId) -> Result<Option<AttachmentRecord>, CatalogError> {
        self.check_online()?;
        Ok(self.attachments.get(&id).cloned())
    }

    fn children(
        &self,
        parent: EntityId,
        kind: MediaKind,
    ) -> Result<Vec<AttachmentId>, CatalogError> {
        self.check_online()?;
        Ok(self
            .attachments
            .values()
            .filter(|a| a.parent == Some(parent) && kind.matches(&a.mime_type))
            .map(|a| a.id)
            .collect())
    }
}

impl MetaStore for Site {
    fn get_meta(
        &self,
        entity: EntityId,
        key: &str,
    ) -> Result<Option<serde_json::Value>, MetaError> {
        Ok(self
            .lock_meta()
            .get(&entity)
            .and_then(|m| m.get(key))
            .cloned())
    }

    fn set_meta(
        &self,
        entity: EntityId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), MetaError> {
        self.lock_meta()
            .entry(entity)
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }
}
