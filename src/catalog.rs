//! Interfaces to the host system's attachment catalog and entity metadata.
//!
//! The gallery core never owns storage. It reads attachments through
//! [`AttachmentCatalog`] and persists gallery lists through [`MetaStore`];
//! the host provides the implementations. [`crate::memory::Site`] is the
//! in-process implementation used by the CLI and the test suite.

use crate::types::{AttachmentId, EntityId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum MetaError {
    #[error("Metadata store unavailable: {0}")]
    Unavailable(String),
}

/// Broad media type used to filter catalog children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
}

impl MediaKind {
    /// Whether a full MIME type (e.g. `image/jpeg`) belongs to this kind.
    pub fn matches(self, mime_type: &str) -> bool {
        match self {
            MediaKind::Image => mime_type.starts_with("image/"),
        }
    }
}

/// A named rendition the catalog has already produced for an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizedVariant {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// One attachment as the catalog stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub id: AttachmentId,
    /// The content entry this attachment was uploaded to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
    pub mime_type: String,
    /// URL of the full-size original.
    pub url: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub title: String,
    /// Explicit alternative text; empty when the uploader never set one.
    #[serde(default)]
    pub alt: String,
    /// Short caption (excerpt) text.
    #[serde(default)]
    pub caption: String,
    /// Renditions keyed by size name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sizes: BTreeMap<String, SizedVariant>,
}

/// Read access to the host's attachment catalog.
pub trait AttachmentCatalog: Send + Sync {
    /// Look up a single attachment. `Ok(None)` when it does not exist.
    fn attachment(&self, id: AttachmentId) -> Result<Option<AttachmentRecord>, CatalogError>;

    /// All attachments of `kind` whose parent is `parent`, ascending by id.
    fn children(&self, parent: EntityId, kind: MediaKind)
    -> Result<Vec<AttachmentId>, CatalogError>;
}

/// Per-entity key/value metadata owned by the host.
///
/// Values are structured JSON. Older hosts may hand back a string holding a
/// legacy serialized form instead of an array; decoding that is the caller's
/// job (see [`crate::store`]).
pub trait MetaStore: Send + Sync {
    fn get_meta(&self, entity: EntityId, key: &str)
    -> Result<Option<serde_json::Value>, MetaError>;

    fn set_meta(
        &self,
        entity: EntityId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<(), MetaError>;
}
