//! Attachment resolution: image ref → display metadata.
//!
//! A gallery stores refs, not attachments, so the attachment behind a ref may
//! have been deleted since the gallery was saved. [`AttachmentResolver::resolve`]
//! reports that as [`ResolveError::NotFound`]; renderers turn it into a
//! placeholder instead of failing the page.
//!
//! ## Field resolution
//!
//! - **filename**: last path segment of the original URL
//! - **alt text**: explicit alt → title → empty (see [`AttachmentMetadata::display_alt`])
//! - **sized variants**: named renditions from the catalog, falling back to the
//!   original URL and intrinsic dimensions when a rendition is missing

use crate::catalog::{AttachmentCatalog, AttachmentRecord, CatalogError, SizedVariant};
use crate::types::{AttachmentId, ImageRef};
use std::collections::BTreeMap;
use thiserror::Error;

/// Rendition name for the square editing-UI thumbnail.
pub const ADMIN_THUMB_SIZE: &str = "gallery-admin-thumb";
/// Rendition name for public gallery thumbnails.
pub const PUBLIC_THUMB_SIZE: &str = "gallery-thumb";

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Not an attachment id: {0:?}")]
    InvalidRef(String),
    #[error("Attachment {0} not found")]
    NotFound(AttachmentId),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Display metadata for one attachment. Read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentMetadata {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub alt_text: String,
    pub excerpt: String,
    pub filename: String,
    pub sizes: BTreeMap<String, SizedVariant>,
}

impl AttachmentMetadata {
    /// The named rendition, or the original when the catalog has none.
    pub fn variant(&self, size: &str) -> SizedVariant {
        self.sizes.get(size).cloned().unwrap_or_else(|| SizedVariant {
            url: self.url.clone(),
            width: self.width,
            height: self.height,
        })
    }

    /// Alt text for `<img>`: explicit alt if set, otherwise the title.
    pub fn display_alt(&self) -> &str {
        first_non_empty(&[self.alt_text.as_str(), self.title.as_str()]).unwrap_or("")
    }
}

impl From<AttachmentRecord> for AttachmentMetadata {
    fn from(record: AttachmentRecord) -> Self {
        let filename = basename(&record.url).to_string();
        Self {
            url: record.url,
            width: record.width,
            height: record.height,
            title: record.title,
            alt_text: record.alt,
            excerpt: record.caption,
            filename,
            sizes: record.sizes,
        }
    }
}

/// Last `/`-separated segment of a URL, ignoring any query string.
pub fn basename(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Resolves refs against a catalog. Pure read.
#[derive(Clone, Copy)]
pub struct AttachmentResolver<'a> {
    catalog: &'a dyn AttachmentCatalog,
}

impl<'a> AttachmentResolver<'a> {
    pub fn new(catalog: &'a dyn AttachmentCatalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, image: &ImageRef) -> Result<AttachmentMetadata, ResolveError> {
        let id = image
            .attachment_id()
            .ok_or_else(|| ResolveError::InvalidRef(image.to_string()))?;
        self.catalog
            .attachment(id)?
            .map(AttachmentMetadata::from)
            .ok_or(ResolveError::NotFound(id))
    }
}
