//! Incremental sync for the gallery editor.
//!
//! The editor never reloads the whole gallery while the user is working. It
//! asks for markup one step at a time:
//!
//! - [`GalleryAjaxService::fetch_one`]: the `<li>` for an image the user just
//!   picked, so it can be appended in place.
//! - [`GalleryAjaxService::fetch_remaining`]: `<li>`s for every image attached
//!   to the entry that is not already in the editor ("add all attachments").
//!   The caller passes what it currently shows; the service does not consult
//!   the stored gallery, so the result reflects the caller's view.
//!
//! Both are stateless and every response carries cache-disabling headers so
//! the editor never sees a stale selection. A catalog failure during
//! `fetch_remaining` is answered like an empty catalog: nothing to add.

use crate::catalog::{AttachmentCatalog, MediaKind};
use crate::thumbnail::ThumbnailRenderer;
use crate::types::{AttachmentId, EntityId, ImageRef};
use maud::Markup;
use std::collections::HashSet;

/// Headers sent with every sync response.
pub const NO_CACHE_HEADERS: [(&str, &str); 2] = [
    ("Cache-Control", "no-cache, must-revalidate"),
    ("Expires", "Mon, 26 Jul 1997 05:00:00 GMT"),
];

/// A markup response for the editor.
#[derive(Debug, Clone)]
pub struct SyncResponse {
    pub headers: Vec<(&'static str, &'static str)>,
    pub fragments: Vec<Markup>,
}

impl SyncResponse {
    pub fn new(fragments: Vec<Markup>) -> Self {
        Self {
            headers: NO_CACHE_HEADERS.to_vec(),
            fragments,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// All fragments concatenated, as sent over the wire.
    pub fn body(&self) -> String {
        self.fragments.iter().map(|f| f.0.as_str()).collect()
    }
}

#[derive(Clone, Copy)]
pub struct GalleryAjaxService<'a> {
    renderer: ThumbnailRenderer<'a>,
    catalog: &'a dyn AttachmentCatalog,
}

impl<'a> GalleryAjaxService<'a> {
    pub fn new(renderer: ThumbnailRenderer<'a>, catalog: &'a dyn AttachmentCatalog) -> Self {
        Self { renderer, catalog }
    }

    /// Admin list item for a single just-selected image.
    pub fn fetch_one(&self, image: &ImageRef) -> SyncResponse {
        SyncResponse::new(vec![self.renderer.admin_item(image)])
    }

    /// Admin list items for the entry's images not in `excluded`, in catalog order.
    pub fn fetch_remaining(
        &self,
        entity: EntityId,
        excluded: &HashSet<AttachmentId>,
    ) -> SyncResponse {
        let fragments = self
            .remaining(entity, excluded)
            .iter()
            .map(|image| self.renderer.admin_item(image))
            .collect();
        SyncResponse::new(fragments)
    }

    /// Refs `fetch_remaining` renders, without rendering them.
    pub fn remaining(&self, entity: EntityId, excluded: &HashSet<AttachmentId>) -> Vec<ImageRef> {
        let children = match self.catalog.children(entity, MediaKind::Image) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Catalog query for entity {} failed: {}", entity, e);
                return Vec::new();
            }
        };
        children
            .into_iter()
            .filter(|id| !excluded.contains(id))
            .map(ImageRef::from)
            .collect()
    }
}

/// Turn the editor's submitted selection into an exclusion set.
///
/// Comparison is by attachment id, so `"07"` and `"7.0"` exclude attachment 7.
/// Entries that name no attachment cannot match anything and are ignored.
pub fn exclusion_set<S: AsRef<str>>(included: &[S]) -> HashSet<AttachmentId> {
    included
        .iter()
        .filter_map(|raw| ImageRef::parse(raw.as_ref()))
        .filter_map(|image| image.attachment_id())
        .collect()
}
