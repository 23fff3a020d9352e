//! Shared fixtures for the unit test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = sample_site();                 // ids 3, 5, 7, 9, 11 under entity 5
//! let r = refs(&["3", "7"]);
//! assert_eq!(count_items("<ul><li></li><li></li></ul>"), 2);
//! ```

use crate::catalog::{AttachmentRecord, SizedVariant};
use crate::memory::Site;
use crate::resolver::{ADMIN_THUMB_SIZE, PUBLIC_THUMB_SIZE};
use crate::types::{AttachmentId, EntityId, ImageRef};
use std::collections::BTreeMap;

/// The entity that owns every attachment in [`sample_site`].
pub const OWNER: EntityId = EntityId(5);

// =========================================================================
// Attachment records
// =========================================================================

/// A JPEG attachment with predictable metadata derived from its id.
///
/// - url: `https://example.com/uploads/photo-{id}.jpg`
/// - title: `Photo {id}`, caption: `Caption {id}`, no alt text
/// - 1600x1200 original, with admin (109²) and public (150²) renditions
pub fn image(id: u64, parent: u64) -> AttachmentRecord {
    let mut sizes = BTreeMap::new();
    sizes.insert(
        ADMIN_THUMB_SIZE.to_string(),
        SizedVariant {
            url: format!("https://example.com/uploads/photo-{id}-109x109.jpg"),
            width: 109,
            height: 109,
        },
    );
    sizes.insert(
        PUBLIC_THUMB_SIZE.to_string(),
        SizedVariant {
            url: format!("https://example.com/uploads/photo-{id}-150x150.jpg"),
            width: 150,
            height: 150,
        },
    );
    AttachmentRecord {
        id: AttachmentId(id),
        parent: Some(EntityId(parent)),
        mime_type: "image/jpeg".to_string(),
        url: format!("https://example.com/uploads/photo-{id}.jpg"),
        width: 1600,
        height: 1200,
        title: format!("Photo {id}"),
        alt: String::new(),
        caption: format!("Caption {id}"),
        sizes,
    }
}

/// Five images (ids 3, 5, 7, 9, 11) attached to [`OWNER`].
pub fn sample_site() -> Site {
    Site::with_attachments([3, 5, 7, 9, 11].map(|id| image(id, OWNER.0)))
}

// =========================================================================
// Refs and markup
// =========================================================================

/// Parse string refs, panicking on anything non-numeric.
pub fn refs(raw: &[&str]) -> Vec<ImageRef> {
    raw.iter()
        .map(|r| ImageRef::parse(r).unwrap_or_else(|| panic!("'{r}' is not a numeric ref")))
        .collect()
}

/// Number of `<li` openings in a rendered fragment.
pub fn count_items(html: &str) -> usize {
    html.matches("<li").count()
}
