//! CLI output formatting.
//!
//! Markup commands (`render`, `embed`, `fetch-*`) write the markup itself to
//! stdout. The commands here describe state instead, as a short inventory:
//!
//! ## Show
//!
//! ```text
//! Gallery of entity 5 (3 images)
//! 001 Dawn
//!     Source: dawn.jpg
//! 002 (404) missing
//! 003 (mountains.jpg)
//!     Source: mountains.jpg
//! ```
//!
//! ## Save
//!
//! ```text
//! Saved 2 images for entity 5
//! Autosave: gallery of entity 5 left unchanged
//! ```
//!
//! Each has a `format_*` function (returns `Vec<String>`) for testability and
//! a `print_*` wrapper that writes to stdout.

use crate::ajax::SyncResponse;
use crate::resolver::{AttachmentResolver, ResolveError};
use crate::store::SaveOutcome;
use crate::types::{EntityId, ImageRef};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "image" } else { "images" }
}

// ============================================================================
// Show
// ============================================================================

/// Inventory of a stored gallery, resolving each ref for its title and file.
///
/// Titled images show the title; untitled ones show the filename in parens.
/// Refs that no longer resolve are listed in their slot as missing.
pub fn format_gallery(
    entity: EntityId,
    images: &[ImageRef],
    resolver: &AttachmentResolver<'_>,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Gallery of entity {} ({} {})",
        entity,
        images.len(),
        plural(images.len())
    )];
    for (i, image) in images.iter().enumerate() {
        let index = format_index(i + 1);
        match resolver.resolve(image) {
            Ok(meta) => {
                let title = meta.title.trim();
                if title.is_empty() {
                    lines.push(format!("{} ({})", index, meta.filename));
                } else {
                    lines.push(format!("{} {}", index, title));
                }
                lines.push(format!("{}Source: {}", indent(1), meta.filename));
            }
            Err(ResolveError::NotFound(_) | ResolveError::InvalidRef(_)) => {
                lines.push(format!("{} ({}) missing", index, image));
            }
            Err(e) => {
                lines.push(format!("{} ({}) unavailable: {}", index, image, e));
            }
        }
    }
    lines
}

pub fn print_gallery(entity: EntityId, images: &[ImageRef], resolver: &AttachmentResolver<'_>) {
    for line in format_gallery(entity, images, resolver) {
        println!("{}", line);
    }
}

// ============================================================================
// Save
// ============================================================================

pub fn format_save_outcome(entity: EntityId, outcome: &SaveOutcome) -> Vec<String> {
    match outcome {
        SaveOutcome::Saved(kept) => vec![format!(
            "Saved {} {} for entity {}",
            kept.len(),
            plural(kept.len()),
            entity
        )],
        SaveOutcome::Skipped => vec![format!(
            "Autosave: gallery of entity {} left unchanged",
            entity
        )],
    }
}

pub fn print_save_outcome(entity: EntityId, outcome: &SaveOutcome) {
    for line in format_save_outcome(entity, outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// Sync responses
// ============================================================================

/// A sync response as it would go over the wire: optional header block, then
/// one fragment per line.
pub fn format_sync_response(response: &SyncResponse, with_headers: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if with_headers {
        lines.extend(
            response
                .headers
                .iter()
                .map(|(name, value)| format!("{}: {}", name, value)),
        );
        lines.push(String::new());
    }
    lines.extend(response.fragments.iter().map(|f| f.0.clone()));
    lines
}

pub fn print_sync_response(response: &SyncResponse, with_headers: bool) {
    for line in format_sync_response(response, with_headers) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AttachmentCatalog;
    use crate::memory::Site;
    use crate::test_helpers::{OWNER, image, refs, sample_site};
    use maud::html;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(0), "images");
        assert_eq!(plural(1), "image");
        assert_eq!(plural(2), "images");
    }

    // =========================================================================
    // Show
    // =========================================================================

    #[test]
    fn gallery_lists_titles_and_sources_in_order() {
        let site = sample_site();
        let lines = format_gallery(OWNER, &refs(&["7", "3"]), &AttachmentResolver::new(&site));
        assert_eq!(
            lines,
            vec![
                "Gallery of entity 5 (2 images)",
                "001 Photo 7",
                "    Source: photo-7.jpg",
                "002 Photo 3",
                "    Source: photo-3.jpg",
            ]
        );
    }

    #[test]
    fn gallery_marks_missing_refs_in_place() {
        let site = sample_site();
        let lines = format_gallery(OWNER, &refs(&["404", "3"]), &AttachmentResolver::new(&site));
        assert_eq!(lines[1], "001 (404) missing");
        assert_eq!(lines[2], "002 Photo 3");
    }

    #[test]
    fn untitled_image_shows_filename() {
        let mut record = image(3, OWNER.0);
        record.title = String::new();
        let site = Site::with_attachments([record]);
        let lines = format_gallery(OWNER, &refs(&["3"]), &AttachmentResolver::new(&site));
        assert_eq!(lines[1], "001 (photo-3.jpg)");
    }

    #[test]
    fn gallery_reports_unavailable_catalog() {
        let site = sample_site();
        site.set_offline(true);
        assert!(site.attachment(crate::types::AttachmentId(3)).is_err());
        let lines = format_gallery(OWNER, &refs(&["3"]), &AttachmentResolver::new(&site));
        assert!(lines[1].starts_with("001 (3) unavailable: "));
    }

    #[test]
    fn empty_gallery_header_only() {
        let site = sample_site();
        let lines = format_gallery(OWNER, &[], &AttachmentResolver::new(&site));
        assert_eq!(lines, vec!["Gallery of entity 5 (0 images)"]);
    }

    // =========================================================================
    // Save
    // =========================================================================

    #[test]
    fn save_outcome_lines() {
        let saved = SaveOutcome::Saved(refs(&["3"]));
        assert_eq!(
            format_save_outcome(OWNER, &saved),
            vec!["Saved 1 image for entity 5"]
        );
        assert_eq!(
            format_save_outcome(OWNER, &SaveOutcome::Skipped),
            vec!["Autosave: gallery of entity 5 left unchanged"]
        );
    }

    // =========================================================================
    // Sync responses
    // =========================================================================

    #[test]
    fn sync_response_with_and_without_headers() {
        let response = SyncResponse::new(vec![html! { li { "a" } }, html! { li { "b" } }]);
        assert_eq!(
            format_sync_response(&response, false),
            vec!["<li>a</li>", "<li>b</li>"]
        );
        let lines = format_sync_response(&response, true);
        assert_eq!(lines[0], "Cache-Control: no-cache, must-revalidate");
        assert_eq!(lines[1], "Expires: Mon, 26 Jul 1997 05:00:00 GMT");
        assert_eq!(lines[2], "");
        assert_eq!(&lines[3..], ["<li>a</li>", "<li>b</li>"]);
    }
}
