//! Gallery persistence.
//!
//! A gallery is the ordered list of image refs stored under a single metadata
//! key on its owning entity. [`GalleryStore`] is the only writer.
//!
//! ## Write rules
//!
//! - Non-numeric refs are dropped silently; the rest keep their relative order.
//! - Every write replaces the stored list in one `set_meta` call. Writing an
//!   empty list clears the gallery.
//! - Concurrent writers are last-write-wins; there is no locking or versioning.
//!
//! ## Stored representation
//!
//! New values are JSON arrays of strings. Older data may instead be a string
//! holding a PHP-style serialized array, e.g.
//!
//! ```text
//! a:2:{i:0;s:2:"12";i:1;s:1:"7";}
//! ```
//!
//! [`decode_value`] accepts both; anything else (or an undecodable string)
//! reads as an empty gallery.
//!
//! ## Save path
//!
//! Form submissions go through [`GalleryStore::save`], which skips autosaves
//! and refuses requests that fail the host's integrity check before anything
//! is written.

use crate::catalog::{MetaError, MetaStore};
use crate::types::{EntityId, ImageRef};
use serde_json::Value;
use thiserror::Error;

/// Metadata key the ordered ref list lives under.
pub const GALLERY_META_KEY: &str = "gallery_images";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Meta(#[from] MetaError),
    #[error("Save for entity {0} failed the integrity check")]
    Unauthorized(EntityId),
}

/// Host-side verification of a save request (e.g. a CSRF token).
pub trait IntegrityCheck {
    fn verify(&self, entity: EntityId, token: &str) -> bool;
}

/// A submitted gallery form.
#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    /// Integrity token sent with the form, if any.
    pub token: Option<String>,
    /// Raw refs in UI order, as submitted.
    pub images: Vec<String>,
    /// The host is autosaving a draft rather than handling a user save.
    pub autosave: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The list was written; holds what was kept.
    Saved(Vec<ImageRef>),
    /// Autosave: nothing was written.
    Skipped,
}

#[derive(Clone, Copy)]
pub struct GalleryStore<'a> {
    meta: &'a dyn MetaStore,
}

impl<'a> GalleryStore<'a> {
    pub fn new(meta: &'a dyn MetaStore) -> Self {
        Self { meta }
    }

    /// The stored list, or an empty one if nothing is stored.
    pub fn read(&self, entity: EntityId) -> Result<Vec<ImageRef>, StoreError> {
        let value = self.meta.get_meta(entity, GALLERY_META_KEY)?;
        Ok(value.map(|v| decode_value(entity, v)).unwrap_or_default())
    }

    /// Replace the stored list with the numeric-looking subset of `raw`.
    pub fn write<S: AsRef<str>>(
        &self,
        entity: EntityId,
        raw: &[S],
    ) -> Result<Vec<ImageRef>, StoreError> {
        let kept = sanitize(raw);
        let dropped = raw.len() - kept.len();
        if dropped > 0 {
            tracing::debug!("Dropped {} non-numeric refs for entity {}", dropped, entity);
        }
        self.meta
            .set_meta(entity, GALLERY_META_KEY, encode_value(&kept))?;
        Ok(kept)
    }

    /// Handle a submitted gallery form.
    pub fn save(
        &self,
        entity: EntityId,
        request: &SaveRequest,
        check: &dyn IntegrityCheck,
    ) -> Result<SaveOutcome, StoreError> {
        if request.autosave {
            tracing::debug!("Skipping gallery save for entity {} during autosave", entity);
            return Ok(SaveOutcome::Skipped);
        }
        let authorized = request
            .token
            .as_deref()
            .is_some_and(|token| check.verify(entity, token));
        if !authorized {
            tracing::warn!("Rejected gallery save for entity {}: integrity check failed", entity);
            return Err(StoreError::Unauthorized(entity));
        }
        self.write(entity, request.images.as_slice()).map(SaveOutcome::Saved)
    }
}

/// Keep numeric-looking refs in their original order.
pub fn sanitize<S: AsRef<str>>(raw: &[S]) -> Vec<ImageRef> {
    raw.iter()
        .filter_map(|r| ImageRef::parse(r.as_ref()))
        .collect()
}

pub fn encode_value(refs: &[ImageRef]) -> Value {
    Value::Array(
        refs.iter()
            .map(|r| Value::String(r.as_str().to_string()))
            .collect(),
    )
}

/// Decode a stored value: a JSON array, or a legacy serialized string.
pub fn decode_value(entity: EntityId, value: Value) -> Vec<ImageRef> {
    let items: Vec<String> = match value {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        Value::String(encoded) => match decode_legacy(&encoded) {
            Some(items) => items,
            None => {
                tracing::warn!("Could not decode legacy gallery value for entity {}", entity);
                return Vec::new();
            }
        },
        Value::Null => return Vec::new(),
        other => {
            tracing::warn!(
                "Unexpected gallery value type for entity {}: {}",
                entity,
                other
            );
            return Vec::new();
        }
    };
    sanitize(&items)
}

fn scalar_text(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// =============================================================================
// Legacy serialized form
// =============================================================================

/// Decode a PHP-style serialized array into its values, in order.
///
/// Keys are parsed and discarded. String, integer and float values are kept
/// as text; booleans and nulls are skipped. Nested arrays, objects, trailing
/// bytes, or any malformed input yield `None`.
pub fn decode_legacy(encoded: &str) -> Option<Vec<String>> {
    let mut cursor = Cursor::new(encoded.trim().as_bytes());
    cursor.expect(b"a:")?;
    let count: usize = cursor.number_until(b':')?.parse().ok()?;
    cursor.expect(b"{")?;

    let mut values = Vec::with_capacity(count.min(encoded.len()));
    for _ in 0..count {
        cursor.scalar()?;
        if let Some(value) = cursor.scalar()? {
            values.push(value);
        }
    }
    cursor.expect(b"}")?;
    cursor.at_end().then_some(values)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos == self.bytes.len()
    }

    fn expect(&mut self, literal: &[u8]) -> Option<()> {
        let rest = self.bytes.get(self.pos..)?;
        if rest.starts_with(literal) {
            self.pos += literal.len();
            Some(())
        } else {
            None
        }
    }

    /// Text up to (not including) `end`, consuming the terminator.
    fn number_until(&mut self, end: u8) -> Option<&'a str> {
        let rest = self.bytes.get(self.pos..)?;
        let len = rest.iter().position(|&b| b == end)?;
        let text = std::str::from_utf8(&rest[..len]).ok()?;
        self.pos += len + 1;
        Some(text)
    }

    /// One scalar entry. `Some(None)` for entries that carry no text value.
    fn scalar(&mut self) -> Option<Option<String>> {
        let tag = *self.bytes.get(self.pos)?;
        self.pos += 1;
        match tag {
            b'N' => {
                self.expect(b";")?;
                Some(None)
            }
            b'b' => {
                self.expect(b":")?;
                self.number_until(b';')?;
                Some(None)
            }
            b'i' | b'd' => {
                self.expect(b":")?;
                Some(Some(self.number_until(b';')?.to_string()))
            }
            b's' => {
                self.expect(b":")?;
                let len: usize = self.number_until(b':')?.parse().ok()?;
                self.expect(b"\"")?;
                let end = self.pos.checked_add(len)?;
                let raw = self.bytes.get(self.pos..end)?;
                let text = std::str::from_utf8(raw).ok()?.to_string();
                self.pos = end;
                self.expect(b"\";")?;
                Some(Some(text))
            }
            _ => None,
        }
    }
}
