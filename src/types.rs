//! Identifier and context types shared by every gallery component.
//!
//! Galleries are addressed by the [`EntityId`] of the content entry that owns
//! them. Their contents are an ordered list of [`ImageRef`]s: opaque strings
//! as submitted by the editing UI, kept only when they look numeric. Catalog
//! lookups need an integer [`AttachmentId`], which a ref may or may not yield.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Id of a content entry (the owner of a gallery, or an attachment's parent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id of an attachment in the external catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(pub u64);

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A gallery entry: an opaque reference into the attachment catalog.
///
/// Construction goes through [`ImageRef::parse`], which enforces the
/// numeric-looking invariant. The original string form is preserved so a
/// stored gallery round-trips exactly as it was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Accept `raw` only if it looks numeric (see [`is_numeric`]).
    pub fn parse(raw: &str) -> Option<Self> {
        is_numeric(raw).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The catalog id this ref points at.
    ///
    /// Any non-negative integral value counts, whatever its spelling:
    /// `"7"`, `"+7"`, `"7.0"` and `"0.7e1"` all name attachment 7. Fractional
    /// and negative values name nothing.
    pub fn attachment_id(&self) -> Option<AttachmentId> {
        let raw = self.0.trim();
        if let Ok(id) = raw.parse::<u64>() {
            return Some(AttachmentId(id));
        }
        let value: f64 = raw.parse().ok()?;
        let integral = value.is_finite() && value >= 0.0 && value.fract() == 0.0;
        (integral && value < u64::MAX as f64).then(|| AttachmentId(value as u64))
    }
}

impl From<AttachmentId> for ImageRef {
    fn from(id: AttachmentId) -> Self {
        Self(id.0.to_string())
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric-looking check for submitted refs.
///
/// Accepts optional surrounding whitespace, an optional sign, decimal digits
/// with an optional fractional part, and an optional exponent:
///
/// - `"12"`, `" 7"`, `"-3"`, `"1.5"`, `".5"`, `"1e3"` → numeric
/// - `"abc"`, `"3x"`, `""`, `"1e"`, `"."` → not numeric
pub fn is_numeric(raw: &str) -> bool {
    let s = raw.trim();
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);

    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.is_none_or(all_digits) {
        return false;
    }
    if int_part.is_empty() && frac_part.is_none_or(str::is_empty) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits)
        }
    }
}

/// Per-request view state for public rendering.
///
/// Replaces any ambient "current entry" lookup: callers state explicitly
/// which entry is being shown and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewContext {
    /// The entry is password protected and the visitor has not unlocked it.
    pub is_password_protected: bool,
    /// The request shows a single entry rather than a listing.
    pub is_singular_view: bool,
}
