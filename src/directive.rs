//! The `[gallery]` embedding directive.
//!
//! Content bodies may embed any entity's gallery inline:
//!
//! ```text
//! [gallery]            the current entry's gallery
//! [gallery id=12]      entity 12's gallery
//! [gallery id="12"]    quotes (single or double) are optional
//! ```
//!
//! Other attributes are ignored. A directive whose `id` is not an integer is
//! not recognized and stays in the content as written.

use crate::types::EntityId;
use std::ops::Range;

pub const DIRECTIVE_TAG: &str = "gallery";

/// A parsed directive: which gallery to embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    /// Explicit target; `None` means the entry being rendered.
    pub id: Option<EntityId>,
}

impl Directive {
    pub fn target(&self, current: EntityId) -> EntityId {
        self.id.unwrap_or(current)
    }
}

/// All directives in `content`, with their byte ranges, in order.
pub fn find_directives(content: &str) -> Vec<(Range<usize>, Directive)> {
    let open = format!("[{DIRECTIVE_TAG}");
    let mut found = Vec::new();
    let mut offset = 0;

    while let Some(rel) = content[offset..].find(&open) {
        let start = offset + rel;
        let after_tag = start + open.len();
        let Some(close_rel) = content[after_tag..].find(']') else {
            break;
        };
        let end = after_tag + close_rel + 1;
        let inner = &content[after_tag..end - 1];

        match parse_attributes(inner) {
            Some(directive) => {
                found.push((start..end, directive));
                offset = end;
            }
            None => offset = after_tag,
        }
    }
    found
}

/// Parse the text between the tag name and `]`.
///
/// Must be empty or start with whitespace, so `[gallery-old]` or
/// `[galleryx]` are not directives.
fn parse_attributes(inner: &str) -> Option<Directive> {
    if !inner.is_empty() && !inner.starts_with(char::is_whitespace) {
        return None;
    }
    let mut id = None;
    for pair in inner.split_whitespace() {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key.eq_ignore_ascii_case("id") {
            let value = value.trim_matches(['"', '\'']);
            id = Some(EntityId(value.parse().ok()?));
        }
    }
    Some(Directive { id })
}

/// Replace every directive with `render(directive)`.
pub fn expand(content: &str, mut render: impl FnMut(Directive) -> String) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for (range, directive) in find_directives(content) {
        out.push_str(&content[last..range.start]);
        out.push_str(&render(directive));
        last = range.end;
    }
    out.push_str(&content[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(content: &str) -> Vec<Option<u64>> {
        find_directives(content)
            .into_iter()
            .map(|(_, d)| d.id.map(|e| e.0))
            .collect()
    }

    #[test]
    fn bare_directive_targets_current_entry() {
        assert_eq!(ids("intro [gallery] outro"), vec![None]);
        let (_, d) = find_directives("[gallery]")[0];
        assert_eq!(d.target(EntityId(4)), EntityId(4));
    }

    #[test]
    fn id_in_any_quoting() {
        assert_eq!(
            ids(r#"[gallery id=12][gallery id="13"][gallery id='14']"#),
            vec![Some(12), Some(13), Some(14)]
        );
    }

    #[test]
    fn other_attributes_are_ignored() {
        assert_eq!(ids(r#"[gallery size="large" id=3 columns]"#), vec![Some(3)]);
    }

    #[test]
    fn lookalike_tags_are_not_directives() {
        assert!(ids("[gallery-old] [galleryx] [gallery").is_empty());
    }

    #[test]
    fn non_integer_id_is_left_alone() {
        assert!(ids("[gallery id=abc]").is_empty());
        assert_eq!(expand("a [gallery id=abc] b", |_| "X".into()), "a [gallery id=abc] b");
    }

    #[test]
    fn ranges_cover_the_whole_directive() {
        let content = "ab[gallery id=1]cd";
        let (range, _) = find_directives(content)[0].clone();
        assert_eq!(&content[range], "[gallery id=1]");
    }

    #[test]
    fn expand_replaces_in_order() {
        let out = expand("<p>[gallery]</p><p>[gallery id=9]</p>", |d| match d.id {
            Some(id) => format!("G{id}"),
            None => "Gcur".into(),
        });
        assert_eq!(out, "<p>Gcur</p><p>G9</p>");
    }

    #[test]
    fn expand_without_directives_is_identity() {
        assert_eq!(expand("plain text", |_| unreachable!()), "plain text");
    }
}
