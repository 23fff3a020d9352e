//! Caption templates.
//!
//! A caption template is plain text with `%token%` placeholders, filled from
//! an attachment's metadata:
//!
//! | Token | Value |
//! |---|---|
//! | `%title%` | attachment title |
//! | `%alt%` | explicit alt text (no fallback) |
//! | `%filename%` | last segment of the original URL |
//! | `%caption%` | caption / excerpt |
//!
//! A literal newline becomes `" - "` so multi-line templates fit in a single
//! `title` attribute. Unknown tokens are left as they are.
//!
//! Substitution is one left-to-right pass: inserted values are never scanned
//! again, so a title that happens to contain `%alt%` stays literal. Nothing is
//! escaped here; the markup layer escapes on output.

use crate::resolver::AttachmentMetadata;

/// Default template: just the title.
pub const DEFAULT_TEMPLATE: &str = "%title%";

pub fn render(template: &str, data: &AttachmentMetadata) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['%', '\n']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some(after) = rest.strip_prefix('\n') {
            out.push_str(" - ");
            rest = after;
            continue;
        }

        match token_value(rest, data) {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &rest[consumed..];
            }
            None => {
                out.push('%');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// If `s` starts with a recognized token, its value and the token's length.
fn token_value<'a>(s: &str, data: &'a AttachmentMetadata) -> Option<(&'a str, usize)> {
    let tokens: [(&str, &'a str); 4] = [
        ("%title%", data.title.as_str()),
        ("%alt%", data.alt_text.as_str()),
        ("%filename%", data.filename.as_str()),
        ("%caption%", data.excerpt.as_str()),
    ];
    tokens
        .into_iter()
        .find(|(token, _)| s.starts_with(token))
        .map(|(token, value)| (value, token.len()))
}
