//! Thumbnail rendering.
//!
//! Turns one [`ImageRef`] into a [`ThumbnailFragment`] (URL, dimensions,
//! captions) and into the `<li>` markup the editing UI and public pages use.
//!
//! ## Modes
//!
//! | | Admin | Public | Public + resize proxy |
//! |---|---|---|---|
//! | image URL | `gallery-admin-thumb` rendition | `gallery-thumb` rendition | `{endpoint}?src=..&q=..&w=..&h=..` |
//! | width × height | configured square size | rendition's reported size | configured width × height |
//!
//! The admin mode never goes through the proxy. Renditions missing from the
//! catalog fall back to the original URL and intrinsic size. The proxy's `src`
//! is form-encoded, so a source URL with its own query string stays intact.
//!
//! ## Missing attachments
//!
//! A ref whose attachment cannot be resolved renders as a placeholder
//! (empty URL, zero size) rather than an error, so one deleted image never
//! breaks the list or shifts the position of the images after it.
//!
//! ## Markup
//!
//! ```text
//! admin:  <li><img …><a class="gallery-remove">Remove</a><input type=hidden name="gallery_thumb[]" value=REF></li>
//! public: <li><a href=FULL title=CAPTION data-gallery=""><img …></a></li>
//! ```
//!
//! The hidden inputs are what the editing form submits on save, so the list
//! order in the UI is the order that gets stored.

use crate::caption;
use crate::config::RenderSettings;
use crate::resolver::{ADMIN_THUMB_SIZE, AttachmentMetadata, AttachmentResolver, PUBLIC_THUMB_SIZE};
use crate::types::ImageRef;
use maud::{Markup, html};
use url::form_urlencoded;

/// Form field the editing UI submits the ordered refs under.
pub const THUMB_FIELD: &str = "gallery_thumb[]";

/// One rendered image, ready for display. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailFragment {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt_text: String,
    pub title: String,
    /// Full-size image the thumbnail links to.
    pub link_href: String,
}

impl ThumbnailFragment {
    /// Stand-in for an unresolvable ref.
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.url.is_empty()
    }
}

#[derive(Clone, Copy)]
pub struct ThumbnailRenderer<'a> {
    settings: &'a RenderSettings,
    resolver: AttachmentResolver<'a>,
}

impl<'a> ThumbnailRenderer<'a> {
    pub fn new(settings: &'a RenderSettings, resolver: AttachmentResolver<'a>) -> Self {
        Self { settings, resolver }
    }

    /// Square editing-UI thumbnail at the configured admin size.
    pub fn render_admin(&self, image: &ImageRef) -> ThumbnailFragment {
        let Some(meta) = self.resolve_or_log(image) else {
            return ThumbnailFragment::placeholder();
        };
        let size = self.settings.thumbnails.admin_size;
        ThumbnailFragment {
            url: meta.variant(ADMIN_THUMB_SIZE).url,
            width: size,
            height: size,
            alt_text: meta.display_alt().to_string(),
            title: caption::render(&self.settings.caption.template, &meta),
            link_href: meta.url.clone(),
        }
    }

    /// Public thumbnail, through the resize proxy when enabled.
    pub fn render_public(&self, image: &ImageRef) -> ThumbnailFragment {
        let Some(meta) = self.resolve_or_log(image) else {
            return ThumbnailFragment::placeholder();
        };
        let thumbs = &self.settings.thumbnails;
        let proxy = &self.settings.resize_proxy;

        let (url, width, height) = if proxy.enabled {
            let src: String = form_urlencoded::byte_serialize(meta.url.as_bytes()).collect();
            let url = format!(
                "{}?src={}&q={}&w={}&h={}",
                proxy.endpoint, src, proxy.quality, thumbs.width, thumbs.height
            );
            (url, thumbs.width, thumbs.height)
        } else {
            let variant = meta.variant(PUBLIC_THUMB_SIZE);
            (variant.url, variant.width, variant.height)
        };

        ThumbnailFragment {
            url,
            width,
            height,
            alt_text: meta.display_alt().to_string(),
            title: caption::render(&self.settings.caption.template, &meta),
            link_href: meta.url.clone(),
        }
    }

    /// Editing-UI list item for `image`.
    pub fn admin_item(&self, image: &ImageRef) -> Markup {
        let thumb = self.render_admin(image);
        html! {
            @if thumb.is_placeholder() {
                li.gallery-placeholder {
                    a.gallery-remove href="#" { "Remove" }
                    input type="hidden" name=(THUMB_FIELD) value=(image.as_str());
                }
            } @else {
                li {
                    img src=(thumb.url) width=(thumb.width) height=(thumb.height) alt=(thumb.alt_text);
                    a.gallery-remove href="#" { "Remove" }
                    input type="hidden" name=(THUMB_FIELD) value=(image.as_str());
                }
            }
        }
    }

    /// Public list item for `image`, linking into the lightbox.
    pub fn public_item(&self, image: &ImageRef) -> Markup {
        let thumb = self.render_public(image);
        html! {
            @if thumb.is_placeholder() {
                li.gallery-placeholder {}
            } @else {
                li {
                    a href=(thumb.link_href) title=(thumb.title) data-gallery="" {
                        img src=(thumb.url) width=(thumb.width) height=(thumb.height) alt=(thumb.alt_text);
                    }
                }
            }
        }
    }

    fn resolve_or_log(&self, image: &ImageRef) -> Option<AttachmentMetadata> {
        match self.resolver.resolve(image) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::debug!("Rendering placeholder for image {}: {}", image, e);
                None
            }
        }
    }
}
