//! Public gallery output.
//!
//! [`ContentInjector::apply`] decides whether an entry's gallery is appended
//! to its content body:
//!
//! ```text
//! password protected                        → unchanged
//! content.append && (!single_only || singular view) → content + gallery
//! otherwise                                 → unchanged
//! ```
//!
//! The appended gallery is the ordered thumbnail list (only when the gallery
//! has images) followed by one lightbox skeleton, which is always emitted.
//! [`ContentInjector::embed`] produces the same output for the `[gallery]`
//! directive without the gating.
//!
//! Rendering never breaks a page: if the gallery cannot be read, the content
//! comes back without it.

use crate::config::RenderSettings;
use crate::directive;
use crate::lightbox;
use crate::resolver::AttachmentResolver;
use crate::store::{GalleryStore, StoreError};
use crate::thumbnail::ThumbnailRenderer;
use crate::types::{EntityId, ViewContext};
use maud::{Markup, html};

#[derive(Clone, Copy)]
pub struct ContentInjector<'a> {
    store: GalleryStore<'a>,
    resolver: AttachmentResolver<'a>,
}

impl<'a> ContentInjector<'a> {
    pub fn new(store: GalleryStore<'a>, resolver: AttachmentResolver<'a>) -> Self {
        Self { store, resolver }
    }

    /// Append the entry's gallery to `content` when the settings call for it.
    pub fn apply(
        &self,
        content: &str,
        entity: EntityId,
        context: &ViewContext,
        settings: &RenderSettings,
    ) -> String {
        if context.is_password_protected {
            return content.to_string();
        }
        let wanted = settings.content.append
            && (!settings.content.single_only || context.is_singular_view);
        if !wanted {
            return content.to_string();
        }

        match self.render_gallery(entity, settings) {
            Ok(gallery) => {
                let mut out = String::with_capacity(content.len() + gallery.0.len());
                out.push_str(content);
                out.push_str(&gallery.0);
                out
            }
            Err(e) => {
                tracing::warn!("Leaving entity {} without its gallery: {}", entity, e);
                content.to_string()
            }
        }
    }

    /// Output for one `[gallery]` directive: `target`'s gallery, or `current`'s.
    pub fn embed(
        &self,
        target: Option<EntityId>,
        current: EntityId,
        settings: &RenderSettings,
    ) -> String {
        let entity = target.unwrap_or(current);
        match self.render_gallery(entity, settings) {
            Ok(gallery) => gallery.into_string(),
            Err(e) => {
                tracing::warn!("Could not embed gallery of entity {}: {}", entity, e);
                String::new()
            }
        }
    }

    /// Replace every `[gallery]` directive in `content`.
    pub fn expand_directives(
        &self,
        content: &str,
        current: EntityId,
        settings: &RenderSettings,
    ) -> String {
        directive::expand(content, |d| self.embed(d.id, current, settings))
    }

    /// Thumbnail list (if any images) plus the lightbox skeleton.
    pub fn render_gallery(
        &self,
        entity: EntityId,
        settings: &RenderSettings,
    ) -> Result<Markup, StoreError> {
        let images = self.store.read(entity)?;
        let renderer = ThumbnailRenderer::new(settings, self.resolver);
        let lightbox = &settings.lightbox;

        Ok(html! {
            @if !images.is_empty() {
                div.gallery-container {
                    ul.gallery.clearfix {
                        @for image in &images {
                            (renderer.public_item(image))
                        }
                    }
                }
            }
            (lightbox::build(lightbox.full_screen, lightbox.use_bootstrap_modal))
        })
    }
}
